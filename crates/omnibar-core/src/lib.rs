// Every fallible API in this crate fails through `OmnibarError`; per-item
// `# Errors` sections would restate that contract over and over.
#![allow(
    clippy::missing_errors_doc,
    reason = "single crate-wide error type; per-item error docs would be repetitive"
)]

pub mod behavior;
pub mod config;
pub mod convert;
pub mod dedup;
pub mod engines;
pub mod error;
pub mod models;
pub mod notify;
pub mod query;
pub mod search;
pub mod slots;
pub mod store;
pub mod tokenizer;
pub(crate) mod urls;

pub use behavior::{Behavior, BehaviorSet, Source};
pub use config::SearchConfig;
pub use error::{OmnibarError, Result};
pub use models::{MatchCandidate, MatchCategory, MatchStyle, SearchListener};
pub use search::{CancellationToken, Search, SearchProvider, SearchRequest, SearchState};
pub use store::{HistoryStore, PlacesStore};
