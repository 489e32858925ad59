//! Duplicate detection over the streamed match list.
//!
//! Two matches are duplicates when their normalized urls (and, for tab
//! switches searched across containers, their container) coincide. A
//! switch-to-tab variant replaces a plain duplicate in place. Urls differing
//! only by protocol keep the higher-ranked prefix. Urls differing only by
//! `www.` are deliberately kept as provisional non-duplicates: picking the
//! canonical one requires knowing the eventual heuristic result, which lives
//! outside this engine.

use std::collections::HashSet;

use crate::config::SearchConfig;
use crate::models::{MatchCandidate, MatchCategory, MatchStyle};
use crate::urls::{StripOptions, prefix_rank, strip_prefix_and_trim};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyClass {
    Url(String),
    /// Restyled search history must dedupe against suggestion echoes of the
    /// same terms, not against its raw url, which keywords may rewrite.
    SearchTerms { engine: String, terms: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub class: KeyClass,
    pub container: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyedMatch {
    pub key: DedupKey,
    pub prefix: String,
    pub is_tab_switch: bool,
    pub category: MatchCategory,
}

/// What to do with an incoming match.
#[derive(Debug, PartialEq)]
pub enum DedupOutcome {
    /// Not a duplicate; the caller should allocate a slot and register the
    /// keyed entry at the resulting index.
    Unique(KeyedMatch),
    /// Replaces the accepted match at this index, keeping its position.
    ReplaceAt(usize, KeyedMatch),
    Discard,
}

fn container_qualifier(candidate: &MatchCandidate, config: &SearchConfig) -> Option<i64> {
    if candidate.is_tab_switch()
        && config.switch_tabs_search_all_containers
        && candidate.user_context_id.is_some_and(|id| id >= 0)
    {
        candidate.user_context_id
    } else {
        None
    }
}

#[must_use]
pub fn make_key(candidate: &MatchCandidate, config: &SearchConfig) -> (DedupKey, String) {
    let container = container_qualifier(candidate, config);
    if let MatchStyle::SearchRestyle { engine, terms } = &candidate.style {
        let key = DedupKey {
            class: KeyClass::SearchTerms {
                engine: engine.clone(),
                terms: terms.to_lowercase(),
            },
            container,
        };
        return (key, String::new());
    }
    let (stripped, prefix) = strip_prefix_and_trim(&candidate.url, StripOptions::dedup_key());
    let key = DedupKey {
        class: KeyClass::Url(stripped),
        container,
    };
    (key, prefix)
}

#[derive(Debug, Default)]
pub struct Deduplicator {
    /// Positionally aligned with the output list.
    used: Vec<Option<KeyedMatch>>,
    /// Place ids (with container qualifier) already accepted. Checked first
    /// because ids are cheaper than url keys and survive keyword rewriting.
    used_place_ids: HashSet<(i64, Option<i64>)>,
}

impl Deduplicator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decide(&mut self, candidate: &MatchCandidate, config: &SearchConfig) -> DedupOutcome {
        let (key, prefix) = make_key(candidate, config);
        let entry = KeyedMatch {
            key: key.clone(),
            prefix: prefix.clone(),
            is_tab_switch: candidate.is_tab_switch(),
            category: candidate.category,
        };

        let place_dupe = candidate
            .place_id
            .is_some_and(|id| self.used_place_ids.contains(&(id, key.container)));
        let key_dupe = self
            .used
            .iter()
            .flatten()
            .any(|existing| existing.key == key);

        if place_dupe || key_dupe {
            if entry.is_tab_switch {
                // Prefer the switch-to-tab variant over a plain duplicate,
                // keeping the original position.
                for (i, existing) in self.used.iter_mut().enumerate() {
                    let Some(existing) = existing else { continue };
                    if existing.key != key {
                        continue;
                    }
                    if existing.is_tab_switch {
                        return DedupOutcome::Discard;
                    }
                    *existing = entry.clone();
                    return DedupOutcome::ReplaceAt(i, entry);
                }
                return DedupOutcome::Discard;
            }

            let rank = prefix_rank(&prefix);
            let mut is_dupe = true;
            for (i, existing) in self.used.iter_mut().enumerate() {
                let Some(existing_entry) = existing else {
                    continue;
                };
                if existing_entry.key != key {
                    continue;
                }
                is_dupe = true;
                if existing_entry.prefix == prefix {
                    // Byte-identical after normalization: drop the newer one.
                    break;
                }
                if existing_entry.prefix.ends_with("www.") == prefix.ends_with("www.") {
                    // Same www status, so the difference is the protocol.
                    if rank <= prefix_rank(&existing_entry.prefix) {
                        break;
                    }
                    *existing_entry = entry.clone();
                    return DedupOutcome::ReplaceAt(i, entry);
                }
                // Differs only by www.: keep both and let the downstream
                // ranking authority decide.
                is_dupe = false;
            }
            if is_dupe {
                return DedupOutcome::Discard;
            }
        }

        if let Some(id) = candidate.place_id {
            self.used_place_ids.insert((id, key.container));
        }
        DedupOutcome::Unique(entry)
    }

    /// Records an accepted entry at its output index, shifting later entries
    /// the way the output list itself shifts.
    pub fn register(&mut self, index: usize, entry: KeyedMatch) {
        if self.used.len() < index {
            self.used.resize_with(index, || None);
        }
        self.used.insert(index, Some(entry));
    }
}
