//! Turns store rows into styled match candidates.

use chrono::DateTime;

use crate::behavior::{Behavior, BehaviorSet};
use crate::config::SearchConfig;
use crate::engines::{SearchEngineResolver, serps_are_equivalent};
use crate::models::{
    FRECENCY_DEFAULT, MatchCandidate, MatchCategory, MatchStyle, TITLE_TAGS_SEPARATOR,
};
use crate::store::StoreRow;
use crate::tokenizer::Token;
use crate::urls::percent_decode_for_ui;

/// Per-search conversion state. Built once when a search starts and applied
/// to every row the store streams back.
pub struct RowConverter<'a> {
    config: &'a SearchConfig,
    behavior: BehaviorSet,
    resolver: Option<&'a dyn SearchEngineResolver>,
    /// Filtered text tokens of the search, used by the restyle subset check.
    tokens: &'a [Token],
    /// Url of the page the search was started from; its own tab is never
    /// offered as a switch target.
    current_page: Option<&'a str>,
    /// Container of the searching tab, compared against candidate tabs when
    /// container search is off.
    user_context_id: Option<i64>,
}

impl std::fmt::Debug for RowConverter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowConverter")
            .field("behavior", &self.behavior)
            .finish_non_exhaustive()
    }
}

impl<'a> RowConverter<'a> {
    #[must_use]
    pub fn new(
        config: &'a SearchConfig,
        behavior: BehaviorSet,
        resolver: Option<&'a dyn SearchEngineResolver>,
        tokens: &'a [Token],
        current_page: Option<&'a str>,
        user_context_id: Option<i64>,
    ) -> Self {
        Self {
            config,
            behavior,
            resolver,
            tokens,
            current_page,
            user_context_id,
        }
    }

    /// Converts one row, or drops it (`None`) when it must not be shown at
    /// all: the searching tab itself, or restyled search history while
    /// historical search suggestions are disabled.
    #[must_use]
    pub fn convert(&self, row: &StoreRow) -> Option<MatchCandidate> {
        if row.open_count > 0 && self.behavior.has(Behavior::OpenPage) {
            // Never suggest switching to the tab the user is already on.
            if self.is_current_tab(row) {
                return None;
            }
            return Some(self.tab_candidate(row));
        }
        if row.place_id.is_none() {
            return None;
        }

        if let Some(restyled) = self.restyle(row) {
            return restyled;
        }
        Some(self.page_candidate(row))
    }

    fn is_current_tab(&self, row: &StoreRow) -> bool {
        let same_url = self.current_page == Some(row.url.as_str());
        if !same_url {
            return false;
        }
        if !self.config.switch_tabs_search_all_containers {
            return true;
        }
        row.user_context_id == self.user_context_id
    }

    fn tab_candidate(&self, row: &StoreRow) -> MatchCandidate {
        MatchCandidate {
            place_id: row.place_id,
            url: row.url.clone(),
            display_url: percent_decode_for_ui(&row.url),
            title: self.display_title(row, false),
            icon: page_icon(&row.url),
            frecency: row.frecency.unwrap_or(FRECENCY_DEFAULT),
            user_context_id: row.user_context_id,
            last_visit: last_visit(row),
            open_page_group: row.group_id.clone(),
            style: MatchStyle::SwitchToTab,
            category: MatchCategory::General,
        }
    }

    fn page_candidate(&self, row: &StoreRow) -> MatchCandidate {
        // When the search is narrowed to history without bookmarks, bookmark
        // styling would contradict what the user asked for; tags still show
        // because the page carries them regardless of how it was found.
        let history_only =
            self.behavior.has(Behavior::History) && !self.behavior.has(Behavior::Bookmark);
        let has_tags = row.tags.as_deref().is_some_and(|t| !t.is_empty());

        let style = if has_tags {
            if self.behavior.has(Behavior::Bookmark) && row.bookmarked {
                MatchStyle::BookmarkTag
            } else {
                MatchStyle::Tag
            }
        } else if row.bookmarked && !history_only {
            MatchStyle::Bookmark
        } else {
            MatchStyle::Favicon
        };

        MatchCandidate {
            place_id: row.place_id,
            url: row.url.clone(),
            display_url: percent_decode_for_ui(&row.url),
            title: self.display_title(row, has_tags),
            icon: page_icon(&row.url),
            frecency: row.frecency.unwrap_or(FRECENCY_DEFAULT),
            user_context_id: row.user_context_id,
            last_visit: last_visit(row),
            open_page_group: None,
            style,
            category: MatchCategory::General,
        }
    }

    fn display_title(&self, row: &StoreRow, with_tags: bool) -> String {
        let base = row
            .bookmark_title
            .as_deref()
            .or(row.title.as_deref())
            .unwrap_or(&row.url);
        match (&row.tags, with_tags) {
            (Some(tags), true) if !tags.is_empty() => {
                format!("{base}{TITLE_TAGS_SEPARATOR}{tags}")
            }
            _ => base.to_string(),
        }
    }

    /// Recognizes a history url as a past search submission and presents it
    /// as a search action instead of a plain page.
    ///
    /// `Some(None)` means the row was recognized but must be dropped because
    /// historical search suggestions are disabled.
    fn restyle(&self, row: &StoreRow) -> Option<Option<MatchCandidate>> {
        if !self.config.restyle_searches {
            return None;
        }
        let resolver = self.resolver?;
        let parsed = resolver.parse_submission(&row.url)?;

        // Every typed token must appear in the submitted terms, otherwise
        // the match hit on the url noise rather than the search itself.
        let terms_lower = parsed.terms.to_lowercase();
        if !self
            .tokens
            .iter()
            .all(|token| terms_lower.contains(&token.lowercase))
        {
            return None;
        }

        // The history url must be the plain SERP the engine would generate,
        // up to attribution parameters; image searches, later pages and the
        // like keep their page identity.
        let generated = resolver.suggestion_url(&parsed.engine, &parsed.terms)?;
        if !serps_are_equivalent(&row.url, &generated, &parsed.terms_param) {
            return None;
        }

        if self.config.max_historical_search_suggestions == 0 {
            return Some(None);
        }
        Some(Some(MatchCandidate {
            place_id: row.place_id,
            url: row.url.clone(),
            display_url: percent_decode_for_ui(&row.url),
            title: parsed.terms.clone(),
            icon: page_icon(&row.url),
            frecency: row.frecency.unwrap_or(FRECENCY_DEFAULT),
            user_context_id: row.user_context_id,
            last_visit: last_visit(row),
            open_page_group: None,
            style: MatchStyle::SearchRestyle {
                engine: parsed.engine,
                terms: parsed.terms,
            },
            category: MatchCategory::General,
        }))
    }
}

fn page_icon(url: &str) -> String {
    format!("page-icon:{url}")
}

fn last_visit(row: &StoreRow) -> Option<chrono::DateTime<chrono::Utc>> {
    row.last_visit_date.and_then(DateTime::from_timestamp_millis)
}
