use chrono::{DateTime, Utc};
use serde::Serialize;

/// Default relevance score for rows that carry none.
pub const FRECENCY_DEFAULT: f64 = 1000.0;

/// Separates the page title from its appended tags. Downstream consumers
/// split on this to render tags separately.
pub const TITLE_TAGS_SEPARATOR: &str = " \u{2013} ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCategory {
    Heuristic,
    General,
    Suggestion,
    Extension,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MatchStyle {
    /// A plain history page.
    Favicon,
    Bookmark,
    /// A history page that carries tags but is not presented as a bookmark.
    Tag,
    BookmarkTag,
    /// An already-open page, offered as "switch to it".
    SwitchToTab,
    /// A history url recognized as a search submission and presented as a
    /// search action.
    SearchRestyle { engine: String, terms: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate {
    pub place_id: Option<i64>,
    pub url: String,
    /// Percent-decoded rendition of `url` for presentation.
    pub display_url: String,
    pub title: String,
    pub icon: String,
    pub frecency: f64,
    pub user_context_id: Option<i64>,
    pub last_visit: Option<DateTime<Utc>>,
    pub open_page_group: Option<String>,
    pub style: MatchStyle,
    pub category: MatchCategory,
}

impl MatchCandidate {
    #[must_use]
    pub fn is_tab_switch(&self) -> bool {
        matches!(self.style, MatchStyle::SwitchToTab)
    }
}

/// Receives the full current ranked list, not a delta.
pub trait SearchListener {
    fn on_matches(&mut self, matches: &[MatchCandidate], search_ongoing: bool);
}

impl<F: FnMut(&[MatchCandidate], bool)> SearchListener for F {
    fn on_matches(&mut self, matches: &[MatchCandidate], search_ongoing: bool) {
        self(matches, search_ongoing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Consumers deserialize these payloads by field name; the wire shape is
    // a contract.
    #[test]
    fn match_serialization_follows_the_snake_case_contract() {
        let candidate = MatchCandidate {
            place_id: Some(7),
            url: "https://search.example/q?q=rust".to_string(),
            display_url: "https://search.example/q?q=rust".to_string(),
            title: "rust".to_string(),
            icon: "page-icon:https://search.example/q?q=rust".to_string(),
            frecency: FRECENCY_DEFAULT,
            user_context_id: None,
            last_visit: None,
            open_page_group: None,
            style: MatchStyle::SearchRestyle {
                engine: "Example".to_string(),
                terms: "rust".to_string(),
            },
            category: MatchCategory::General,
        };
        let value = serde_json::to_value(&candidate).expect("serialize match");
        assert_eq!(value["category"], "general");
        assert_eq!(value["style"]["kind"], "search_restyle");
        assert_eq!(value["style"]["engine"], "Example");
        assert_eq!(value["place_id"], 7);
    }

    #[test]
    fn plain_styles_serialize_as_bare_tags() {
        let value = serde_json::to_value(MatchStyle::SwitchToTab).expect("serialize style");
        assert_eq!(value["kind"], "switch_to_tab");
    }
}
