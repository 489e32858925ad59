//! Builds the parameterized queries a search runs against the store.

use crate::behavior::{Behavior, BehaviorSet};

/// Whether substring matches must start at a word boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Boundary,
    Anywhere,
}

impl MatchMode {
    /// Wire value bound to `:match_mode`.
    #[must_use]
    pub const fn bits(self) -> i64 {
        match self {
            Self::Boundary => 0,
            Self::Anywhere => 1,
        }
    }

    #[must_use]
    pub const fn from_bits(bits: i64) -> Self {
        if bits == 0 {
            Self::Boundary
        } else {
            Self::Anywhere
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Open pages with no corresponding history entry; the main query
    /// already covers the rest, so this avoids double counting.
    OpenPages,
    Main,
}

/// Named parameters bound to a store statement.
#[derive(Debug, Clone)]
pub struct QueryParams {
    pub search_string: String,
    pub match_mode: MatchMode,
    pub behavior: BehaviorSet,
    pub max_results: usize,
    pub user_context_id: Option<i64>,
    pub host: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PlacesQuery {
    pub kind: QueryKind,
    pub sql: String,
    pub params: QueryParams,
}

const SQL_OPEN_PAGES: &str = "\
SELECT NULL AS id, t.url, t.url AS title, 0 AS bookmarked, NULL AS btitle,
       NULL AS tags, t.open_count, NULL AS frecency, t.user_context_id,
       NULL AS last_visit_date, NULLIF(t.group_id, '') AS group_id
FROM open_pages t
LEFT JOIN pages h ON h.url = t.url
WHERE h.id IS NULL
  AND (t.user_context_id = :user_context_id
       OR (t.user_context_id <> -1 AND :user_context_id IS NULL))
  AND autocomplete_match(:search_string, t.url, t.url, NULL,
                         NULL, NULL, 0, t.open_count,
                         :match_mode, :search_behavior)
ORDER BY t.rowid DESC
LIMIT :max_results";

// The bookmarked flag is evaluated once so btitle and tags are skipped for
// non-bookmarked rows.
fn main_sql(conditions: &str) -> String {
    format!(
        "\
SELECT h.id, h.url, h.title,
       EXISTS(SELECT 1 FROM bookmarks WHERE page_id = h.id) AS bookmarked,
       (SELECT title FROM bookmarks
        WHERE page_id = h.id AND title NOT NULL
        ORDER BY last_modified DESC LIMIT 1) AS btitle,
       (SELECT group_concat(tag, ',') FROM bookmark_tags
        WHERE page_id = h.id) AS tags,
       t.open_count, h.frecency, t.user_context_id, h.last_visit_date,
       NULLIF(t.group_id, '') AS group_id
FROM pages h
LEFT JOIN open_pages t
       ON t.url = h.url
      AND (t.user_context_id = :user_context_id
           OR (t.user_context_id <> -1 AND :user_context_id IS NULL))
WHERE ((:switch_tabs_enabled AND t.open_count > 0) OR h.frecency <> 0)
  AND autocomplete_match(:search_string, h.url,
                         ifnull(btitle, h.title), tags,
                         h.visit_count, h.typed,
                         bookmarked, t.open_count,
                         :match_mode, :search_behavior)
  {and}{conditions}
ORDER BY h.frecency DESC, h.id DESC
LIMIT :max_results",
        and = if conditions.is_empty() { "" } else { "AND " },
    )
}

#[must_use]
pub fn open_pages_query(params: QueryParams) -> PlacesQuery {
    PlacesQuery {
        kind: QueryKind::OpenPages,
        sql: SQL_OPEN_PAGES.to_string(),
        params,
    }
}

/// Builds the main query, appending source conditions derived from the
/// behavior set and the optional host filter.
#[must_use]
pub fn main_query(params: QueryParams) -> PlacesQuery {
    let behavior = params.behavior;
    let mut conditions: Vec<String> = Vec::new();

    if params.host.is_some() {
        // Site-specific searches want a cleaner result set.
        conditions.push("page_host(h.url) = :host".to_string());
    }

    let narrowed = behavior.has(Behavior::Restrict)
        || (!behavior.has(Behavior::OpenPage)
            && (!behavior.has(Behavior::History) || !behavior.has(Behavior::Bookmark)));
    if narrowed {
        if behavior.has(Behavior::History) {
            conditions.push("h.visit_count > 0".to_string());
        }
        if behavior.has(Behavior::Bookmark) {
            conditions.push("bookmarked".to_string());
        }
        if behavior.has(Behavior::Tag) {
            conditions.push("tags NOT NULL".to_string());
        }
    }

    PlacesQuery {
        kind: QueryKind::Main,
        sql: main_sql(&conditions.join(" AND ")),
        params,
    }
}
