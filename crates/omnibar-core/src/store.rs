//! Store access.
//!
//! The engine only reads; persistence belongs to the embedder. The
//! [`HistoryStore`] trait is the cancellable row-stream interface the search
//! consumes, and [`PlacesStore`] is the sqlite-backed implementation. Match
//! filtering runs inside sqlite through the `autocomplete_match` scalar
//! function so the LIMIT applies to already-filtered rows.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::ToSql;
use rusqlite::{Connection, InterruptHandle};

use crate::behavior::{Behavior, BehaviorSet};
use crate::error::Result;
use crate::query::{MatchMode, PlacesQuery, QueryKind};
use crate::urls::host_of;

/// One result row, already detached from the underlying statement.
#[derive(Debug, Clone, Default)]
pub struct StoreRow {
    pub place_id: Option<i64>,
    pub url: String,
    pub title: Option<String>,
    pub bookmarked: bool,
    pub bookmark_title: Option<String>,
    /// Comma-joined tag list, as produced by the store.
    pub tags: Option<String>,
    pub open_count: i64,
    pub frecency: Option<f64>,
    pub user_context_id: Option<i64>,
    /// Unix milliseconds.
    pub last_visit_date: Option<i64>,
    pub group_id: Option<String>,
}

/// Flow control returned by a row callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowControl {
    Continue,
    /// Stop iterating; remaining rows are abandoned.
    Stop,
}

pub trait HistoryStore {
    /// Runs a query, invoking `on_row` per row until exhaustion or until the
    /// callback asks to stop.
    fn for_each_row(
        &self,
        query: &PlacesQuery,
        on_row: &mut dyn FnMut(StoreRow) -> RowControl,
    ) -> Result<()>;

    /// Requests that an in-flight statement be abandoned. Safe to call from
    /// another thread; repeated calls while already interrupted are no-ops.
    fn interrupt(&self);
}

#[derive(Clone)]
pub struct PlacesStore {
    conn: Arc<Mutex<Connection>>,
    interrupt_handle: Arc<InterruptHandle>,
    interrupted: Arc<AtomicBool>,
}

impl std::fmt::Debug for PlacesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesStore").finish_non_exhaustive()
    }
}

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY,
    url TEXT UNIQUE NOT NULL,
    title TEXT,
    visit_count INTEGER NOT NULL DEFAULT 0,
    typed INTEGER NOT NULL DEFAULT 0,
    frecency REAL NOT NULL DEFAULT 0,
    last_visit_date INTEGER
);
CREATE TABLE IF NOT EXISTS bookmarks (
    id INTEGER PRIMARY KEY,
    page_id INTEGER NOT NULL REFERENCES pages(id),
    title TEXT,
    last_modified INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS bookmark_tags (
    page_id INTEGER NOT NULL REFERENCES pages(id),
    tag TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS open_pages (
    url TEXT NOT NULL,
    user_context_id INTEGER NOT NULL DEFAULT 0,
    open_count INTEGER NOT NULL DEFAULT 1,
    group_id TEXT
);
CREATE INDEX IF NOT EXISTS pages_frecency ON pages(frecency DESC);
CREATE INDEX IF NOT EXISTS open_pages_url ON open_pages(url);
";

impl PlacesStore {
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn open(path: &std::path::Path) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        register_functions(&conn)?;
        let interrupt_handle = Arc::new(conn.get_interrupt_handle());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            interrupt_handle,
            interrupted: Arc::new(AtomicBool::new(false)),
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let guard = self
            .conn
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&guard)
    }

    pub fn add_page(
        &self,
        url: &str,
        title: Option<&str>,
        visit_count: i64,
        typed: bool,
        frecency: f64,
        last_visit_date: Option<i64>,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO pages(url, title, visit_count, typed, frecency, last_visit_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(url) DO UPDATE SET
                   title=excluded.title,
                   visit_count=excluded.visit_count,
                   typed=excluded.typed,
                   frecency=excluded.frecency,
                   last_visit_date=excluded.last_visit_date",
                rusqlite::params![url, title, visit_count, typed, frecency, last_visit_date],
            )?;
            let id = conn.query_row("SELECT id FROM pages WHERE url = ?1", [url], |row| {
                row.get(0)
            })?;
            Ok(id)
        })
    }

    pub fn add_bookmark(&self, url: &str, title: Option<&str>, tags: &[&str]) -> Result<()> {
        self.with_conn(|conn| {
            let page_id: i64 =
                conn.query_row("SELECT id FROM pages WHERE url = ?1", [url], |row| {
                    row.get(0)
                })?;
            conn.execute(
                "INSERT INTO bookmarks(page_id, title, last_modified)
                 VALUES (?1, ?2, strftime('%s', 'now'))",
                rusqlite::params![page_id, title],
            )?;
            for tag in tags {
                conn.execute(
                    "INSERT INTO bookmark_tags(page_id, tag) VALUES (?1, ?2)",
                    rusqlite::params![page_id, tag],
                )?;
            }
            Ok(())
        })
    }

    pub fn add_open_page(
        &self,
        url: &str,
        user_context_id: i64,
        group_id: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO open_pages(url, user_context_id, open_count, group_id)
                 VALUES (?1, ?2, 1, ?3)",
                rusqlite::params![url, user_context_id, group_id],
            )?;
            Ok(())
        })
    }
}

impl HistoryStore for PlacesStore {
    fn for_each_row(
        &self,
        query: &PlacesQuery,
        on_row: &mut dyn FnMut(StoreRow) -> RowControl,
    ) -> Result<()> {
        self.interrupted.store(false, Ordering::SeqCst);
        let result = self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(&query.sql)?;

            let p = &query.params;
            let behavior_bits = i64::from(p.behavior.bits());
            let match_mode = p.match_mode.bits();
            let max_results = p.max_results as i64;
            let switch_tabs_enabled = p.behavior.has(Behavior::OpenPage);

            let mut named: Vec<(&str, &dyn ToSql)> = vec![
                (":search_string", &p.search_string),
                (":match_mode", &match_mode),
                (":search_behavior", &behavior_bits),
                (":max_results", &max_results),
                (":user_context_id", &p.user_context_id),
            ];
            if query.kind == QueryKind::Main {
                named.push((":switch_tabs_enabled", &switch_tabs_enabled));
                if p.host.is_some() {
                    named.push((":host", &p.host));
                }
            }

            let mut rows = stmt.query(named.as_slice())?;
            while let Some(row) = rows.next()? {
                let store_row = StoreRow {
                    place_id: row.get("id")?,
                    url: row.get("url")?,
                    title: row.get("title")?,
                    bookmarked: row.get("bookmarked")?,
                    bookmark_title: row.get("btitle")?,
                    tags: row.get("tags")?,
                    open_count: row.get::<_, Option<i64>>("open_count")?.unwrap_or(0),
                    frecency: row.get("frecency")?,
                    user_context_id: row.get("user_context_id")?,
                    last_visit_date: row.get("last_visit_date")?,
                    group_id: row.get("group_id")?,
                };
                if on_row(store_row) == RowControl::Stop {
                    break;
                }
            }
            Ok(())
        });

        match result {
            Err(crate::error::OmnibarError::Store(err)) if is_interrupt(&err) => {
                // Cancellation is cooperative, not an error.
                Ok(())
            }
            other => other,
        }
    }

    fn interrupt(&self) {
        // One interrupt per in-flight statement is enough; a higher-priority
        // caller may already have interrupted the connection.
        if !self.interrupted.swap(true, Ordering::SeqCst) {
            self.interrupt_handle.interrupt();
        }
    }
}

fn is_interrupt(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(rusqlite::ErrorCode::OperationInterrupted)
    )
}

fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "autocomplete_match",
        10,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(autocomplete_match(ctx)?),
    )?;
    conn.create_scalar_function(
        "page_host",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let url: String = ctx.get(0)?;
            Ok(host_of(&url).map(str::to_string))
        },
    )?;
    Ok(())
}

/// The in-database match predicate.
///
/// Arguments: search string, url, title, tags, visit count, typed flag,
/// bookmarked flag, open page count, match mode, behavior bits.
fn autocomplete_match(ctx: &Context<'_>) -> rusqlite::Result<bool> {
    let search: Option<String> = ctx.get(0)?;
    let url: Option<String> = ctx.get(1)?;
    let title: Option<String> = ctx.get(2)?;
    let tags: Option<String> = ctx.get(3)?;
    let visit_count: Option<i64> = ctx.get(4)?;
    let typed: Option<i64> = ctx.get(5)?;
    let bookmarked: Option<i64> = ctx.get(6)?;
    let open_count: Option<i64> = ctx.get(7)?;
    let match_mode = MatchMode::from_bits(ctx.get::<i64>(8)?);
    let behavior = BehaviorSet::from_bits(ctx.get::<i64>(9)? as u16);

    let url = url.unwrap_or_default();
    if url.starts_with("javascript:") && !behavior.has(Behavior::Javascript) {
        return Ok(false);
    }

    let visited = visit_count.unwrap_or(0) > 0 || typed.unwrap_or(0) > 0;
    let is_bookmarked = bookmarked.unwrap_or(0) != 0;
    let has_tags = tags.as_deref().is_some_and(|t| !t.is_empty());
    let is_open = open_count.unwrap_or(0) > 0;

    if !source_matches(behavior, visited, is_bookmarked, has_tags, is_open) {
        return Ok(false);
    }

    let search = search.unwrap_or_default();
    if search.trim().is_empty() {
        return Ok(true);
    }

    let url_lower = url.to_lowercase();
    let title_lower = title.unwrap_or_default().to_lowercase();
    let tags_lower = tags.unwrap_or_default().to_lowercase();

    for token in search.split_whitespace() {
        let token = token.to_lowercase();
        let in_title = text_contains(&title_lower, &token, match_mode)
            || text_contains(&tags_lower, &token, match_mode);
        let in_url = text_contains(&url_lower, &token, match_mode);
        let matched = match (behavior.has(Behavior::Title), behavior.has(Behavior::Url)) {
            (true, true) => in_title && in_url,
            (true, false) => in_title,
            (false, true) => in_url,
            (false, false) => in_title || in_url,
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn source_matches(
    behavior: BehaviorSet,
    visited: bool,
    bookmarked: bool,
    has_tags: bool,
    open: bool,
) -> bool {
    let sources = [
        (Behavior::History, visited),
        (Behavior::Bookmark, bookmarked),
        (Behavior::Tag, has_tags),
        (Behavior::OpenPage, open),
    ];
    if behavior.has(Behavior::Restrict) {
        // Restriction intersects: every requested source must hold.
        return sources
            .iter()
            .all(|(source, holds)| !behavior.has(*source) || *holds);
    }
    let mut any_requested = false;
    for (source, holds) in sources {
        if behavior.has(source) {
            any_requested = true;
            if holds {
                return true;
            }
        }
    }
    !any_requested
}

/// Case-insensitive containment; in boundary mode the match must start at a
/// word boundary.
fn text_contains(haystack: &str, needle: &str, mode: MatchMode) -> bool {
    if needle.is_empty() {
        return true;
    }
    match mode {
        MatchMode::Anywhere => haystack.contains(needle),
        MatchMode::Boundary => haystack.match_indices(needle).any(|(idx, _)| {
            idx == 0
                || haystack[..idx]
                    .chars()
                    .next_back()
                    .is_some_and(|c| !c.is_alphanumeric())
        }),
    }
}
