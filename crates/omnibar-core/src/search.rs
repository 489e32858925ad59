//! The search orchestrator.
//!
//! A [`Search`] runs one query string to completion: tokenize, compose the
//! behavior set, stream rows out of the store in a boundary-matching pass,
//! widen to anywhere-matching when too few results came back, and deliver
//! the growing ranked list to the listener under batching and cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::behavior::{Behavior, BehaviorSet, Source, filter_tokens};
use crate::config::SearchConfig;
use crate::convert::RowConverter;
use crate::dedup::{DedupOutcome, Deduplicator};
use crate::engines::SearchEngineResolver;
use crate::error::{OmnibarError, Result};
use crate::models::{MatchCandidate, MatchCategory, SearchListener};
use crate::notify::{Clock, ResultNotifier, SystemClock};
use crate::query::{MatchMode, PlacesQuery, QueryParams, main_query, open_pages_query};
use crate::slots::{ResultGroupNode, SlotAllocator};
use crate::store::{HistoryStore, RowControl};
use crate::tokenizer::{RESTRICT_SEARCH, Token, tokenize};
use crate::urls::strip_url_prefix;

static SYSTEM_CLOCK: SystemClock = SystemClock;

/// One search as issued by the consumer.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub search_string: String,
    /// Overrides token-derived behavior with a single source.
    pub restrict_source: Option<Source>,
    /// Url of the page the search is typed on; it is excluded from tab
    /// switching.
    pub current_page: Option<String>,
    /// Container of the searching tab.
    pub user_context_id: Option<i64>,
    /// Engine the consumer entered search mode with; pins results to the
    /// engine's domain.
    pub search_mode_engine: Option<String>,
}

/// Cooperative cancellation shared between the searching thread and
/// whoever wants to stop it.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Created,
    Running,
    /// Cancelled before completion; the listener hears nothing further.
    Stopped,
    Completed,
}

pub struct Search<'a> {
    config: &'a SearchConfig,
    resolver: Option<&'a dyn SearchEngineResolver>,
    clock: &'a dyn Clock,
    request: SearchRequest,
    token: CancellationToken,
    state: SearchState,
    heuristic_token: Option<Token>,
}

impl std::fmt::Debug for Search<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Search")
            .field("state", &self.state)
            .field("search_string", &self.request.search_string)
            .finish_non_exhaustive()
    }
}

struct Collector<'a, 'b> {
    matches: Vec<MatchCandidate>,
    dedup: Deduplicator,
    slots: SlotAllocator,
    notifier: ResultNotifier,
    listener: &'b mut dyn SearchListener,
    clock: &'a dyn Clock,
    general_count: usize,
}

impl Collector<'_, '_> {
    fn add(&mut self, candidate: MatchCandidate, config: &SearchConfig) {
        match self.dedup.decide(&candidate, config) {
            DedupOutcome::Discard => {}
            DedupOutcome::ReplaceAt(index, _entry) => {
                if index < self.matches.len() {
                    self.matches[index] = candidate;
                    self.notify(true);
                }
            }
            DedupOutcome::Unique(entry) => {
                let Some(index) = self.slots.allocate(candidate.category) else {
                    // Every compatible group is full.
                    return;
                };
                if candidate.category == MatchCategory::General {
                    self.general_count += 1;
                }
                let index = index.min(self.matches.len());
                self.matches.insert(index, candidate);
                self.dedup.register(index, entry);
                self.notify(true);
            }
        }
    }

    /// Delivers the current list, batched while the search is ongoing.
    fn notify(&mut self, ongoing: bool) {
        if !ongoing {
            self.notifier.cancel();
            self.listener.on_matches(&self.matches, false);
            return;
        }
        // An expired deadline fires before the new update re-arms it,
        // otherwise a sparse row stream would starve delivery.
        let now = self.clock.now();
        if self.notifier.poll(now) || self.notifier.request(now) {
            self.listener.on_matches(&self.matches, true);
        }
    }
}

impl<'a> Search<'a> {
    #[must_use]
    pub fn new(
        config: &'a SearchConfig,
        resolver: Option<&'a dyn SearchEngineResolver>,
        request: SearchRequest,
    ) -> Self {
        Self {
            config,
            resolver,
            clock: &SYSTEM_CLOCK,
            request,
            token: CancellationToken::new(),
            state: SearchState::Created,
            heuristic_token: None,
        }
    }

    /// Replaces the time source; batching tests drive a fake clock.
    #[must_use]
    pub fn with_clock(mut self, clock: &'a dyn Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Shared handle that cancels this search from anywhere.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    #[must_use]
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// First searched token when the user's string starts with it; the
    /// downstream ranking authority uses it to build its top result.
    #[must_use]
    pub fn heuristic_token(&self) -> Option<&Token> {
        self.heuristic_token.as_ref()
    }

    pub fn stop(&mut self) {
        self.token.cancel();
        if self.state == SearchState::Running {
            self.state = SearchState::Stopped;
        }
    }

    /// Runs the search to completion, streaming the ranked list into
    /// `listener`. The collected matches are also returned.
    ///
    /// A cancelled search stops silently: no further notification, not even
    /// the final one. A store failure keeps the matches collected so far,
    /// which are delivered before the error propagates.
    pub fn execute(
        &mut self,
        store: &dyn HistoryStore,
        listener: &mut dyn SearchListener,
    ) -> Result<Vec<MatchCandidate>> {
        if self.config.max_results == 0 {
            return Err(OmnibarError::Validation(
                "max_results must be at least 1".to_string(),
            ));
        }
        self.state = SearchState::Running;
        let trimmed = self.request.search_string.trim().to_string();
        tracing::debug!(search_string = %trimmed, "starting places search");

        // A typed scheme is stripped before matching so "http://moz" still
        // finds the https page; the search heuristic reconstructs it.
        let (typed_prefix, search_text) = strip_url_prefix(&trimmed);
        let tokens = tokenize(&search_text);
        let leading_restriction = leading_restriction(&tokens);

        // Typing a lone "@" is the start of an engine alias, not a search.
        if trimmed == "@"
            && self
                .resolver
                .is_some_and(SearchEngineResolver::has_token_alias_engines)
        {
            return self.finish_empty(listener);
        }

        // A short string that is just the search marker can't produce
        // anything the search heuristic won't.
        if trimmed.chars().count() <= 3
            && leading_restriction.is_some_and(|t| t.value.starts_with(RESTRICT_SEARCH))
        {
            return self.finish_empty(listener);
        }

        let (mut behavior, mut filtered) = if tokens.is_empty() {
            (BehaviorSet::empty_search_default(self.config), Vec::new())
        } else {
            filter_tokens(tokens, BehaviorSet::default_for(self.config))?
        };
        if let Some(source) = self.request.restrict_source {
            behavior = BehaviorSet::restrict_to(source);
        }
        if !self.config.filter_javascript {
            behavior.insert(Behavior::Javascript);
        }

        // Restricting to search is delegated entirely to the search
        // provider; this engine contributes nothing.
        if behavior.has(Behavior::Restrict) && behavior.has(Behavior::Search) {
            return self.finish_empty(listener);
        }

        // The heuristic token only exists when the user actually typed it
        // first; a stripped scheme or an explicit source restriction
        // discards it.
        self.heuristic_token = filtered
            .first()
            .filter(|t| {
                typed_prefix.is_empty()
                    && trimmed.starts_with(&t.value)
                    && self.request.restrict_source.is_none()
            })
            .cloned();

        let host = self.resolve_host(&mut filtered);
        let search_string = filtered
            .iter()
            .map(|t| t.value.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let converter = RowConverter::new(
            self.config,
            behavior,
            self.resolver,
            &filtered,
            self.request.current_page.as_deref(),
            self.request.user_context_id,
        );
        let mut collector = Collector {
            matches: Vec::new(),
            dedup: Deduplicator::new(),
            slots: SlotAllocator::new(&ResultGroupNode::default_tree(), self.config.max_results),
            notifier: ResultNotifier::new(
                Duration::from_millis(self.config.notify_delay_ms),
                self.config.notify_delay_cap,
            ),
            listener,
            clock: self.clock,
            general_count: 0,
        };

        let mut result = self.run_pass(
            store,
            &converter,
            &mut collector,
            MatchMode::Boundary,
            behavior,
            &search_string,
            host.as_deref(),
        );
        if result.is_ok()
            && !self.token.is_cancelled()
            && collector.general_count < self.config.max_results
            && !search_string.is_empty()
        {
            // Word-boundary matching came up short; take anything.
            result = self.run_pass(
                store,
                &converter,
                &mut collector,
                MatchMode::Anywhere,
                behavior,
                &search_string,
                host.as_deref(),
            );
        }

        if self.token.is_cancelled() {
            self.state = SearchState::Stopped;
            collector.notifier.cancel();
            return Ok(collector.matches);
        }

        collector.notify(false);
        self.state = SearchState::Completed;
        result.map(|()| collector.matches)
    }

    /// First-token keyword and alias handling. An alias engine or a
    /// bindable keyword removes the first token from the searched string
    /// and pins the result set to the engine's or keyword's host.
    fn resolve_host(&self, filtered: &mut Vec<Token>) -> Option<String> {
        if let Some(engine) = &self.request.search_mode_engine {
            return self.resolver.and_then(|r| r.engine_host(engine));
        }
        let resolver = self.resolver?;
        let first = filtered.first()?.value.clone();
        if filtered.len() < 2 {
            return None;
        }
        if let Some(engine) = resolver.engine_for_alias(&first) {
            filtered.remove(0);
            return resolver.engine_host(&engine);
        }
        if let Some(host) = resolver.keyword_host(&first) {
            filtered.remove(0);
            return Some(host);
        }
        None
    }

    #[allow(clippy::too_many_arguments)]
    fn run_pass(
        &self,
        store: &dyn HistoryStore,
        converter: &RowConverter<'_>,
        collector: &mut Collector<'_, '_>,
        match_mode: MatchMode,
        behavior: BehaviorSet,
        search_string: &str,
        host: Option<&str>,
    ) -> Result<()> {
        let params = QueryParams {
            search_string: search_string.to_string(),
            match_mode,
            behavior,
            max_results: self.config.overfetch_limit(),
            user_context_id: self.effective_context_id(),
            host: host.map(str::to_string),
        };

        let mut queries: Vec<PlacesQuery> = Vec::with_capacity(2);
        if behavior.has(Behavior::OpenPage) {
            queries.push(open_pages_query(params.clone()));
        }
        queries.push(main_query(params));

        for query in &queries {
            if self.token.is_cancelled() {
                return Ok(());
            }
            let max_results = self.config.max_results;
            let token = &self.token;
            let config = self.config;
            store.for_each_row(query, &mut |row| {
                if token.is_cancelled() || collector.general_count >= max_results {
                    return RowControl::Stop;
                }
                if let Some(candidate) = converter.convert(&row) {
                    collector.add(candidate, config);
                }
                RowControl::Continue
            })?;
        }
        Ok(())
    }

    fn effective_context_id(&self) -> Option<i64> {
        if self.config.switch_tabs_search_all_containers {
            None
        } else {
            self.request.user_context_id.or(Some(0))
        }
    }

    fn finish_empty(&mut self, listener: &mut dyn SearchListener) -> Result<Vec<MatchCandidate>> {
        if !self.token.is_cancelled() {
            listener.on_matches(&[], false);
            self.state = SearchState::Completed;
        } else {
            self.state = SearchState::Stopped;
        }
        Ok(Vec::new())
    }
}

/// Owns the store and runs one search at a time, cancelling the previous
/// one when a new query string arrives.
pub struct SearchProvider<S: HistoryStore> {
    store: S,
    config: SearchConfig,
    resolver: Option<Box<dyn SearchEngineResolver>>,
    active: Option<CancellationToken>,
}

impl<S: HistoryStore> std::fmt::Debug for SearchProvider<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchProvider").finish_non_exhaustive()
    }
}

impl<S: HistoryStore> SearchProvider<S> {
    #[must_use]
    pub fn new(store: S, config: SearchConfig) -> Self {
        Self {
            store,
            config,
            resolver: None,
            active: None,
        }
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: Box<dyn SearchEngineResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn start(
        &mut self,
        request: SearchRequest,
        listener: &mut dyn SearchListener,
    ) -> Result<Vec<MatchCandidate>> {
        self.stop();
        let mut search = Search::new(&self.config, self.resolver.as_deref(), request);
        self.active = Some(search.cancellation_token());
        let result = search.execute(&self.store, listener);
        if let Err(err) = &result {
            tracing::warn!(error = %err, "places search failed");
        }
        self.active = None;
        result
    }

    /// Cancels the in-flight search, interrupting its store statement.
    pub fn stop(&mut self) {
        if let Some(token) = self.active.take() {
            token.cancel();
            self.store.interrupt();
        }
    }
}

fn leading_restriction(tokens: &[Token]) -> Option<&Token> {
    let first = tokens.first()?;
    if !first.kind.is_restriction() {
        return None;
    }
    // A lone marker is only meaningful for search, which can stand alone.
    if tokens.len() > 1 || first.value.starts_with(RESTRICT_SEARCH) {
        Some(first)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::{StaticEngine, StaticEngineResolver};
    use crate::models::MatchStyle;
    use crate::store::PlacesStore;

    struct Recorder {
        snapshots: Vec<(Vec<String>, bool)>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                snapshots: Vec::new(),
            }
        }

        fn final_urls(&self) -> Vec<String> {
            self.snapshots
                .last()
                .map(|(urls, _)| urls.clone())
                .unwrap_or_default()
        }
    }

    impl SearchListener for Recorder {
        fn on_matches(&mut self, matches: &[MatchCandidate], ongoing: bool) {
            self.snapshots
                .push((matches.iter().map(|m| m.url.clone()).collect(), ongoing));
        }
    }

    fn seeded_store() -> PlacesStore {
        let store = PlacesStore::open_in_memory().expect("store");
        store
            .add_page("https://mozilla.org/", Some("Mozilla Home"), 10, true, 3000.0, Some(1_700_000_000_000))
            .expect("page");
        store
            .add_page("https://rust-lang.org/", Some("Rust Language"), 5, false, 2000.0, None)
            .expect("page");
        store
            .add_page("https://example.com/campfire", Some("Campfire songs"), 1, false, 500.0, None)
            .expect("page");
        store
    }

    fn request(search_string: &str) -> SearchRequest {
        SearchRequest {
            search_string: search_string.to_string(),
            ..SearchRequest::default()
        }
    }

    #[test]
    fn search_completes_with_a_final_notification() {
        let config = SearchConfig::default();
        let store = seeded_store();
        let mut recorder = Recorder::new();
        let mut search = Search::new(&config, None, request("moz"));
        let matches = search.execute(&store, &mut recorder).expect("search");

        assert_eq!(search.state(), SearchState::Completed);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].url, "https://mozilla.org/");
        let (_, ongoing) = recorder.snapshots.last().expect("final notification");
        assert!(!ongoing);
    }

    #[test]
    fn widening_finds_mid_word_matches() {
        let config = SearchConfig::default();
        let store = seeded_store();
        let mut recorder = Recorder::new();
        // "fire" only matches "campfire" mid-word.
        let mut search = Search::new(&config, None, request("fire"));
        let matches = search.execute(&store, &mut recorder).expect("search");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].url, "https://example.com/campfire");
    }

    #[test]
    fn no_widening_once_the_limit_is_reached() {
        let mut config = SearchConfig::default();
        config.max_results = 1;
        let store = seeded_store();
        store
            .add_page("https://fire.example/", Some("Fire station"), 2, false, 1000.0, None)
            .expect("page");

        let mut recorder = Recorder::new();
        let mut search = Search::new(&config, None, request("fire"));
        let matches = search.execute(&store, &mut recorder).expect("search");
        // The boundary pass filled the budget; campfire never surfaces.
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].url, "https://fire.example/");
    }

    #[test]
    fn cancellation_silences_the_listener() {
        let config = SearchConfig::default();
        let store = seeded_store();
        let mut recorder = Recorder::new();
        let mut search = Search::new(&config, None, request("moz"));
        search.cancellation_token().cancel();
        search.execute(&store, &mut recorder).expect("search");

        assert_eq!(search.state(), SearchState::Stopped);
        assert!(recorder.snapshots.iter().all(|(_, ongoing)| *ongoing));
    }

    #[test]
    fn lone_at_sign_yields_nothing_with_alias_engines() {
        let config = SearchConfig::default();
        let store = seeded_store();
        let resolver = StaticEngineResolver::new(vec![StaticEngine {
            name: "Example Search".to_string(),
            alias: Some("@ex".to_string()),
            host: "search.example.com".to_string(),
            search_path: "/search".to_string(),
            terms_param: "q".to_string(),
            suggest_params: Vec::new(),
        }]);
        let mut recorder = Recorder::new();
        let mut search = Search::new(&config, Some(&resolver), request("@"));
        let matches = search.execute(&store, &mut recorder).expect("search");
        assert!(matches.is_empty());
        assert_eq!(search.state(), SearchState::Completed);
    }

    #[test]
    fn search_restriction_alone_terminates_early() {
        let config = SearchConfig::default();
        let store = seeded_store();
        let mut recorder = Recorder::new();
        let mut search = Search::new(&config, None, request("?"));
        let matches = search.execute(&store, &mut recorder).expect("search");
        assert!(matches.is_empty());

        // Restricting to search with real terms terminates too.
        let mut search = Search::new(&config, None, request("? mozilla"));
        let matches = search.execute(&store, &mut recorder).expect("search");
        assert!(matches.is_empty());
    }

    #[test]
    fn keyword_first_token_pins_the_host() {
        let config = SearchConfig::default();
        let store = seeded_store();
        store
            .add_page("https://bugs.example.com/show?id=1", Some("A moz bug"), 2, false, 900.0, None)
            .expect("page");
        let mut resolver = StaticEngineResolver::default();
        resolver.add_keyword("bug", "bugs.example.com");

        let mut recorder = Recorder::new();
        let mut search = Search::new(&config, Some(&resolver), request("bug moz"));
        let matches = search.execute(&store, &mut recorder).expect("search");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].url, "https://bugs.example.com/show?id=1");
    }

    #[test]
    fn restriction_tokens_narrow_the_sources() {
        let config = SearchConfig::default();
        let store = seeded_store();
        store
            .add_page("https://saved.example/", Some("Saved mozilla notes"), 0, false, 800.0, None)
            .expect("page");
        store
            .add_bookmark("https://saved.example/", Some("Saved mozilla notes"), &[])
            .expect("bookmark");

        let mut recorder = Recorder::new();
        let mut search = Search::new(&config, None, request("* moz"));
        let matches = search.execute(&store, &mut recorder).expect("search");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].url, "https://saved.example/");
        assert_eq!(matches[0].style, MatchStyle::Bookmark);
    }

    #[test]
    fn explicit_source_restriction_overrides_tokens() {
        let config = SearchConfig::default();
        let store = seeded_store();
        store
            .add_open_page("https://open.example/mozilla", 0, None)
            .expect("open");

        let mut req = request("moz");
        req.restrict_source = Some(Source::Tabs);
        let mut recorder = Recorder::new();
        let mut search = Search::new(&config, None, req);
        let matches = search.execute(&store, &mut recorder).expect("search");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].url, "https://open.example/mozilla");
        assert!(matches[0].is_tab_switch());
        assert!(search.heuristic_token().is_none());
    }

    #[test]
    fn empty_search_returns_restricted_defaults() {
        let config = SearchConfig::default();
        let store = seeded_store();
        let mut recorder = Recorder::new();
        let mut search = Search::new(&config, None, request("   "));
        let matches = search.execute(&store, &mut recorder).expect("search");
        // Every seeded page has visits, ordered by frecency.
        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].url, "https://mozilla.org/");
    }

    #[test]
    fn heuristic_token_requires_leading_position() {
        let config = SearchConfig::default();
        let store = seeded_store();
        let mut recorder = Recorder::new();

        let mut search = Search::new(&config, None, request("moz home"));
        search.execute(&store, &mut recorder).expect("search");
        assert_eq!(search.heuristic_token().map(|t| t.value.as_str()), Some("moz"));

        // A restriction marker in front displaces the typed string.
        let mut search = Search::new(&config, None, request("^ moz"));
        search.execute(&store, &mut recorder).expect("search");
        assert!(search.heuristic_token().is_none());
    }

    #[test]
    fn typed_scheme_still_matches_other_protocols() {
        let config = SearchConfig::default();
        let store = seeded_store();
        let mut recorder = Recorder::new();
        let mut search = Search::new(&config, None, request("http://moz"));
        let matches = search.execute(&store, &mut recorder).expect("search");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].url, "https://mozilla.org/");
        // The stripped scheme displaces the typed string, so no heuristic
        // token either.
        assert!(search.heuristic_token().is_none());
    }

    #[test]
    fn expired_batch_deadline_fires_on_the_next_row() {
        use std::cell::Cell;
        use std::time::Instant;

        // Each reading moves time 10ms forward, past the 8ms batch delay.
        struct SteppingClock(Cell<Instant>);
        impl Clock for SteppingClock {
            fn now(&self) -> Instant {
                let now = self.0.get();
                self.0.set(now + Duration::from_millis(10));
                now
            }
        }

        let config = SearchConfig::default();
        let store = PlacesStore::open_in_memory().expect("store");
        for i in 0..3 {
            store
                .add_page(&format!("https://page{i}.example/"), Some("page"), 1, false, 1000.0, None)
                .expect("page");
        }

        let clock = SteppingClock(Cell::new(Instant::now()));
        let mut recorder = Recorder::new();
        let mut search = Search::new(&config, None, request("page")).with_clock(&clock);
        let matches = search.execute(&store, &mut recorder).expect("search");
        assert_eq!(matches.len(), 3);

        // The deadline armed by the first row has expired by the second;
        // that update is delivered instead of being deferred to the end.
        let ongoing = recorder
            .snapshots
            .iter()
            .filter(|(_, ongoing)| *ongoing)
            .count();
        assert_eq!(ongoing, 1);
        assert_eq!(recorder.snapshots.last().map(|(urls, _)| urls.len()), Some(3));
    }

    #[test]
    fn zero_max_results_is_rejected() {
        let mut config = SearchConfig::default();
        config.max_results = 0;
        let store = seeded_store();
        let mut recorder = Recorder::new();
        let mut search = Search::new(&config, None, request("moz"));
        let err = search.execute(&store, &mut recorder).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_FAILED");
        assert!(recorder.snapshots.is_empty());
    }

    #[test]
    fn provider_stop_cancels_the_active_token() {
        let config = SearchConfig::default();
        let mut provider = SearchProvider::new(seeded_store(), config);
        let mut recorder = Recorder::new();
        let matches = provider
            .start(request("moz"), &mut recorder)
            .expect("search");
        assert_eq!(matches.len(), 1);
        assert_eq!(recorder.final_urls(), vec!["https://mozilla.org/".to_string()]);
        provider.stop();
    }
}
