//! End-to-end runs of the search pipeline against a real sqlite store.

use std::cell::Cell;
use std::time::Instant;

use omnibar_core::engines::{StaticEngine, StaticEngineResolver};
use omnibar_core::notify::Clock;
use omnibar_core::{
    CancellationToken, MatchCandidate, MatchStyle, PlacesStore, Search, SearchConfig,
    SearchListener, SearchProvider, SearchRequest,
};

struct Recorder {
    snapshots: Vec<(Vec<MatchCandidate>, bool)>,
}

impl Recorder {
    fn new() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }

    fn final_matches(&self) -> &[MatchCandidate] {
        let (matches, ongoing) = self.snapshots.last().expect("at least one notification");
        assert!(!ongoing, "last notification must close the search");
        matches
    }
}

impl SearchListener for Recorder {
    fn on_matches(&mut self, matches: &[MatchCandidate], ongoing: bool) {
        self.snapshots.push((matches.to_vec(), ongoing));
    }
}

struct FakeClock {
    now: Cell<Instant>,
}

impl FakeClock {
    fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

fn request(search_string: &str) -> SearchRequest {
    SearchRequest {
        search_string: search_string.to_string(),
        ..SearchRequest::default()
    }
}

#[test]
fn protocol_duplicates_collapse_to_https() {
    let store = PlacesStore::open_in_memory().expect("store");
    store
        .add_page("http://example.com/", Some("Example"), 9, true, 3000.0, None)
        .expect("page");
    store
        .add_page("https://example.com/", Some("Example"), 2, false, 1000.0, None)
        .expect("page");

    let config = SearchConfig::default();
    let mut recorder = Recorder::new();
    let mut search = Search::new(&config, None, request("example"));
    search.execute(&store, &mut recorder).expect("search");

    let matches = recorder.final_matches();
    assert_eq!(matches.len(), 1);
    // The http variant arrived first on frecency order and was replaced in
    // place by its https peer.
    assert_eq!(matches[0].url, "https://example.com/");
}

#[test]
fn www_variants_are_both_kept() {
    let store = PlacesStore::open_in_memory().expect("store");
    store
        .add_page("http://www.example.com/", Some("Example"), 4, false, 2000.0, None)
        .expect("page");
    store
        .add_page("http://example.com/", Some("Example"), 3, false, 1500.0, None)
        .expect("page");

    let config = SearchConfig::default();
    let mut recorder = Recorder::new();
    let mut search = Search::new(&config, None, request("example"));
    search.execute(&store, &mut recorder).expect("search");

    // Picking the canonical host variant is the ranking authority's call,
    // not this engine's.
    assert_eq!(recorder.final_matches().len(), 2);
}

#[test]
fn open_pages_surface_as_tab_switches() {
    let store = PlacesStore::open_in_memory().expect("store");
    store
        .add_page("https://docs.example/", Some("Docs"), 6, false, 2500.0, None)
        .expect("page");
    store
        .add_open_page("https://docs.example/", 0, Some("work"))
        .expect("open");
    store
        .add_open_page("https://scratch.example/docs", 0, None)
        .expect("open");

    let config = SearchConfig::default();
    let mut recorder = Recorder::new();
    let mut search = Search::new(&config, None, request("docs"));
    search.execute(&store, &mut recorder).expect("search");

    let matches = recorder.final_matches();
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(MatchCandidate::is_tab_switch));
    let grouped = matches
        .iter()
        .find(|m| m.url == "https://docs.example/")
        .expect("history-backed tab");
    assert_eq!(grouped.open_page_group.as_deref(), Some("work"));
}

#[test]
fn the_searching_tab_never_offers_itself() {
    let store = PlacesStore::open_in_memory().expect("store");
    store
        .add_open_page("https://current.example/docs", 0, None)
        .expect("open");
    store
        .add_open_page("https://other.example/docs", 0, None)
        .expect("open");

    let config = SearchConfig::default();
    let mut req = request("docs");
    req.current_page = Some("https://current.example/docs".to_string());
    let mut recorder = Recorder::new();
    let mut search = Search::new(&config, None, req);
    search.execute(&store, &mut recorder).expect("search");

    let matches = recorder.final_matches();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].url, "https://other.example/docs");
}

#[test]
fn batching_caps_consecutive_delays() {
    let store = PlacesStore::open_in_memory().expect("store");
    for i in 0..8 {
        store
            .add_page(
                &format!("https://site{i}.example/page"),
                Some("shared page"),
                1,
                false,
                2000.0 - f64::from(i),
                None,
            )
            .expect("page");
    }

    let config = SearchConfig::default();
    let clock = FakeClock::new();
    let mut recorder = Recorder::new();
    let mut search = Search::new(&config, None, request("shared")).with_clock(&clock);
    search.execute(&store, &mut recorder).expect("search");

    // With a frozen clock no deadline ever fires; only the forced flush
    // after three consecutive delays and the final delivery get through.
    let ongoing_count = recorder
        .snapshots
        .iter()
        .filter(|(_, ongoing)| *ongoing)
        .count();
    assert_eq!(ongoing_count, 2);
    assert_eq!(recorder.final_matches().len(), 8);
}

#[test]
fn cancellation_stops_mid_stream_without_a_final_notification() {
    let store = PlacesStore::open_in_memory().expect("store");
    for i in 0..6 {
        store
            .add_page(
                &format!("https://page{i}.example/"),
                Some("page"),
                1,
                false,
                1000.0 + f64::from(i),
                None,
            )
            .expect("page");
    }

    let mut config = SearchConfig::default();
    // Flush on every match so the listener sees the stream one by one.
    config.notify_delay_cap = 0;

    struct CancelAfterFirst {
        token: CancellationToken,
        calls: usize,
    }
    impl SearchListener for CancelAfterFirst {
        fn on_matches(&mut self, _matches: &[MatchCandidate], ongoing: bool) {
            assert!(ongoing, "a cancelled search must not deliver a final list");
            self.calls += 1;
            self.token.cancel();
        }
    }

    let mut search = Search::new(&config, None, request("page"));
    let mut listener = CancelAfterFirst {
        token: search.cancellation_token(),
        calls: 0,
    };
    let matches = search.execute(&store, &mut listener).expect("search");
    assert_eq!(listener.calls, 1);
    assert_eq!(matches.len(), 1);
}

#[test]
fn provider_restyles_search_history_end_to_end() {
    let store = PlacesStore::open_in_memory().expect("store");
    store
        .add_page(
            "https://search.example.com/search?q=rust+borrowing",
            Some("rust borrowing - Example Search"),
            3,
            false,
            1200.0,
            None,
        )
        .expect("page");

    let mut config = SearchConfig::default();
    config.restyle_searches = true;
    let resolver = StaticEngineResolver::new(vec![StaticEngine {
        name: "Example Search".to_string(),
        alias: None,
        host: "search.example.com".to_string(),
        search_path: "/search".to_string(),
        terms_param: "q".to_string(),
        suggest_params: Vec::new(),
    }]);

    let mut provider = SearchProvider::new(store, config).with_resolver(Box::new(resolver));
    let mut recorder = Recorder::new();
    let matches = provider
        .start(request("rust borrowing"), &mut recorder)
        .expect("search");

    assert_eq!(matches.len(), 1);
    assert_eq!(
        matches[0].style,
        MatchStyle::SearchRestyle {
            engine: "Example Search".to_string(),
            terms: "rust borrowing".to_string(),
        }
    );
    assert_eq!(matches[0].title, "rust borrowing");
}

#[test]
fn on_disk_store_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("places.sqlite");
    {
        let store = PlacesStore::open(&path).expect("store");
        store
            .add_page("https://persisted.example/", Some("Persisted"), 2, false, 900.0, None)
            .expect("page");
    }

    let store = PlacesStore::open(&path).expect("reopen");
    let config = SearchConfig::default();
    let mut recorder = Recorder::new();
    let mut search = Search::new(&config, None, request("persisted"));
    search.execute(&store, &mut recorder).expect("search");
    assert_eq!(recorder.final_matches().len(), 1);
}
