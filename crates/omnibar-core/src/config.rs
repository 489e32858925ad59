//! Runtime knobs for the autocomplete engine.
//!
//! Defaults match shipping behavior; every knob can be overridden through an
//! `OMNIBAR_*` environment variable so embedders can tune a deployment
//! without recompiling.

const ENV_SUGGEST_HISTORY: &str = "OMNIBAR_SUGGEST_HISTORY";
const ENV_SUGGEST_BOOKMARK: &str = "OMNIBAR_SUGGEST_BOOKMARK";
const ENV_SUGGEST_OPENPAGE: &str = "OMNIBAR_SUGGEST_OPENPAGE";
const ENV_FILTER_JAVASCRIPT: &str = "OMNIBAR_FILTER_JAVASCRIPT";
const ENV_RESTYLE_SEARCHES: &str = "OMNIBAR_RESTYLE_SEARCHES";
const ENV_MAX_RESULTS: &str = "OMNIBAR_MAX_RESULTS";
const ENV_MAX_HISTORICAL_SEARCH_SUGGESTIONS: &str = "OMNIBAR_MAX_HISTORICAL_SEARCH_SUGGESTIONS";
const ENV_SWITCH_TABS_ALL_CONTAINERS: &str = "OMNIBAR_SWITCH_TABS_ALL_CONTAINERS";
const ENV_NOTIFY_DELAY_MS: &str = "OMNIBAR_NOTIFY_DELAY_MS";
const ENV_NOTIFY_DELAY_CAP: &str = "OMNIBAR_NOTIFY_DELAY_CAP";

const DEFAULT_MAX_RESULTS: usize = 10;
const DEFAULT_MAX_HISTORICAL_SEARCH_SUGGESTIONS: usize = 2;
const DEFAULT_NOTIFY_DELAY_MS: u64 = 8;
const DEFAULT_NOTIFY_DELAY_CAP: u32 = 3;

#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Include history pages in the default behavior.
    pub suggest_history: bool,
    /// Include bookmarked pages in the default behavior.
    pub suggest_bookmark: bool,
    /// Include currently open pages in the default behavior.
    pub suggest_openpage: bool,
    /// When true, `javascript:` urls are excluded unless explicitly enabled.
    pub filter_javascript: bool,
    /// Restyle history urls that parse as search engine submissions.
    pub restyle_searches: bool,
    /// Requested maximum number of results delivered to the consumer.
    pub max_results: usize,
    /// When zero, restyled search history matches are dropped entirely.
    pub max_historical_search_suggestions: usize,
    /// Match open pages across all containers instead of only the caller's.
    pub switch_tabs_search_all_containers: bool,
    /// Delay before a batched listener notification fires.
    pub notify_delay_ms: u64,
    /// Consecutive delays allowed before a forced synchronous flush.
    pub notify_delay_cap: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            suggest_history: true,
            suggest_bookmark: true,
            suggest_openpage: true,
            filter_javascript: true,
            restyle_searches: false,
            max_results: DEFAULT_MAX_RESULTS,
            max_historical_search_suggestions: DEFAULT_MAX_HISTORICAL_SEARCH_SUGGESTIONS,
            switch_tabs_search_all_containers: false,
            notify_delay_ms: DEFAULT_NOTIFY_DELAY_MS,
            notify_delay_cap: DEFAULT_NOTIFY_DELAY_CAP,
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            suggest_history: read_env_bool(ENV_SUGGEST_HISTORY, defaults.suggest_history),
            suggest_bookmark: read_env_bool(ENV_SUGGEST_BOOKMARK, defaults.suggest_bookmark),
            suggest_openpage: read_env_bool(ENV_SUGGEST_OPENPAGE, defaults.suggest_openpage),
            filter_javascript: read_env_bool(ENV_FILTER_JAVASCRIPT, defaults.filter_javascript),
            restyle_searches: read_env_bool(ENV_RESTYLE_SEARCHES, defaults.restyle_searches),
            max_results: read_env_usize(ENV_MAX_RESULTS, defaults.max_results, 1),
            max_historical_search_suggestions: read_env_usize(
                ENV_MAX_HISTORICAL_SEARCH_SUGGESTIONS,
                defaults.max_historical_search_suggestions,
                0,
            ),
            switch_tabs_search_all_containers: read_env_bool(
                ENV_SWITCH_TABS_ALL_CONTAINERS,
                defaults.switch_tabs_search_all_containers,
            ),
            notify_delay_ms: read_env_u64(ENV_NOTIFY_DELAY_MS, defaults.notify_delay_ms),
            notify_delay_cap: read_env_u32(ENV_NOTIFY_DELAY_CAP, defaults.notify_delay_cap),
        }
    }

    /// The query limit is raised above the requested maximum because some
    /// results get deduplicated after the fact.
    #[must_use]
    pub fn overfetch_limit(&self) -> usize {
        self.max_results.saturating_mul(3).div_ceil(2)
    }
}

fn read_env_bool(name: &str, default_value: bool) -> bool {
    match std::env::var(name) {
        Ok(raw) => !matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "off" | "none" | "0" | "false"
        ),
        Err(_) => default_value,
    }
}

fn read_env_usize(name: &str, default_value: usize, min_value: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|value| *value >= min_value)
        .unwrap_or(default_value)
}

fn read_env_u64(name: &str, default_value: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(default_value)
}

fn read_env_u32(name: &str, default_value: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .unwrap_or(default_value)
}
