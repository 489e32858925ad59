//! Search engine lookups consumed by the restyle and keyword paths.
//!
//! The engine depends on this capability through a trait so tests can fake
//! it; there is no process-wide registry.

use crate::urls::{host_of, query_params, split_query};

/// A parsed search submission url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionParse {
    pub engine: String,
    pub terms: String,
    /// Name of the query parameter that carried the terms; ignored when
    /// comparing submissions.
    pub terms_param: String,
}

pub trait SearchEngineResolver {
    /// Parses a url as a search submission of a known engine.
    fn parse_submission(&self, url: &str) -> Option<SubmissionParse>;

    /// Generates the suggestion url the engine would produce for the typed
    /// terms.
    fn suggestion_url(&self, engine: &str, terms: &str) -> Option<String>;

    /// Engine registered under a typed alias (e.g. `@wiki`), if any.
    fn engine_for_alias(&self, alias: &str) -> Option<String>;

    /// Host bound to a bookmark keyword, if any.
    fn keyword_host(&self, keyword: &str) -> Option<String>;

    /// Whether any token-alias engines exist at all.
    fn has_token_alias_engines(&self) -> bool;

    /// The domain an engine submits searches to, used as a host filter in
    /// search mode.
    fn engine_host(&self, engine: &str) -> Option<String>;
}

/// Two submission urls are equivalent when they share origin and path and
/// the first url's parameters are a subset of the second's, ignoring the
/// terms parameter. The subset rule tolerates attribution parameters added
/// on generated urls while rejecting non-web search urls that carry extra
/// parameters of their own.
#[must_use]
pub fn serps_are_equivalent(history_url: &str, generated_url: &str, ignore_param: &str) -> bool {
    let (history_base, history_query) = split_query(history_url);
    let (generated_base, generated_query) = split_query(generated_url);
    if !same_base(history_base, generated_base) {
        return false;
    }
    let generated_params = query_params(generated_query);
    query_params(history_query)
        .iter()
        .filter(|(key, _)| key != ignore_param)
        .all(|pair| generated_params.contains(pair))
}

fn same_base(a: &str, b: &str) -> bool {
    // Scheme differences don't make a different SERP.
    let strip = |s: &str| {
        s.trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
            .to_string()
    };
    strip(a) == strip(b)
}

/// A fixed engine table; the concrete resolver used by tests and demos.
#[derive(Debug, Clone)]
pub struct StaticEngine {
    pub name: String,
    pub alias: Option<String>,
    pub host: String,
    pub search_path: String,
    pub terms_param: String,
    /// Extra parameters attached to generated suggestion urls, typically
    /// attribution.
    pub suggest_params: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default)]
pub struct StaticEngineResolver {
    engines: Vec<StaticEngine>,
    keywords: Vec<(String, String)>,
}

impl StaticEngineResolver {
    #[must_use]
    pub fn new(engines: Vec<StaticEngine>) -> Self {
        Self {
            engines,
            keywords: Vec::new(),
        }
    }

    pub fn add_keyword(&mut self, keyword: &str, host: &str) {
        self.keywords.push((keyword.to_string(), host.to_string()));
    }

    fn engine_by_name(&self, name: &str) -> Option<&StaticEngine> {
        self.engines.iter().find(|e| e.name == name)
    }
}

impl SearchEngineResolver for StaticEngineResolver {
    fn parse_submission(&self, url: &str) -> Option<SubmissionParse> {
        let (base, query) = split_query(url);
        let host = host_of(base)?;
        let path = base.split_once(host).map_or("", |(_, path)| path);
        let engine = self
            .engines
            .iter()
            .find(|e| e.host == host && path.trim_end_matches('/') == e.search_path)?;
        let terms = query_params(query)
            .into_iter()
            .find(|(key, _)| *key == engine.terms_param)
            .map(|(_, value)| value)?;
        if terms.is_empty() {
            return None;
        }
        Some(SubmissionParse {
            engine: engine.name.clone(),
            terms,
            terms_param: engine.terms_param.clone(),
        })
    }

    fn suggestion_url(&self, engine: &str, terms: &str) -> Option<String> {
        let engine = self.engine_by_name(engine)?;
        let mut url = format!(
            "https://{}{}?{}={}",
            engine.host,
            engine.search_path,
            engine.terms_param,
            encode_terms(terms)
        );
        for (key, value) in &engine.suggest_params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(value);
        }
        Some(url)
    }

    fn engine_for_alias(&self, alias: &str) -> Option<String> {
        self.engines
            .iter()
            .find(|e| e.alias.as_deref() == Some(alias))
            .map(|e| e.name.clone())
    }

    fn keyword_host(&self, keyword: &str) -> Option<String> {
        self.keywords
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, host)| host.clone())
    }

    fn has_token_alias_engines(&self) -> bool {
        self.engines
            .iter()
            .any(|e| e.alias.as_deref().is_some_and(|a| a.starts_with('@')))
    }

    fn engine_host(&self, engine: &str) -> Option<String> {
        self.engine_by_name(engine).map(|e| e.host.clone())
    }
}

fn encode_terms(terms: &str) -> String {
    let mut out = String::with_capacity(terms.len());
    for c in terms.chars() {
        match c {
            ' ' => out.push('+'),
            c if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~') => out.push(c),
            c => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{byte:02X}"));
                }
            }
        }
    }
    out
}
