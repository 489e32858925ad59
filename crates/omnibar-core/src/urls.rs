//! String-level url helpers. The engine deliberately avoids a full url
//! parser: candidate urls come from the store already normalized enough, and
//! dedup keys only need prefix stripping and light trimming.

/// Options for [`strip_prefix_and_trim`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StripOptions {
    pub strip_http: bool,
    pub strip_https: bool,
    pub strip_www: bool,
    pub trim_slash: bool,
    pub trim_empty_query: bool,
    pub trim_empty_hash: bool,
}

impl StripOptions {
    #[must_use]
    pub const fn dedup_key() -> Self {
        Self {
            strip_http: true,
            strip_https: true,
            strip_www: true,
            trim_slash: true,
            trim_empty_query: true,
            trim_empty_hash: true,
        }
    }
}

/// Strips scheme variants and `www.` from the front and light noise from the
/// back of a url. Returns the stripped url and the prefix that was removed,
/// so callers can rank one candidate over another by prefix strength.
#[must_use]
pub fn strip_prefix_and_trim(url: &str, options: StripOptions) -> (String, String) {
    let mut rest = url;
    let mut prefix = String::new();
    if options.strip_http && rest.starts_with("http://") {
        prefix.push_str("http://");
        rest = &rest[7..];
    } else if options.strip_https && rest.starts_with("https://") {
        prefix.push_str("https://");
        rest = &rest[8..];
    }
    if options.strip_www && rest.starts_with("www.") {
        prefix.push_str("www.");
        rest = &rest[4..];
    }
    let mut key = rest.to_string();
    if options.trim_empty_hash && key.ends_with('#') {
        key.pop();
    }
    if options.trim_empty_query && key.ends_with('?') {
        key.pop();
    }
    if options.trim_slash && key.ends_with('/') {
        key.pop();
    }
    (key, prefix)
}

/// Ranks a stripped prefix; a higher rank wins a dedup tie. Only peers with
/// the same `www.` status are ever compared.
#[must_use]
pub fn prefix_rank(prefix: &str) -> u8 {
    match prefix {
        "http://www." => 1,
        "http://" => 2,
        "www." => 3,
        "https://www." => 4,
        "https://" => 5,
        _ => 0,
    }
}

/// Strips a leading `scheme:` or `scheme://` from user input, returning the
/// prefix and the remainder. Input that doesn't look like a scheme is
/// returned untouched, as are `about:` and `data:` strings, which are
/// searched as typed.
#[must_use]
pub fn strip_url_prefix(input: &str) -> (String, String) {
    let Some(colon) = input.find(':') else {
        return (String::new(), input.to_string());
    };
    let scheme = &input[..colon];
    let mut chars = scheme.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'));
    if !valid || scheme.eq_ignore_ascii_case("about") || scheme.eq_ignore_ascii_case("data") {
        return (String::new(), input.to_string());
    }
    let mut end = colon + 1;
    if input[end..].starts_with("//") {
        end += 2;
    }
    // "note: buy milk" is prose, not a url.
    if input[end..].starts_with(' ') {
        return (String::new(), input.to_string());
    }
    (input[..end].to_string(), input[end..].to_string())
}

/// Decodes percent-encoded sequences for tokenization and display. Invalid
/// sequences and non-utf8 decodes leave the input untouched.
#[must_use]
pub fn percent_decode_for_ui(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    match String::from_utf8(out) {
        Ok(decoded) => decoded,
        Err(_) => input.to_string(),
    }
}

/// Splits a url into `(origin_and_path, query)` where the fragment is
/// dropped. Used for search submission comparison.
#[must_use]
pub fn split_query(url: &str) -> (&str, &str) {
    let url = url.split('#').next().unwrap_or(url);
    match url.split_once('?') {
        Some((base, query)) => (base, query),
        None => (url, ""),
    }
}

/// Parses a query string into decoded key/value pairs.
#[must_use]
pub fn query_params(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (
                percent_decode_for_ui(&key.replace('+', " ")),
                percent_decode_for_ui(&value.replace('+', " ")),
            )
        })
        .collect()
}

/// Extracts the host portion of a url, if any.
#[must_use]
pub fn host_of(url: &str) -> Option<&str> {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let host = rest.split(['/', '?', '#']).next()?;
    if host.is_empty() { None } else { Some(host) }
}
