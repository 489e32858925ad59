//! Splits a raw query string into typed tokens.
//!
//! Restriction characters can be typed alone, or at the boundaries of the
//! token list, to narrow the search to a category (history, bookmarks, open
//! pages) or to a matching mode (title-only, url-only). Restriction
//! characters found elsewhere are plain text; when restrictions conflict the
//! outermost ones win and leading ones win over trailing ones.

use serde::Serialize;

pub const RESTRICT_HISTORY: char = '^';
pub const RESTRICT_BOOKMARK: char = '*';
pub const RESTRICT_TAG: char = '+';
pub const RESTRICT_OPENPAGE: char = '%';
pub const RESTRICT_SEARCH: char = '?';
pub const RESTRICT_TITLE: char = '#';
pub const RESTRICT_URL: char = '$';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Text,
    RestrictHistory,
    RestrictBookmark,
    RestrictTag,
    RestrictOpenPage,
    RestrictSearch,
    RestrictTitle,
    RestrictUrl,
}

impl TokenKind {
    #[must_use]
    pub const fn is_restriction(self) -> bool {
        !matches!(self, Self::Text)
    }

    /// True for the matching-mode restrictions, which can combine with one
    /// category restriction.
    #[must_use]
    pub const fn is_matching_restriction(self) -> bool {
        matches!(self, Self::RestrictTitle | Self::RestrictUrl)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub lowercase: String,
}

impl Token {
    fn text(value: &str) -> Self {
        Self {
            kind: TokenKind::Text,
            value: value.to_string(),
            lowercase: value.to_lowercase(),
        }
    }
}

fn restriction_kind(token: &str) -> Option<TokenKind> {
    let mut chars = token.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    match first {
        RESTRICT_HISTORY => Some(TokenKind::RestrictHistory),
        RESTRICT_BOOKMARK => Some(TokenKind::RestrictBookmark),
        RESTRICT_TAG => Some(TokenKind::RestrictTag),
        RESTRICT_OPENPAGE => Some(TokenKind::RestrictOpenPage),
        RESTRICT_SEARCH => Some(TokenKind::RestrictSearch),
        RESTRICT_TITLE => Some(TokenKind::RestrictTitle),
        RESTRICT_URL => Some(TokenKind::RestrictUrl),
        _ => None,
    }
}

/// Tokenizes a search string.
///
/// A leading restriction character attached to the first word is split into
/// its own token, so users don't have to add artificial whitespace, unless a
/// standalone restriction token is already present. A `%xx` looking first
/// word is never split because it could be a percent-encoded sequence rather
/// than an open-page restriction.
#[must_use]
pub fn tokenize(search_string: &str) -> Vec<Token> {
    let trimmed = search_string.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    tracing::debug!(search_string = trimmed, "tokenizing search string");

    // Whitespace in a data uri is meaningful, keep it whole.
    if trimmed.starts_with("data:") {
        return vec![Token::text(trimmed)];
    }

    let mut raw: Vec<String> = trimmed.split_whitespace().map(str::to_string).collect();

    let has_restriction_token = raw.iter().any(|t| restriction_kind(t).is_some());
    if !has_restriction_token {
        let first = raw[0].clone();
        let mut chars = first.chars();
        if let Some(lead) = chars.next() {
            let rest: String = chars.collect();
            if !rest.is_empty()
                && restriction_kind(&lead.to_string()).is_some()
                && !looks_percent_encoded(&first)
            {
                raw[0] = rest;
                raw.insert(0, lead.to_string());
            }
        }
    }

    classify(raw)
}

/// Tells whether the token is a restriction marker.
#[must_use]
pub fn is_restriction_token(token: &Token) -> bool {
    token.kind.is_restriction()
}

fn looks_percent_encoded(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() >= 3
        && bytes[0] == b'%'
        && bytes[1].is_ascii_hexdigit()
        && bytes[2].is_ascii_hexdigit()
}

fn classify(raw: Vec<String>) -> Vec<Token> {
    let mut tokens: Vec<Token> = raw.iter().map(|t| Token::text(t)).collect();
    let restrictions: Vec<(usize, TokenKind)> = raw
        .iter()
        .enumerate()
        .filter_map(|(i, t)| restriction_kind(t).map(|kind| (i, kind)))
        .collect();
    if restrictions.is_empty() {
        return tokens;
    }

    // One matching restriction (title/url) and one category restriction may
    // combine; extra markers stay text.
    let mut matching_found = false;
    let mut category_found = false;
    let mut assign = |index: usize, tokens: &mut Vec<Token>| -> bool {
        let Some(&(_, kind)) = restrictions.iter().find(|(i, _)| *i == index) else {
            return false;
        };
        if kind.is_matching_restriction() {
            if matching_found {
                return false;
            }
            matching_found = true;
        } else {
            if category_found {
                return false;
            }
            category_found = true;
        }
        tokens[index].kind = kind;
        true
    };

    if assign(0, &mut tokens) {
        assign(1, &mut tokens);
    }
    let last = tokens.len() - 1;
    if last > 0 && assign(last, &mut tokens) && last > 1 {
        assign(last - 1, &mut tokens);
    }
    tokens
}
