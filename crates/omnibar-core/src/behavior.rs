//! Behavior flags gating which query variants run.
//!
//! The set starts as the union of the user-preferred sources. The first
//! restriction token converts it to an intersection: the set is cleared,
//! `Restrict` is raised, and only the named behavior is added. Subsequent
//! restriction tokens accumulate onto the restricted set in the order they
//! appear. This order-sensitive accumulation matches long-standing shipping
//! behavior and is relied upon by consumers.

use crate::config::SearchConfig;
use crate::error::{OmnibarError, Result};
use crate::tokenizer::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Behavior {
    History = 1 << 0,
    Bookmark = 1 << 1,
    Tag = 1 << 2,
    OpenPage = 1 << 3,
    Search = 1 << 4,
    Javascript = 1 << 5,
    Restrict = 1 << 6,
    Title = 1 << 7,
    Url = 1 << 8,
}

impl Behavior {
    fn for_restriction(kind: TokenKind) -> Result<Self> {
        match kind {
            TokenKind::RestrictHistory => Ok(Self::History),
            TokenKind::RestrictBookmark => Ok(Self::Bookmark),
            TokenKind::RestrictTag => Ok(Self::Tag),
            TokenKind::RestrictOpenPage => Ok(Self::OpenPage),
            TokenKind::RestrictSearch => Ok(Self::Search),
            TokenKind::RestrictTitle => Ok(Self::Title),
            TokenKind::RestrictUrl => Ok(Self::Url),
            TokenKind::Text => Err(OmnibarError::UnknownRestriction("text".to_string())),
        }
    }
}

/// The source a caller may explicitly restrict to, bypassing typed tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    History,
    Bookmarks,
    Tabs,
    Search,
}

impl Source {
    const fn behavior(self) -> Behavior {
        match self {
            Self::History => Behavior::History,
            Self::Bookmarks => Behavior::Bookmark,
            Self::Tabs => Behavior::OpenPage,
            Self::Search => Behavior::Search,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BehaviorSet(u16);

impl BehaviorSet {
    pub const EMPTY: Self = Self(0);

    /// The union of the user-preferred sources, used for non-empty queries
    /// with no restriction.
    #[must_use]
    pub fn default_for(config: &SearchConfig) -> Self {
        let mut set = Self::EMPTY;
        if config.suggest_history {
            set.insert(Behavior::History);
        }
        if config.suggest_bookmark {
            set.insert(Behavior::Bookmark);
        }
        if config.suggest_openpage {
            set.insert(Behavior::OpenPage);
        }
        set
    }

    /// An empty query prefers typed history, else bookmarks, else open pages.
    #[must_use]
    pub fn empty_search_default(config: &SearchConfig) -> Self {
        let mut set = Self::EMPTY;
        set.insert(Behavior::Restrict);
        if config.suggest_history {
            set.insert(Behavior::History);
        } else if config.suggest_bookmark {
            set.insert(Behavior::Bookmark);
        } else {
            set.insert(Behavior::OpenPage);
        }
        set
    }

    /// Starts an intersection at `Restrict` plus exactly the named source.
    #[must_use]
    pub fn restrict_to(source: Source) -> Self {
        let mut set = Self::EMPTY;
        set.insert(Behavior::Restrict);
        set.insert(source.behavior());
        set
    }

    pub fn insert(&mut self, behavior: Behavior) {
        self.0 |= behavior as u16;
        // Tags are only returned for bookmarks.
        if behavior == Behavior::Tag {
            self.0 |= Behavior::Bookmark as u16;
        }
    }

    #[must_use]
    pub const fn has(self, behavior: Behavior) -> bool {
        self.0 & (behavior as u16) != 0
    }

    /// Wire value bound to the store's `:search_behavior` parameter.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }
}

/// Removes restriction tokens from the stream and folds them into the
/// behavior set. Returns the filtered tokens alongside the composed set.
pub fn filter_tokens(tokens: Vec<Token>, initial: BehaviorSet) -> Result<(BehaviorSet, Vec<Token>)> {
    let mut set = initial;
    let mut found_restriction = false;
    let mut filtered = Vec::with_capacity(tokens.len());
    for token in tokens {
        if !token.kind.is_restriction() {
            filtered.push(token);
            continue;
        }
        let behavior = Behavior::for_restriction(token.kind)?;
        if !found_restriction {
            found_restriction = true;
            // Previous behavior (e.g. the preference union) no longer applies.
            set = BehaviorSet::EMPTY;
            set.insert(Behavior::Restrict);
        }
        set.insert(behavior);
    }
    Ok((set, filtered))
}
