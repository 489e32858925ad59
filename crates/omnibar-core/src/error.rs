use thiserror::Error;

pub type Result<T> = std::result::Result<T, OmnibarError>;

#[derive(Debug, Error)]
pub enum OmnibarError {
    /// A token marked as a restriction did not map to any known behavior.
    /// This indicates a tokenizer/engine contract mismatch, not user error.
    #[error("unknown restriction token: {0}")]
    UnknownRestriction(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] rusqlite::Error),
}

impl OmnibarError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownRestriction(_) => "UNKNOWN_RESTRICTION",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}
