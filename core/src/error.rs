//! Error types for readalong-core.
//!
//! Loading and saving (config, lexicon artifacts, books) is the only fallible
//! surface of the library. Pointer handling and audio direction never fail:
//! missing words, missing boxes and audio backend errors are degraded modes,
//! not errors.

use thiserror::Error;

/// Errors produced while loading or persisting readalong data.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("lexicon payload: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("lexicon index: {0}")]
    Fst(#[from] fst::Error),

    #[error("lexicon format error at line {line}: {message}")]
    LexiconFormat { line: usize, message: String },
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by an audio backend.
///
/// The pronunciation director logs and discards these; they never reach
/// word-completion state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("playback rejected: {0}")]
    Rejected(String),

    #[error("audio backend unavailable")]
    Unavailable,
}
