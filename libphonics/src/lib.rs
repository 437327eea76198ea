//! libphonics crate root
//!
//! This crate provides the English side of readalong: the ARPAbet phoneme
//! inventory with speakable surrogates, a CMU Pronouncing Dictionary parser,
//! a syllable/hint provider for the help panel, and a cached `PhonicsEngine`
//! implementing the core `PhonemeLexicon` trait.
//!
//! Public API exported here:
//! - `PhonicsEngine` from `engine`
//! - `PhonicsConfig` from `config`
//! - `SyllableHints` and `syllabify` from `syllables`

pub mod arpabet;
pub mod cmudict;
pub mod config;
pub mod engine;
pub mod syllables;

// Re-export the session types callers need alongside the engine.
pub use readalong_core::{
    AudioOutput, Book, ClipCatalog, Config, MemoryAudio, PointerSample, ReadingContext,
    ReadingSession, SessionEvent, WordBox,
};

pub use config::PhonicsConfig;
pub use engine::PhonicsEngine;
pub use syllables::{syllabify, SyllableHints};

use std::sync::Arc;

/// Build a reading session wired with the phonics engine and syllable hints.
pub fn session_from_config(
    config: &PhonicsConfig,
    audio: Box<dyn AudioOutput>,
) -> readalong_core::Result<ReadingSession<PhonicsEngine>> {
    let engine = PhonicsEngine::from_config(config)?;
    let session = ReadingSession::new(Arc::new(engine), audio, config.base.clone())
        .with_help_provider(Box::new(SyllableHints::new()));
    Ok(session)
}
