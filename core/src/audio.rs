//! Audio output abstraction.
//!
//! The engine decides *what* to say and *when*; an [`AudioOutput`] backend
//! decides *how* (speech synthesis, recorded clips, a console printer in the
//! CLI). [`AudioChannel`] is the single owner of the backend and enforces the
//! one-utterance-at-a-time rule: every new request cancels whatever is in
//! flight first. Backend failures are logged and dropped here so they can
//! never reach word-completion state.

use crate::error::AudioError;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Opaque reference to a pre-recorded clip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipHandle(pub String);

/// Sound backend contract.
pub trait AudioOutput {
    /// Synthesize `text` at `rate` (1.0 = normal speed).
    fn speak(&mut self, text: &str, rate: f32) -> Result<(), AudioError>;

    /// Play a pre-recorded clip.
    fn play_clip(&mut self, clip: &ClipHandle) -> Result<(), AudioError>;

    /// Stop everything currently playing or queued.
    fn cancel_all(&mut self) -> Result<(), AudioError>;
}

/// What the utterance voices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtteranceKind {
    Phoneme { word_index: usize, phoneme_index: usize },
    Word { word_index: usize },
}

/// A single request handed to the channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub kind: UtteranceKind,
    pub text: String,
    pub rate: f32,
    /// Recorded clip to prefer over synthesis.
    pub clip: Option<ClipHandle>,
}

/// Word → recorded clip lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClipCatalog {
    clips: HashMap<String, ClipHandle>,
}

impl ClipCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<W: Into<String>>(&mut self, word: W, clip: ClipHandle) {
        self.clips.insert(word.into(), clip);
    }

    pub fn get(&self, normalized_word: &str) -> Option<&ClipHandle> {
        self.clips.get(normalized_word)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// Exclusive owner of the audio backend.
pub struct AudioChannel {
    backend: Box<dyn AudioOutput>,
    last: Option<Utterance>,
    failures: usize,
}

impl std::fmt::Debug for AudioChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioChannel")
            .field("last", &self.last)
            .field("failures", &self.failures)
            .finish_non_exhaustive()
    }
}

impl AudioChannel {
    pub fn new(backend: Box<dyn AudioOutput>) -> Self {
        Self {
            backend,
            last: None,
            failures: 0,
        }
    }

    /// Cancel whatever is playing, then start `utterance`.
    ///
    /// Returns true when the backend accepted the request.
    pub fn play(&mut self, utterance: Utterance) -> bool {
        if let Err(err) = self.backend.cancel_all() {
            tracing::warn!(%err, "audio cancel failed");
        }
        let result = match &utterance.clip {
            Some(clip) => self.backend.play_clip(clip),
            None => self.backend.speak(&utterance.text, utterance.rate),
        };
        match result {
            Ok(()) => {
                self.last = Some(utterance);
                true
            }
            Err(err) => {
                self.failures += 1;
                tracing::warn!(%err, kind = ?utterance.kind, "audio playback failed");
                self.last = None;
                false
            }
        }
    }

    /// Stop playback outright.
    pub fn stop(&mut self) {
        if let Err(err) = self.backend.cancel_all() {
            tracing::warn!(%err, "audio cancel failed");
        }
        self.last = None;
    }

    /// Most recent accepted utterance.
    pub fn last(&self) -> Option<&Utterance> {
        self.last.as_ref()
    }

    /// Number of requests the backend rejected.
    pub fn failures(&self) -> usize {
        self.failures
    }
}

/// One call observed by [`MemoryAudio`].
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    Speak { text: String, rate: f32 },
    Clip(ClipHandle),
    CancelAll,
}

/// Recording backend used in tests and dry runs.
///
/// Clones share the same log, so a test can keep one handle and give the
/// other to a session.
#[derive(Debug, Clone, Default)]
pub struct MemoryAudio {
    log: Rc<RefCell<Vec<AudioCall>>>,
    fail_playback: Rc<RefCell<bool>>,
}

impl MemoryAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `speak`/`play_clip` calls fail.
    pub fn set_failing(&self, failing: bool) {
        *self.fail_playback.borrow_mut() = failing;
    }

    pub fn calls(&self) -> Vec<AudioCall> {
        self.log.borrow().clone()
    }

    /// Texts passed to `speak`, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|c| match c {
                AudioCall::Speak { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl AudioOutput for MemoryAudio {
    fn speak(&mut self, text: &str, rate: f32) -> Result<(), AudioError> {
        if *self.fail_playback.borrow() {
            return Err(AudioError::Rejected(text.to_string()));
        }
        self.log.borrow_mut().push(AudioCall::Speak {
            text: text.to_string(),
            rate,
        });
        Ok(())
    }

    fn play_clip(&mut self, clip: &ClipHandle) -> Result<(), AudioError> {
        if *self.fail_playback.borrow() {
            return Err(AudioError::Unavailable);
        }
        self.log.borrow_mut().push(AudioCall::Clip(clip.clone()));
        Ok(())
    }

    fn cancel_all(&mut self) -> Result<(), AudioError> {
        self.log.borrow_mut().push(AudioCall::CancelAll);
        Ok(())
    }
}
