//! readalong-core
//!
//! Engine behind interactive read-along picture books: it maps a pointer
//! moving across rendered words to word-level and phoneme-level audio
//! feedback, tracks how each word has been visited, and decides when a page
//! is finished.
//!
//! The crate is language-agnostic. Phoneme inventories, dictionaries and
//! syllable rules live in language crates (libphonics) behind the
//! [`PhonemeLexicon`] and [`HelpProvider`] traits; audio goes through
//! [`AudioOutput`].
//!
//! Public API:
//! - `ReadingSession` - Facade the view layer drives with pointer events
//! - `ReadingContext` - Plain data the view layer reads back
//! - `Lexicon` - Word → phoneme dictionary (FST + bincode)
//! - `PointerTracker`, `VisitBoard`, `VelocityEstimator`, `PronunciationDirector`
//! - `Config` - Every tunable, loadable from TOML
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{AudioError, Error, Result};

pub mod lexicon;
pub use lexicon::{LexEntry, Lexicon, Phoneme, PhonemeLexicon};

pub mod segmenter;
pub use segmenter::{segment, WordUnit};

pub mod tracker;
pub use tracker::{PointerTracker, PointerTransition, TrackerConfig, WordBox};

pub mod visit;
pub use visit::{VisitBoard, VisitOutcome, VisitPolicy, WordVisitState};

pub mod velocity;
pub use velocity::{Pace, PointerSample, VelocityEstimator};

pub mod drag;
pub use drag::DragSession;

pub mod audio;
pub use audio::{AudioCall, AudioChannel, AudioOutput, ClipCatalog, ClipHandle, MemoryAudio};

pub mod director;
pub use director::{DirectorConfig, HelpPayload, HelpProvider, PronunciationDirector, Spoken};

pub mod progress;
pub use progress::PageProgress;

pub mod timer;
pub use timer::{Timer, TimerKind, TimerQueue};

pub mod autoplay;
pub use autoplay::{AutoPlayConfig, AutoPlayStep, AutoPlayer};

pub mod page;
pub use page::PageState;

pub mod book;
pub use book::{Book, NavigationDecision};

pub mod context;
pub use context::{DragSnapshot, ReadingContext, SessionEvent};

pub mod session;
pub use session::ReadingSession;

/// Engine configuration.
///
/// Every field has a default, so a TOML file only needs the values it
/// changes. Language crates wrap this in their own config with
/// `#[serde(flatten)]`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    // Visit state
    /// Visits at which an incomplete word is flagged as a struggle.
    pub struggle_threshold: u32,
    /// How touching a word ahead of the reading position is treated.
    pub visit_policy: VisitPolicy,

    // Pointer tracking
    pub horizontal_margin: f64,
    pub vertical_margin: f64,
    /// Upward shift (px) of the query point so the finger does not hide the word.
    pub lookahead: f64,

    // Velocity and drags
    /// Speed (px/ms) below which a drag is read phoneme by phoneme.
    pub slow_speed_threshold: f64,
    /// Pointer travel (px) below which a press-release is a tap.
    pub tap_slop: f64,
    /// Delay before the slider snaps back after release.
    pub drag_reset_delay_ms: f64,

    // Pronunciation
    pub completion_progress: f64,
    pub help_visit_threshold: u32,
    pub word_rate: f32,
    pub phoneme_rate: f32,
    /// Reader age passed to hint generation.
    pub age_level: u8,

    // Page flow
    /// Pause between the page completing and navigation being due.
    pub page_complete_delay_ms: f64,
    pub autoplay_base_delay_ms: f64,
    pub autoplay_speed: f64,
}

impl Default for Config {
    fn default() -> Self {
        let tracker = TrackerConfig::default();
        let director = DirectorConfig::default();
        let autoplay = AutoPlayConfig::default();
        Self {
            struggle_threshold: visit::DEFAULT_STRUGGLE_THRESHOLD,
            visit_policy: VisitPolicy::default(),
            horizontal_margin: tracker.horizontal_margin,
            vertical_margin: tracker.vertical_margin,
            lookahead: tracker.lookahead,
            slow_speed_threshold: velocity::DEFAULT_SLOW_THRESHOLD,
            tap_slop: drag::DEFAULT_TAP_SLOP,
            drag_reset_delay_ms: 300.0,
            completion_progress: director.completion_progress,
            help_visit_threshold: director.help_visit_threshold,
            word_rate: director.word_rate,
            phoneme_rate: director.phoneme_rate,
            age_level: 5,
            page_complete_delay_ms: 1500.0,
            autoplay_base_delay_ms: autoplay.base_delay_ms,
            autoplay_speed: autoplay.speed,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    // ========== Typed views ==========

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            horizontal_margin: self.horizontal_margin,
            vertical_margin: self.vertical_margin,
            lookahead: self.lookahead,
        }
    }

    pub fn director_config(&self) -> DirectorConfig {
        DirectorConfig {
            completion_progress: self.completion_progress,
            help_visit_threshold: self.help_visit_threshold,
            word_rate: self.word_rate,
            phoneme_rate: self.phoneme_rate,
        }
    }

    pub fn autoplay_config(&self) -> AutoPlayConfig {
        AutoPlayConfig {
            base_delay_ms: self.autoplay_base_delay_ms,
            speed: self.autoplay_speed,
        }
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}
