//! Phonics-specific configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All engine options from `readalong_core::Config` (flattened via serde)
//! - Where to find the pronouncing dictionary
//! - Lookup cache size
//! - Per-phoneme surrogate overrides (e.g. a softer "sss" for S)
//!
//! # Example
//!
//! ```rust
//! use libphonics::PhonicsConfig;
//!
//! let config = PhonicsConfig::from_toml_str("tap_slop = 12.0\ncache_size = 64\n").unwrap();
//! assert_eq!(config.base().tap_slop, 12.0);
//! let base_config = config.into_base();
//! ```

use readalong_core::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PhonicsConfig {
    /// Base engine configuration (tracking, velocity, visits, auto-play, ...)
    #[serde(flatten)]
    pub base: readalong_core::Config,

    /// Directory holding `lexicon.fst` + `lexicon.bincode` built by `build_lexicon`.
    pub lexicon_dir: Option<PathBuf>,
    /// Plain CMU dictionary text, used when no built artifacts are configured.
    pub cmudict_path: Option<PathBuf>,

    /// Maximum number of cached word lookups.
    pub cache_size: usize,

    /// ARPAbet symbol → replacement surrogate.
    pub surrogate_overrides: BTreeMap<String, String>,
}

impl Default for PhonicsConfig {
    fn default() -> Self {
        Self {
            base: readalong_core::Config::default(),
            lexicon_dir: None,
            cmudict_path: None,
            cache_size: 1000,
            surrogate_overrides: BTreeMap::new(),
        }
    }
}

impl PhonicsConfig {
    /// Convert this config into the base config for use with `ReadingSession::new()`
    pub fn into_base(self) -> readalong_core::Config {
        self.base
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &readalong_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut readalong_core::Config {
        &mut self.base
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
