//! Phonics lexicon engine
//!
//! `PhonicsEngine` puts an LRU cache in front of a core `Lexicon` and voices
//! phonemes with ARPAbet surrogates. Pages are re-segmented on every page
//! turn and children reread the same books, so most lookups repeat.
//!
//! Loading order in [`PhonicsEngine::from_config`]:
//! 1. built artifacts (`lexicon.fst` + `lexicon.bincode`) in `lexicon_dir`
//! 2. CMU dictionary text at `cmudict_path`
//! 3. the small built-in demo lexicon

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use crate::arpabet;
use crate::cmudict;
use crate::config::PhonicsConfig;
use readalong_core::{Lexicon, Phoneme, PhonemeLexicon, Result};

pub struct PhonicsEngine {
    lexicon: Lexicon,
    overrides: BTreeMap<String, String>,
    cache: RefCell<lru::LruCache<String, Option<Vec<Phoneme>>>>,
    cache_hits: RefCell<usize>,
    cache_misses: RefCell<usize>,
}

impl std::fmt::Debug for PhonicsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhonicsEngine")
            .field("words", &self.lexicon.len())
            .field("cache_size", &self.cache_size())
            .field("cache_stats", &self.cache_stats())
            .finish()
    }
}

impl PhonicsEngine {
    pub fn new(lexicon: Lexicon, cache_capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            lexicon,
            overrides: BTreeMap::new(),
            cache: RefCell::new(lru::LruCache::new(capacity)),
            cache_hits: RefCell::new(0),
            cache_misses: RefCell::new(0),
        }
    }

    /// Engine over the built-in demo words.
    pub fn demo() -> Self {
        Self::new(Lexicon::load_demo(), 1000)
    }

    /// Build an engine from configuration, falling back to the demo lexicon
    /// when nothing is configured.
    pub fn from_config(config: &PhonicsConfig) -> Result<Self> {
        let lexicon = if let Some(dir) = &config.lexicon_dir {
            let lx = Lexicon::load_from_fst_bincode(
                dir.join("lexicon.fst"),
                dir.join("lexicon.bincode"),
            )?;
            tracing::info!(dir = %dir.display(), words = lx.len(), "loaded lexicon artifacts");
            lx
        } else if let Some(path) = &config.cmudict_path {
            let lx = cmudict::load(path)?;
            tracing::info!(path = %path.display(), words = lx.len(), "loaded pronouncing dictionary");
            lx
        } else {
            tracing::info!("using demo lexicon");
            Lexicon::load_demo()
        };
        let mut engine = Self::new(lexicon, config.cache_size);
        engine.overrides = config.surrogate_overrides.clone();
        Ok(engine)
    }

    /// Replace the surrogate for one phoneme.
    pub fn set_override<P: Into<String>, S: Into<String>>(&mut self, phoneme: P, sound: S) {
        self.overrides.insert(phoneme.into(), sound.into());
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Get cache statistics for monitoring.
    ///
    /// Returns (hits, misses) tuple.
    pub fn cache_stats(&self) -> (usize, usize) {
        (*self.cache_hits.borrow(), *self.cache_misses.borrow())
    }

    /// Get cache hit rate as a percentage (0.0 to 100.0).
    ///
    /// Returns None if no lookups have been made yet.
    pub fn cache_hit_rate(&self) -> Option<f32> {
        let (hits, misses) = self.cache_stats();
        let total = hits + misses;
        if total == 0 {
            None
        } else {
            Some((hits as f32 / total as f32) * 100.0)
        }
    }

    pub fn cache_size(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache.borrow().cap().get()
    }

    /// Clear the cache and its statistics.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
        *self.cache_hits.borrow_mut() = 0;
        *self.cache_misses.borrow_mut() = 0;
    }
}

impl PhonemeLexicon for PhonicsEngine {
    fn lookup(&self, normalized: &str) -> Option<Vec<Phoneme>> {
        if normalized.is_empty() {
            return None;
        }
        if let Some(cached) = self.cache.borrow_mut().get(normalized) {
            *self.cache_hits.borrow_mut() += 1;
            return cached.clone();
        }
        *self.cache_misses.borrow_mut() += 1;

        let result = self.lexicon.lookup(normalized);
        self.cache
            .borrow_mut()
            .put(normalized.to_string(), result.clone());
        result
    }

    fn speakable(&self, phoneme: &Phoneme) -> String {
        let token = arpabet::strip_stress(phoneme.as_str());
        if let Some(sound) = self.overrides.get(token) {
            return sound.clone();
        }
        match arpabet::surrogate(token) {
            Some(sound) => sound.to_string(),
            None => self.lexicon.speakable(phoneme),
        }
    }
}
