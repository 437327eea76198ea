//! Phoneme lexicon for readalong-core
//!
//! This module provides the lookup side of pronunciation: a normalized word
//! (lower-case letters only, as produced by the segmenter) maps to an ordered
//! sequence of phonemes, and every phoneme maps back to a speakable surrogate
//! sound that a speech synthesizer can say on its own.
//!
//! Public API:
//! - `Phoneme` - opaque token from a fixed symbol inventory
//! - `PhonemeLexicon` - lookup trait consumed by the segmenter and director
//! - `Lexicon` - in-memory map plus an optional FST index over bincode payloads
//!
//! Notes:
//! - The symbol inventory is language-specific. `libphonics` supplies ARPAbet
//!   tokens and surrogates; this crate treats tokens as opaque strings.
//! - Unknown words and the empty string are "not found", never an error.

use crate::error::Result;
use fst::Map;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// A single pronunciation unit, e.g. `K`, `AE`, `T` for "cat".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Phoneme(String);

impl Phoneme {
    pub fn new<T: Into<String>>(token: T) -> Self {
        Self(token.into())
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Phoneme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Word → phoneme lookup service.
///
/// Implementations must be pure lookups: no state changes, no I/O per call
/// beyond what a cache needs.
pub trait PhonemeLexicon {
    /// Phoneme sequence for a normalized word, or `None` when unknown.
    ///
    /// The empty string is always unknown.
    fn lookup(&self, normalized: &str) -> Option<Vec<Phoneme>>;

    /// A sound a synthesizer can say to voice this phoneme in isolation.
    fn speakable(&self, phoneme: &Phoneme) -> String;
}

/// Payload entry matching the `build_lexicon` tool output format.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LexEntry {
    pub phonemes: Vec<Phoneme>,
    /// Pronunciation variant number, 1 for the primary pronunciation.
    pub variant: u32,
}

/// In-memory lexicon with an optional FST-indexed payload store.
///
/// Dynamic entries inserted with [`Lexicon::insert`] take precedence over the
/// FST store. Surrogates default to the lower-cased token when no explicit
/// mapping was registered.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    map: HashMap<String, Vec<Phoneme>>,
    surrogates: HashMap<Phoneme, String>,
    fst_map: Option<Map<Vec<u8>>>,
    payloads: Option<Vec<Vec<LexEntry>>>,
}

#[derive(Serialize, Deserialize)]
struct LexiconFile {
    map: HashMap<String, Vec<Phoneme>>,
    surrogates: HashMap<Phoneme, String>,
}

impl Lexicon {
    /// Create an empty lexicon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) the pronunciation for a word.
    ///
    /// The key is lower-cased so callers may pass dictionary spellings.
    pub fn insert<K, I, P>(&mut self, word: K, phonemes: I)
    where
        K: AsRef<str>,
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let key = word.as_ref().to_lowercase();
        let pron = phonemes.into_iter().map(|p| Phoneme::new(p)).collect();
        self.map.insert(key, pron);
    }

    /// Register the speakable surrogate for a phoneme token.
    pub fn set_surrogate<P: Into<String>, S: Into<String>>(&mut self, phoneme: P, sound: S) {
        self.surrogates.insert(Phoneme::new(phoneme), sound.into());
    }

    /// Remove a word. Returns true if it was present in the in-memory map.
    pub fn remove(&mut self, word: &str) -> bool {
        self.map.remove(word).is_some()
    }

    /// Number of in-memory entries plus FST keys.
    pub fn len(&self) -> usize {
        self.map.len() + self.fst_map.as_ref().map(|m| m.len()).unwrap_or(0)
    }

    /// Return true if the lexicon holds no words at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Small demo lexicon for smoke-testing and the CLI fallback.
    pub fn load_demo() -> Self {
        let mut lx = Self::new();
        lx.insert("i", ["AY"]);
        lx.insert("see", ["S", "IY"]);
        lx.insert("a", ["AH"]);
        lx.insert("cat", ["K", "AE", "T"]);
        lx.insert("the", ["DH", "AH"]);
        lx.insert("dog", ["D", "AO", "G"]);
        lx.insert("sat", ["S", "AE", "T"]);
        lx.insert("on", ["AA", "N"]);
        lx.insert("mat", ["M", "AE", "T"]);
        lx.insert("frog", ["F", "R", "AA", "G"]);
        lx.insert("jumps", ["JH", "AH", "M", "P", "S"]);
        lx
    }

    /// Save the in-memory entries and surrogates using bincode.
    pub fn save_bincode<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        let snapshot = LexiconFile {
            map: self.map.clone(),
            surrogates: self.surrogates.clone(),
        };
        bincode::serialize_into(writer, &snapshot)?;
        Ok(())
    }

    /// Load a lexicon produced by [`Lexicon::save_bincode`].
    pub fn load_bincode<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let snapshot: LexiconFile = bincode::deserialize_from(reader)?;
        Ok(Self {
            map: snapshot.map,
            surrogates: snapshot.surrogates,
            fst_map: None,
            payloads: None,
        })
    }

    /// Load lexicon from FST + bincode artifacts.
    ///
    /// - `fst_path`: `lexicon.fst` mapping words to payload indices
    /// - `bincode_path`: `lexicon.bincode` holding `Vec<Vec<LexEntry>>`
    pub fn load_from_fst_bincode<P: AsRef<Path>>(fst_path: P, bincode_path: P) -> Result<Self> {
        let buf = std::fs::read(fst_path.as_ref())?;
        let map = Map::new(buf)?;

        let file = File::open(bincode_path.as_ref())?;
        let payloads: Vec<Vec<LexEntry>> = bincode::deserialize_from(BufReader::new(file))?;

        tracing::debug!(
            keys = map.len(),
            groups = payloads.len(),
            "loaded fst lexicon"
        );

        Ok(Self {
            map: HashMap::new(),
            surrogates: HashMap::new(),
            fst_map: Some(map),
            payloads: Some(payloads),
        })
    }

    fn lookup_fst(&self, key: &str) -> Option<Vec<Phoneme>> {
        let (map, payloads) = (self.fst_map.as_ref()?, self.payloads.as_ref()?);
        let index = map.get(key)? as usize;
        let group = payloads.get(index)?;
        group
            .iter()
            .min_by_key(|e| e.variant)
            .map(|e| e.phonemes.clone())
    }
}

impl PhonemeLexicon for Lexicon {
    fn lookup(&self, normalized: &str) -> Option<Vec<Phoneme>> {
        if normalized.is_empty() {
            return None;
        }
        if let Some(pron) = self.map.get(normalized) {
            return Some(pron.clone());
        }
        self.lookup_fst(normalized)
    }

    fn speakable(&self, phoneme: &Phoneme) -> String {
        self.surrogates
            .get(phoneme)
            .cloned()
            .unwrap_or_else(|| phoneme.as_str().to_lowercase())
    }
}

impl<L: PhonemeLexicon + ?Sized> PhonemeLexicon for std::sync::Arc<L> {
    fn lookup(&self, normalized: &str) -> Option<Vec<Phoneme>> {
        (**self).lookup(normalized)
    }

    fn speakable(&self, phoneme: &Phoneme) -> String {
        (**self).speakable(phoneme)
    }
}
