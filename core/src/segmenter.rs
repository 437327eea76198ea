//! Page text → word units.
//!
//! A page is split on runs of whitespace. Each fragment keeps its original
//! spelling, a normalized form (letters only, lower-cased) used for lexicon
//! lookups, and whatever non-letter characters normalization removed.

use crate::lexicon::{Phoneme, PhonemeLexicon};
use crate::utils;
use serde::{Deserialize, Serialize};

/// One whitespace-delimited word on a page.
///
/// Immutable for the lifetime of the page that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordUnit {
    pub index: usize,
    pub original_text: String,
    pub normalized_text: String,
    pub trailing_punctuation: String,
    /// Empty when the lexicon does not know the word.
    pub phonemes: Vec<Phoneme>,
}

impl WordUnit {
    /// Whether phoneme-level feedback is available for this word.
    pub fn has_phonemes(&self) -> bool {
        !self.phonemes.is_empty()
    }

    /// Text handed to the synthesizer when the whole word is spoken.
    pub fn spoken_text(&self) -> &str {
        if self.normalized_text.is_empty() {
            &self.original_text
        } else {
            &self.normalized_text
        }
    }
}

/// Split a fragment into its normalized letters and the removed characters.
pub fn normalize_fragment(fragment: &str) -> (String, String) {
    let mut letters = String::with_capacity(fragment.len());
    let mut removed = String::new();
    for ch in fragment.chars() {
        if ch.is_alphabetic() {
            letters.extend(ch.to_lowercase());
        } else {
            removed.push(ch);
        }
    }
    (letters, removed)
}

/// Segment raw page text into word units, resolving phonemes through `lexicon`.
pub fn segment<L: PhonemeLexicon + ?Sized>(text: &str, lexicon: &L) -> Vec<WordUnit> {
    let text = utils::normalize(text);
    text.split_whitespace()
        .filter(|fragment| !fragment.is_empty())
        .enumerate()
        .map(|(index, fragment)| {
            let (normalized_text, trailing_punctuation) = normalize_fragment(fragment);
            let phonemes = lexicon.lookup(&normalized_text).unwrap_or_default();
            WordUnit {
                index,
                original_text: fragment.to_string(),
                normalized_text,
                trailing_punctuation,
                phonemes,
            }
        })
        .collect()
}
