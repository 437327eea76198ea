// libphonics/src/syllables.rs
//
// Rule-based English syllabification and reading hints for the help panel.
//
// The splitter works on spelling, not pronunciation, which is what a child
// sees on the page:
// - each vowel group (a, e, i, o, u, and y when not word-initial) is a nucleus
// - a final silent `e` does not form its own syllable ("make"), except in
//   consonant + "le" endings ("ta-ble")
// - between two nuclei a single consonant starts the next syllable (VCV:
//   "ti-ger"), two or more split after the first (VCCV: "rab-bit"), and
//   common digraphs (ch, ck, ng, ph, sh, th, wh) never split.

use once_cell::sync::Lazy;
use readalong_core::HelpProvider;
use std::collections::HashSet;

static DIGRAPHS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["ch", "ck", "ph", "sh", "th", "wh", "ng"].into_iter().collect());

fn is_vowel(word: &[char], i: usize) -> bool {
    match word[i] {
        'a' | 'e' | 'i' | 'o' | 'u' => true,
        'y' => i > 0 && !is_vowel(word, i - 1),
        _ => false,
    }
}

/// Index ranges `[start, end)` of each vowel group.
fn nuclei(word: &[char]) -> Vec<(usize, usize)> {
    let mut groups = Vec::new();
    let mut i = 0;
    while i < word.len() {
        if is_vowel(word, i) {
            let start = i;
            while i < word.len() && is_vowel(word, i) {
                i += 1;
            }
            groups.push((start, i));
        } else {
            i += 1;
        }
    }

    // Silent final e: "make" has one nucleus, "table" keeps two.
    let n = word.len();
    if groups.len() > 1 && n >= 2 && word[n - 1] == 'e' {
        if let Some(&(start, end)) = groups.last() {
            let consonant_le = n >= 3 && word[n - 2] == 'l' && !is_vowel(word, n - 3);
            if start == n - 1 && end == n && !consonant_le {
                groups.pop();
            }
        }
    }
    groups
}

/// Split a word into written syllables. Non-alphabetic input comes back whole.
pub fn syllabify(word: &str) -> Vec<String> {
    let lower = word.to_lowercase();
    let chars: Vec<char> = lower.chars().collect();
    if chars.is_empty() || !chars.iter().all(|c| c.is_ascii_alphabetic()) {
        return vec![word.to_string()];
    }
    let groups = nuclei(&chars);
    if groups.len() < 2 {
        return vec![lower];
    }

    let mut cuts = Vec::with_capacity(groups.len() - 1);
    for pair in groups.windows(2) {
        let (gap_start, gap_end) = (pair[0].1, pair[1].0);
        let consonants = gap_end - gap_start;
        let cut = match consonants {
            0 | 1 => gap_start,
            _ => {
                let first_two: String = chars[gap_start..gap_start + 2].iter().collect();
                if DIGRAPHS.contains(first_two.as_str()) {
                    gap_start + 2
                } else {
                    gap_start + 1
                }
            }
        };
        // Consonant + "le" keeps the consonant: "ta-ble", "lit-tle".
        let last_pair = pair[1].1 == chars.len() && chars.ends_with(&['l', 'e']);
        let cut = if last_pair { gap_end.saturating_sub(2).max(gap_start) } else { cut };
        cuts.push(cut);
    }

    let mut out = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        if cut > start {
            out.push(chars[start..cut].iter().collect());
            start = cut;
        }
    }
    out.push(chars[start..].iter().collect());
    out
}

/// Syllables plus short, age-appropriate hints.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyllableHints;

impl SyllableHints {
    pub fn new() -> Self {
        Self
    }
}

impl HelpProvider for SyllableHints {
    fn syllables(&self, word: &str) -> Vec<String> {
        syllabify(word)
    }

    fn hint(&self, word: &str, age_level: u8) -> String {
        let parts = syllabify(word);
        match (age_level, parts.len()) {
            (0..=5, 1) => format!("Say each sound slowly, then say \"{word}\" fast."),
            (0..=5, n) => format!("\"{word}\" has {n} parts. Clap them: {}.", parts.join(" - ")),
            (_, 1) => format!("Blend the sounds together: \"{word}\"."),
            (_, _) => format!("Read it in chunks: {}.", parts.join("-")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_syllable_words() {
        assert_eq!(syllabify("cat"), vec!["cat"]);
        assert_eq!(syllabify("make"), vec!["make"]);
        assert_eq!(syllabify("Frog"), vec!["frog"]);
    }

    #[test]
    fn splits_between_doubled_consonants() {
        assert_eq!(syllabify("rabbit"), vec!["rab", "bit"]);
        assert_eq!(syllabify("kitten"), vec!["kit", "ten"]);
    }

    #[test]
    fn single_consonant_starts_next_syllable() {
        assert_eq!(syllabify("tiger"), vec!["ti", "ger"]);
        assert_eq!(syllabify("robot"), vec!["ro", "bot"]);
    }

    #[test]
    fn consonant_le_endings() {
        assert_eq!(syllabify("table"), vec!["ta", "ble"]);
        assert_eq!(syllabify("little"), vec!["lit", "tle"]);
    }

    #[test]
    fn digraphs_stay_together() {
        assert_eq!(syllabify("fishing"), vec!["fish", "ing"]);
        assert_eq!(syllabify("happy"), vec!["hap", "py"]);
    }

    #[test]
    fn hints_depend_on_age() {
        let h = SyllableHints::new();
        assert!(h.hint("rabbit", 4).contains("2 parts"));
        assert!(h.hint("cat", 8).starts_with("Blend"));
    }
}
