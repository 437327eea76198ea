// libphonics/src/cmudict.rs
//
// CMU Pronouncing Dictionary text format.
//
// Each non-comment line is a headword followed by its ARPAbet phonemes:
//
//   CAT  K AE1 T
//   READ  R IY1 D
//   READ(2)  R EH1 D
//   ;;; comment
//
// Alternate pronunciations carry a `(n)` suffix. Headwords are normalized
// the same way page text is (letters only, lower-cased) so `DON'T` is found
// under `dont`. Stress digits are dropped.

use crate::arpabet;
use once_cell::sync::Lazy;
use readalong_core::segmenter::normalize_fragment;
use readalong_core::{Error, LexEntry, Lexicon, Phoneme, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;

static ENTRY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<word>[^\s(]+)(?:\((?P<variant>\d+)\))?\s+(?P<phones>\S.*)$")
        .expect("valid dictionary line pattern")
});

/// One parsed dictionary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictEntry {
    /// Normalized headword.
    pub word: String,
    pub entry: LexEntry,
}

/// Parse a single line. `Ok(None)` for blanks, comments and headwords that
/// normalize to nothing.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<DictEntry>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(";;;") {
        return Ok(None);
    }
    let caps = ENTRY_LINE.captures(line).ok_or_else(|| Error::LexiconFormat {
        line: line_no,
        message: format!("expected `WORD  PHONEMES`, got {line:?}"),
    })?;

    let (word, _) = normalize_fragment(&caps["word"]);
    if word.is_empty() {
        return Ok(None);
    }
    let variant = match caps.name("variant") {
        Some(v) => v.as_str().parse::<u32>().map_err(|e| Error::LexiconFormat {
            line: line_no,
            message: e.to_string(),
        })?,
        None => 1,
    };

    let mut phonemes = Vec::new();
    for token in caps["phones"].split_whitespace() {
        if !arpabet::is_known_phoneme(token) {
            return Err(Error::LexiconFormat {
                line: line_no,
                message: format!("unknown phoneme {token:?}"),
            });
        }
        phonemes.push(Phoneme::new(arpabet::strip_stress(token)));
    }

    Ok(Some(DictEntry {
        word,
        entry: LexEntry { phonemes, variant },
    }))
}

/// Parse a whole dictionary into pronunciations grouped by headword, in key
/// order. This is the shape the FST builder consumes.
pub fn parse_grouped(text: &str) -> Result<BTreeMap<String, Vec<LexEntry>>> {
    let mut grouped: BTreeMap<String, Vec<LexEntry>> = BTreeMap::new();
    for (i, line) in text.lines().enumerate() {
        if let Some(parsed) = parse_line(line, i + 1)? {
            grouped.entry(parsed.word).or_default().push(parsed.entry);
        }
    }
    Ok(grouped)
}

/// Parse dictionary text into an in-memory lexicon.
///
/// When a headword has several pronunciations the lowest variant number
/// wins; ties go to the earliest line.
pub fn parse_lexicon(text: &str) -> Result<Lexicon> {
    let grouped = parse_grouped(text)?;
    let mut lexicon = Lexicon::new();
    for (word, entries) in grouped {
        if let Some(primary) = entries.into_iter().min_by_key(|e| e.variant) {
            lexicon.insert(word, primary.phonemes.iter().map(|p| p.as_str().to_string()));
        }
    }
    for symbol in arpabet::symbols() {
        if let Some(sound) = arpabet::surrogate(symbol) {
            lexicon.set_surrogate(symbol, sound);
        }
    }
    tracing::debug!(words = lexicon.len(), "parsed pronouncing dictionary");
    Ok(lexicon)
}

/// Read and parse a dictionary file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Lexicon> {
    let text = std::fs::read_to_string(path)?;
    parse_lexicon(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use readalong_core::PhonemeLexicon;

    const SAMPLE: &str = "\
;;; tiny sample
CAT  K AE1 T
DON'T  D OW1 N T
READ(2)  R EH1 D
READ  R IY1 D
!EXCLAMATION-POINT  EH2 K S K L AH0 M EY1 SH AH0 N P OY2 N T
";

    #[test]
    fn parses_and_strips_stress() {
        let entry = parse_line("CAT  K AE1 T", 1).unwrap().unwrap();
        assert_eq!(entry.word, "cat");
        assert_eq!(entry.entry.variant, 1);
        let tokens: Vec<&str> = entry.entry.phonemes.iter().map(|p| p.as_str()).collect();
        assert_eq!(tokens, vec!["K", "AE", "T"]);
    }

    #[test]
    fn skips_comments_and_blanks() {
        assert!(parse_line(";;; header", 1).unwrap().is_none());
        assert!(parse_line("   ", 2).unwrap().is_none());
    }

    #[test]
    fn primary_pronunciation_wins() {
        let lx = parse_lexicon(SAMPLE).unwrap();
        let read = lx.lookup("read").unwrap();
        assert_eq!(read[1].as_str(), "IY");
        assert!(lx.lookup("dont").is_some());
        assert!(lx.lookup("exclamationpoint").is_some());
    }

    #[test]
    fn grouped_keeps_every_variant() {
        let grouped = parse_grouped(SAMPLE).unwrap();
        assert_eq!(grouped["read"].len(), 2);
        assert_eq!(grouped.keys().next().map(String::as_str), Some("cat"));
    }

    #[test]
    fn bad_lines_report_their_number() {
        let err = parse_grouped("CAT  K AE1 T\nDOG  D QQ G\n").unwrap_err();
        assert!(matches!(err, Error::LexiconFormat { line: 2, .. }));
        let err = parse_line("LONELYWORD", 7).unwrap_err();
        assert!(matches!(err, Error::LexiconFormat { line: 7, .. }));
    }

    #[test]
    fn surrogates_come_from_arpabet() {
        let lx = parse_lexicon("CAT  K AE1 T\n").unwrap();
        assert_eq!(lx.speakable(&Phoneme::new("K")), "kuh");
    }
}
