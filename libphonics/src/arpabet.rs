// libphonics/src/arpabet.rs
//
// ARPAbet phoneme inventory used by the CMU Pronouncing Dictionary.
//
// Every symbol maps to a short sound a speech synthesizer can say on its own
// ("kuh" for K, "ee" for IY). Stop consonants get a neutral vowel, continuants
// are stretched so they do not collapse into a letter name.
//
// Dictionary vowels carry a stress digit (AH0, AH1, AH2). Stress is not used
// for phoneme-by-phoneme reading, so it is stripped on import.

use phf::phf_map;

/// ARPAbet symbol → speakable surrogate.
static SURROGATES: phf::Map<&'static str, &'static str> = phf_map! {
    // Vowels
    "AA" => "ah",
    "AE" => "a",
    "AH" => "uh",
    "AO" => "aw",
    "AW" => "ow",
    "AY" => "eye",
    "EH" => "eh",
    "ER" => "er",
    "EY" => "ay",
    "IH" => "ih",
    "IY" => "ee",
    "OW" => "oh",
    "OY" => "oy",
    "UH" => "uu",
    "UW" => "oo",
    // Stops
    "B" => "buh",
    "D" => "duh",
    "G" => "guh",
    "K" => "kuh",
    "P" => "puh",
    "T" => "tuh",
    // Affricates
    "CH" => "chuh",
    "JH" => "juh",
    // Fricatives
    "DH" => "thuh",
    "F" => "fff",
    "HH" => "huh",
    "S" => "sss",
    "SH" => "shh",
    "TH" => "th",
    "V" => "vvv",
    "Z" => "zzz",
    "ZH" => "zhh",
    // Nasals and liquids
    "L" => "lll",
    "M" => "mmm",
    "N" => "nnn",
    "NG" => "ng",
    "R" => "rrr",
    // Semivowels
    "W" => "wuh",
    "Y" => "yuh",
};

/// Number of symbols in the inventory.
pub fn inventory_size() -> usize {
    SURROGATES.len()
}

/// Remove a trailing stress digit: `AH0` → `AH`. Other tokens pass through.
pub fn strip_stress(token: &str) -> &str {
    token.trim_end_matches(|c: char| c.is_ascii_digit())
}

/// Whether `token` (with or without stress) is an ARPAbet symbol.
pub fn is_known_phoneme(token: &str) -> bool {
    SURROGATES.contains_key(strip_stress(token))
}

/// Speakable surrogate for an ARPAbet symbol.
pub fn surrogate(token: &str) -> Option<&'static str> {
    SURROGATES.get(strip_stress(token)).copied()
}

/// All symbols, in no particular order.
pub fn symbols() -> impl Iterator<Item = &'static str> {
    SURROGATES.keys().copied()
}
