//! Closed-set language detector (§4.2).
//!
//! Maps a string to one of a fixed tag set. Implementation is heuristic
//! (script ranges + a short frequent-word scan); callers depend on
//! determinism and stability, not on linguistic precision.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
    Fr,
    De,
    Ru,
    Ar,
    Zh,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Ru => "ru",
            Language::Ar => "ar",
            Language::Zh => "zh",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

const MIN_CONFIDENT_LEN: usize = 2;

const FR_WORDS: &[&str] = &["de", "du", "le", "la", "des", "et"];
const ES_WORDS: &[&str] = &["de", "del", "la", "los", "las", "y"];
const DE_WORDS: &[&str] = &["von", "der", "und", "die", "das"];

/// Detect the language tag for a raw (not-yet-normalized) string.
///
/// Script-bearing scripts (Arabic, CJK, Cyrillic) are detected directly from
/// code point ranges; Latin-script strings fall back to a short frequent
/// word scan, defaulting to English when ambiguous or too short.
pub fn detect_language(input: &str) -> Language {
    let trimmed = input.trim();
    if trimmed.chars().count() < MIN_CONFIDENT_LEN {
        return Language::En;
    }

    let mut has_arabic = false;
    let mut has_cjk = false;
    let mut has_cyrillic = false;

    for c in trimmed.chars() {
        let cp = c as u32;
        if (0x0600..=0x06FF).contains(&cp) || (0x0750..=0x077F).contains(&cp) {
            has_arabic = true;
        } else if (0x4E00..=0x9FFF).contains(&cp) || (0x3400..=0x4DBF).contains(&cp) {
            has_cjk = true;
        } else if (0x0400..=0x04FF).contains(&cp) {
            has_cyrillic = true;
        }
    }

    if has_arabic {
        return Language::Ar;
    }
    if has_cjk {
        return Language::Zh;
    }
    if has_cyrillic {
        return Language::Ru;
    }

    let lower = trimmed.to_lowercase();
    let tokens: Vec<&str> = lower.split_whitespace().collect();
    let count = |words: &[&str]| tokens.iter().filter(|t| words.contains(t)).count();

    let fr = count(FR_WORDS);
    let es = count(ES_WORDS);
    let de = count(DE_WORDS);

    let best = [(fr, Language::Fr), (es, Language::Es), (de, Language::De)]
        .into_iter()
        .filter(|(score, _)| *score > 0)
        .max_by_key(|(score, _)| *score);

    best.map(|(_, lang)| lang).unwrap_or(Language::En)
}
