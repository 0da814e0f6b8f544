//! Stopword removal (§4.3).
//!
//! Word-by-word: the input is lowercased and whitespace-split. A token that
//! ends with a digit (after stripping `.`, `,`, `-`) is never removed, even
//! if it happens to collide with a stopword. The per-language stopword sets
//! are frozen here as part of the normalizer version
//! ([`crate::normalize::text::NORMALIZER_VERSION`]).

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::language::Language;

static NUMERIC_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d.,\-]*\d[\d.,\-]*$").unwrap());

fn is_numeric_token(token: &str) -> bool {
    NUMERIC_TOKEN.is_match(token)
}

static EN_STOPWORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["the", "of", "and", "a", "an", "for", "mr", "mrs", "ms", "dr"].into());

static ES_STOPWORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["el", "la", "los", "las", "de", "del", "y", "sr", "sra"].into());

static FR_STOPWORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["le", "la", "les", "de", "du", "des", "et", "m", "mme"].into());

static DE_STOPWORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["der", "die", "das", "und", "von", "herr", "frau"].into());

static RU_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| ["\u{438}", "\u{432}", "\u{438}\u{437}"].into());

static AR_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| ["\u{627}\u{644}", "\u{628}\u{646}", "\u{648}"].into());

static ZH_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| HashSet::new());

fn stopwords_for(language: Language) -> &'static HashSet<&'static str> {
    match language {
        Language::En => &EN_STOPWORDS,
        Language::Es => &ES_STOPWORDS,
        Language::Fr => &FR_STOPWORDS,
        Language::De => &DE_STOPWORDS,
        Language::Ru => &RU_STOPWORDS,
        Language::Ar => &AR_STOPWORDS,
        Language::Zh => &ZH_STOPWORDS,
    }
}

/// Remove stopwords for `language` from an already-normalized, lowercase,
/// whitespace-split string.
pub fn remove_stopwords(normalized: &str, language: Language) -> String {
    let stopwords = stopwords_for(language);
    normalized
        .split_whitespace()
        .filter(|token| is_numeric_token(token) || !stopwords.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_known_stopwords() {
        assert_eq!(remove_stopwords("the bank of america", Language::En), "bank america");
    }

    #[test]
    fn keeps_trailing_numeric_tokens() {
        // "1990" happens not to collide with any stopword, but a token that
        // *does* collide, like a hypothetical numeric stopword, must survive.
        assert_eq!(remove_stopwords("unit 1990", Language::En), "unit 1990");
    }

    #[test]
    fn numeric_guard_recognizes_punctuated_numbers() {
        assert!(is_numeric_token("12,345"));
        assert!(is_numeric_token("1-2-3"));
        assert!(!is_numeric_token("abc"));
        assert!(!is_numeric_token(""));
    }

    #[test]
    fn empty_stopword_set_is_a_no_op() {
        assert_eq!(remove_stopwords("shanghai trading", Language::Zh), "shanghai trading");
    }
}
