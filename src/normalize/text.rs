//! Canonical string normalization (§4.1).
//!
//! `normalize` is deterministic and idempotent: `normalize(normalize(s)) ==
//! normalize(s)` for every `s`. It never panics; empty or whitespace-only
//! input yields an empty string.

use unicode_normalization::UnicodeNormalization;

/// Version tag stamped onto every `PreparedFields` value. Bumping this is a
/// breaking change to the index: every entity must be re-normalized.
pub const NORMALIZER_VERSION: u32 = 1;

const TRANSLITERATIONS: &[(char, &str)] = &[
    ('\u{00F0}', "d"),  // ð
    ('\u{00FE}', "th"), // þ
    ('\u{00E6}', "ae"), // æ
    ('\u{0153}', "oe"), // œ
    ('\u{00F8}', "o"),  // ø
    ('\u{0142}', "l"),  // ł
    ('\u{00DF}', "ss"), // ß
];

fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

/// Canonicalize a raw string into the engine's comparison form.
pub fn normalize(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }

    // 1) Punctuation that separates name components becomes whitespace.
    let step1: String = input
        .chars()
        .map(|c| match c {
            '.' | ',' | '-' => ' ',
            other => other,
        })
        .collect();

    // 2) Simple case fold.
    let step2 = step1.to_lowercase();

    // 3) Fixed transliteration map.
    let mut step3 = step2;
    for (from, to) in TRANSLITERATIONS {
        if step3.contains(*from) {
            step3 = step3.replace(*from, to);
        }
    }

    // 4) Canonical decomposition, strip combining marks.
    let step4: String = step3.nfd().filter(|c| !is_combining_mark(*c)).collect();

    // 5) Strip anything left that isn't alphanumeric or whitespace.
    let step5: String = step4
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    // 6) Collapse whitespace runs, trim ends.
    step5.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize an identifier (government ID, wallet address, etc.): strip
/// every non-alphanumeric and lowercase, keeping no internal whitespace.
pub fn normalize_id(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Normalize a phone/fax number to digits only.
pub fn normalize_phone(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Rewrite an SDN-style `"LAST, FIRST MIDDLE"` name as `"FIRST MIDDLE LAST"`
/// when exactly one comma is present; otherwise returns the input unchanged.
pub fn reorder_sdn_name(name: &str) -> String {
    let parts: Vec<&str> = name.split(',').collect();
    if parts.len() != 2 {
        return name.to_string();
    }
    let last = parts[0].trim();
    let first = parts[1].trim();
    if last.is_empty() || first.is_empty() {
        return name.to_string();
    }
    format!("{first} {last}")
}

const COMPANY_TITLES: &[&str] = &[
    "llc", "inc", "corp", "ltd", "co", "sa", "srl", "gmbh", "ag", "plc", "llp", "lp", "nv", "bv",
    "pty", "pllc",
];

/// Iteratively strip a trailing company-title token (LLC, INC, CORP, ...)
/// until the string stops changing. Operates on already-normalized
/// (lowercase, punctuation-free) text.
pub fn remove_company_titles(normalized_name: &str) -> String {
    let mut current = normalized_name.to_string();
    loop {
        let trimmed = current.trim_end();
        let Some(last_space) = trimmed.rfind(' ') else {
            if COMPANY_TITLES.contains(&trimmed) {
                return String::new();
            }
            return trimmed.to_string();
        };
        let last_token = &trimmed[last_space + 1..];
        if COMPANY_TITLES.contains(&last_token) {
            current = trimmed[..last_space].to_string();
        } else {
            return trimmed.to_string();
        }
    }
}
