//! Soundex-based phonetic prefilter (§4.4).
//!
//! Cheap check run before the Jaro-Winkler engine: compares the Soundex
//! code of the first word of two strings, and a first-letter compatibility
//! table for common single-letter confusions (c/k, c/s, s/z, f/p, j/g).

/// Classic Soundex code: first letter preserved, vowels dropped, remaining
/// consonants mapped to digits, duplicates collapsed, padded/truncated to
/// length 4 (one letter + three digits).
pub fn soundex(word: &str) -> String {
    let chars: Vec<char> = word.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    let Some(&first) = chars.first() else {
        return String::new();
    };

    let code_for = |c: char| -> Option<char> {
        match c.to_ascii_lowercase() {
            'b' | 'f' | 'p' | 'v' => Some('1'),
            'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => Some('2'),
            'd' | 't' => Some('3'),
            'l' => Some('4'),
            'm' | 'n' => Some('5'),
            'r' => Some('6'),
            _ => None, // vowels and h/w/y drop out
        }
    };

    let mut code = String::new();
    code.push(first.to_ascii_uppercase());

    let mut last_digit = code_for(first);
    for &c in chars.iter().skip(1) {
        let digit = code_for(c);
        if let Some(d) = digit {
            if Some(d) != last_digit {
                code.push(d);
            }
        }
        last_digit = digit;
        if code.len() == 4 {
            break;
        }
    }

    while code.len() < 4 {
        code.push('0');
    }
    code
}

/// First-letter compatibility pairs recognized beyond trivial equality.
const COMPATIBLE_FIRST_LETTERS: &[(char, char)] =
    &[('c', 'k'), ('c', 's'), ('s', 'z'), ('f', 'p'), ('j', 'g')];

fn first_letters_compatible(a: char, b: char) -> bool {
    let (a, b) = (a.to_ascii_lowercase(), b.to_ascii_lowercase());
    if a == b {
        return true;
    }
    COMPATIBLE_FIRST_LETTERS
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}

fn first_word(s: &str) -> &str {
    s.split_whitespace().next().unwrap_or("")
}

/// Whether `a` and `b` are phonetically compatible on their first word: the
/// first letters must be equal or in the compatibility table, and the full
/// Soundex codes of the first words must match. Empty strings are always
/// treated as compatible (nothing to filter on).
pub fn phonetic_compatible(a: &str, b: &str) -> bool {
    let wa = first_word(a);
    let wb = first_word(b);
    if wa.is_empty() || wb.is_empty() {
        return true;
    }

    let (Some(fa), Some(fb)) = (wa.chars().next(), wb.chars().next()) else {
        return true;
    };
    if !first_letters_compatible(fa, fb) {
        return false;
    }

    let (sa, sb) = (soundex(wa), soundex(wb));
    if sa.is_empty() || sb.is_empty() {
        return true;
    }

    // Soundex bakes the literal first letter into its code, so two
    // compatible-but-different first letters (c/k, s/z, ...) would never
    // produce an equal code even when the rest of the word lines up.
    // First-letter compatibility is already checked above, so only the
    // trailing digits need to agree here.
    sa[1..] == sb[1..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soundex_classic_examples() {
        assert_eq!(soundex("Robert"), "R163");
        assert_eq!(soundex("Rupert"), "R163");
        assert_eq!(soundex("Smith"), soundex("Smyth"));
    }

    #[test]
    fn soundex_handles_empty() {
        assert_eq!(soundex(""), "");
    }

    #[test]
    fn compatible_names_pass() {
        assert!(phonetic_compatible("Smith", "Smyth"));
        assert!(phonetic_compatible("Catherine", "Katherine"));
    }

    #[test]
    fn incompatible_names_fail() {
        assert!(!phonetic_compatible("Smith", "Jones"));
    }

    #[test]
    fn first_letter_compat_table() {
        assert!(phonetic_compatible("Carl", "Karl"));
        assert!(phonetic_compatible("Sara", "Zara"));
    }

    #[test]
    fn empty_strings_are_compatible() {
        assert!(phonetic_compatible("", "Smith"));
        assert!(phonetic_compatible("", ""));
    }
}
