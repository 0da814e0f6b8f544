//! Jaro-Winkler base engine (§4.5).
//!
//! The base Jaro distance is delegated to `strsim::jaro` (a well-tested,
//! already-idiomatic implementation of the matching-window algorithm); the
//! Winkler common-prefix boost is reimplemented here because its threshold,
//! prefix cap, and weight all need to come from a [`SimilarityConfig`]
//! rather than being baked-in constants.

use crate::config::SimilarityConfig;

/// Plain Jaro similarity, no prefix boost.
pub fn jaro(a: &str, b: &str) -> f64 {
    strsim::jaro(a, b)
}

fn common_prefix_len(a: &str, b: &str, cap: usize) -> usize {
    a.chars()
        .zip(b.chars())
        .take(cap)
        .take_while(|(x, y)| x == y)
        .count()
}

/// Jaro-Winkler similarity with a configurable prefix boost.
///
/// `JW = J + l * p * (1 - J)` where `l` is the common prefix length capped
/// at `prefix_size`, `p` is `prefix_weight`, applied only when
/// `J >= boost_threshold`.
pub fn jaro_winkler(a: &str, b: &str, config: &SimilarityConfig) -> f64 {
    let j = jaro(a, b);
    if j < config.jaro_winkler_boost_threshold {
        return j;
    }
    let prefix_len = common_prefix_len(a, b, config.jaro_winkler_prefix_size);
    j + (prefix_len as f64) * config.jaro_winkler_prefix_weight * (1.0 - j)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_one() {
        let cfg = SimilarityConfig::default();
        assert_eq!(jaro_winkler("martha", "martha", &cfg), 1.0);
    }

    #[test]
    fn boost_applies_above_threshold() {
        let cfg = SimilarityConfig::default();
        let j = jaro("martha", "marhta");
        let jw = jaro_winkler("martha", "marhta", &cfg);
        assert!(jw >= j);
    }

    #[test]
    fn boost_withheld_below_threshold() {
        let cfg = SimilarityConfig::default();
        // "smith" vs "jones" has low base Jaro, well under the 0.7 threshold.
        let j = jaro("smith", "jones");
        let jw = jaro_winkler("smith", "jones", &cfg);
        if j < cfg.jaro_winkler_boost_threshold {
            assert_eq!(j, jw);
        }
    }

    #[test]
    fn score_is_bounded() {
        let cfg = SimilarityConfig::default();
        for (a, b) in [("", ""), ("a", ""), ("abc", "abc"), ("abcdef", "abxdef")] {
            let s = jaro_winkler(a, b, &cfg);
            assert!((0.0..=1.0).contains(&s), "{a} vs {b} -> {s}");
        }
    }

    #[test]
    fn prefix_weight_zero_disables_boost() {
        let mut cfg = SimilarityConfig::default();
        cfg.jaro_winkler_prefix_weight = 0.0;
        assert_eq!(jaro_winkler("martha", "marhta", &cfg), jaro("martha", "marhta"));
    }
}
