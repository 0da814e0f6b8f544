//! Best-pair token matching (§4.5).
//!
//! For each query token, finds the best-scoring index token under
//! Jaro-Winkler, aggregates with a length-weighted mean, then applies three
//! penalties (length-difference, different-first-letter, unmatched-index-
//! token) before blending with the whole-string score.

use std::collections::HashSet;

use crate::config::SimilarityConfig;
use crate::similarity::jaro_winkler::jaro_winkler;

struct BestMatch {
    score: f64,
    index_token: usize,
}

fn best_match_for_token<'a>(
    query_token: &str,
    index_tokens: &[&'a str],
    config: &SimilarityConfig,
) -> BestMatch {
    let mut best = BestMatch {
        score: 0.0,
        index_token: 0,
    };
    for (idx, &candidate) in index_tokens.iter().enumerate() {
        let score = jaro_winkler(query_token, candidate, config);
        if score > best.score {
            best = BestMatch {
                score,
                index_token: idx,
            };
        }
    }
    best
}

/// Best-pair token matching between a query string and an index string.
///
/// Both strings are assumed already normalized; tokenization is a plain
/// whitespace split.
pub fn best_pair_jaro(query: &str, index: &str, config: &SimilarityConfig) -> f64 {
    let query_tokens: Vec<&str> = query.split_whitespace().collect();
    let index_tokens: Vec<&str> = index.split_whitespace().collect();

    let full_jw = jaro_winkler(query, index, config);

    if query_tokens.is_empty() || index_tokens.is_empty() {
        return full_jw;
    }
    if query_tokens.len() == 1 || index_tokens.len() == 1 {
        return full_jw;
    }

    let matches: Vec<BestMatch> = query_tokens
        .iter()
        .map(|qt| best_match_for_token(qt, &index_tokens, config))
        .collect();

    // Length-weighted mean: weight each per-token score by its query
    // token's character length.
    let total_len: usize = query_tokens.iter().map(|t| t.chars().count()).sum();
    let weighted_sum: f64 = query_tokens
        .iter()
        .zip(matches.iter())
        .map(|(t, m)| t.chars().count() as f64 * m.score)
        .sum();
    let mut token_score = if total_len == 0 {
        0.0
    } else {
        weighted_sum / total_len as f64
    };

    // Length-difference penalty.
    let q_len = query_tokens.len();
    let i_len = index_tokens.len();
    let ratio = q_len.min(i_len) as f64 / q_len.max(i_len) as f64;
    if ratio < config.length_difference_cutoff_factor {
        token_score *= 1.0 - (1.0 - ratio) * config.length_difference_penalty_weight;
    }

    // Different-first-letter penalty: query's first token vs the index
    // token that best matched it.
    if let (Some(query_first), Some(first_match)) = (query_tokens.first(), matches.first()) {
        let matched_index_token = index_tokens[first_match.index_token];
        let qc = query_first.chars().next();
        let ic = matched_index_token.chars().next();
        if qc.is_some() && ic.is_some() && qc != ic {
            token_score *= 1.0 - config.different_letter_penalty_weight;
        }
    }

    // Unmatched-index-token penalty.
    let matched_indices: HashSet<usize> = matches.iter().map(|m| m.index_token).collect();
    let f = matched_indices.len() as f64 / index_tokens.len() as f64;
    token_score *= 1.0 - (1.0 - f) * config.unmatched_index_token_weight;

    0.6 * token_score + 0.4 * full_jw
}
