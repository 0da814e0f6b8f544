//! Immutable configuration value records.
//!
//! `SimilarityConfig` and `WeightConfig` are plain data: no interior
//! mutability, no "reconfigure at runtime" methods. An operator-facing layer
//! outside this crate is free to deserialize these from TOML/JSON/env and
//! hand a fresh value in; "runtime reconfiguration" is just constructing a
//! new config and passing it to the next call.

use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// Tunables for the Jaro-Winkler engine and its best-pair token matching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// J threshold above which the Winkler prefix boost applies.
    pub jaro_winkler_boost_threshold: f64,
    /// Max common-prefix length considered for the boost.
    pub jaro_winkler_prefix_size: usize,
    /// Weight applied to the capped prefix length in the boost formula.
    pub jaro_winkler_prefix_weight: f64,
    /// Ratio below which the length-difference penalty applies.
    pub length_difference_cutoff_factor: f64,
    /// Strength of the length-difference penalty.
    pub length_difference_penalty_weight: f64,
    /// Strength of the different-first-letter penalty.
    pub different_letter_penalty_weight: f64,
    /// Strength of the unmatched-index-token penalty.
    pub unmatched_index_token_weight: f64,
    /// Disables the Soundex prefilter (§4.4). Affects performance only.
    pub phonetic_filtering_disabled: bool,
    /// Skips stopword removal (§4.3) when normalizing names for comparison.
    pub keep_stopwords: bool,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            jaro_winkler_boost_threshold: 0.7,
            jaro_winkler_prefix_size: 4,
            jaro_winkler_prefix_weight: 0.1,
            length_difference_cutoff_factor: 0.9,
            length_difference_penalty_weight: 0.3,
            different_letter_penalty_weight: 0.9,
            unmatched_index_token_weight: 0.15,
            phonetic_filtering_disabled: false,
            keep_stopwords: false,
        }
    }
}

impl SimilarityConfig {
    pub fn validate(&self) -> Result<(), MatchError> {
        let checks: &[(&str, f64)] = &[
            (
                "jaro_winkler_boost_threshold",
                self.jaro_winkler_boost_threshold,
            ),
            (
                "length_difference_cutoff_factor",
                self.length_difference_cutoff_factor,
            ),
        ];
        for (name, value) in checks {
            if !(0.0..=1.0).contains(value) {
                return Err(MatchError::Validation(format!(
                    "{name} must be in [0,1], got {value}"
                )));
            }
        }
        if self.jaro_winkler_prefix_size == 0 {
            return Err(MatchError::Validation(
                "jaro_winkler_prefix_size must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Per-phase enable switches plus aggregation weights for the entity scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    pub name: f64,
    pub address: f64,
    pub critical_id: f64,
    pub supporting_info: f64,

    pub name_enabled: bool,
    pub alt_name_enabled: bool,
    pub gov_id_enabled: bool,
    pub crypto_enabled: bool,
    pub contact_enabled: bool,
    pub address_enabled: bool,
    pub date_enabled: bool,

    /// Default `min_match` for the search service (§6: `weights.minimum_score`).
    pub minimum_score: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            name: 35.0,
            address: 25.0,
            critical_id: 50.0,
            supporting_info: 15.0,
            name_enabled: true,
            alt_name_enabled: true,
            gov_id_enabled: true,
            crypto_enabled: true,
            contact_enabled: true,
            address_enabled: true,
            date_enabled: true,
            minimum_score: 0.88,
        }
    }
}

impl WeightConfig {
    pub fn validate(&self) -> Result<(), MatchError> {
        for (name, value) in [
            ("name", self.name),
            ("address", self.address),
            ("critical_id", self.critical_id),
            ("supporting_info", self.supporting_info),
        ] {
            if value < 0.0 {
                return Err(MatchError::Validation(format!(
                    "weight {name} must be >= 0, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.minimum_score) {
            return Err(MatchError::Validation(format!(
                "minimum_score must be in [0,1], got {}",
                self.minimum_score
            )));
        }
        Ok(())
    }
}

/// Bundles both config records so they can be threaded through as one value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    pub similarity: SimilarityConfig,
    pub weights: WeightConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), MatchError> {
        self.similarity.validate()?;
        self.weights.validate()?;
        Ok(())
    }
}
