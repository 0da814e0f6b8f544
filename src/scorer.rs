//! Multi-phase weighted entity scorer (§4.6).
//!
//! The scorer never raises on well-formed input: a phase with nothing to
//! compare on either side contributes zero and is excluded from the
//! weighted average rather than penalizing the candidate. `source_id`
//! equality is a short-circuit (score `1.0`); a mismatched `source_id` on
//! an otherwise-strong candidate is diluted, not discarded, since two
//! sources can legitimately disagree on an entity's canonical ID.

use crate::config::EngineConfig;
use crate::entity::Entity;
use crate::phonetic::phonetic_compatible;
use crate::prepared::PreparedFields;
use crate::similarity::name_similarity;

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreBreakdown {
    pub name: f64,
    pub alt_name: f64,
    pub government_id: f64,
    pub crypto: f64,
    pub contact: f64,
    pub address: f64,
    pub date: f64,
    pub overall: f64,
}

struct Phase {
    score: f64,
    weight: f64,
}

fn best_of(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().fold(0.0_f64, f64::max)
}

/// Scores query entities against indexed entities. Stateless aside from its
/// config; safe to share across threads (used directly from `rayon`'s
/// worker pool in batch screening).
#[derive(Debug, Clone)]
pub struct EntityScorer {
    config: EngineConfig,
}

impl EntityScorer {
    pub fn new(config: EngineConfig) -> Self {
        EntityScorer { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Score `query` against `candidate`. Both must already be prepared;
    /// callers (search/batch) are responsible for that invariant.
    #[tracing::instrument(name = "score_entity", skip_all, fields(candidate_id = %candidate.id))]
    pub fn score(&self, query: &Entity, candidate: &Entity) -> ScoreBreakdown {
        let (Some(qp), Some(cp)) = (query.prepared.as_ref(), candidate.prepared.as_ref()) else {
            tracing::warn!("score() called on an unprepared entity; returning zero breakdown");
            return ScoreBreakdown::default();
        };

        if !query.source_id.is_empty()
            && !candidate.source_id.is_empty()
            && query.source_id == candidate.source_id
        {
            return ScoreBreakdown {
                name: 1.0,
                overall: 1.0,
                ..ScoreBreakdown::default()
            };
        }

        let weights = &self.config.weights;
        let sim = &self.config.similarity;

        let name_score = self.name_phase(qp, cp, sim);
        let alt_name_score = self.alt_name_phase(qp, cp, sim);
        let gov_id_score = self.government_id_phase(qp, cp);
        let crypto_score = self.crypto_phase(qp, cp);
        let contact_score = self.contact_phase(qp, cp);
        let address_score = self.address_phase(qp, cp, sim);
        let date_score = self.date_phase(query, candidate);

        // Name and alt-name share a single weight bucket: an alias hit should
        // win outright over a weak primary-name match, not be averaged down
        // by it the way two independent phases would be.
        let has_alt_names = !qp.alt_names_normalized.is_empty() || !cp.alt_names_normalized.is_empty();
        let best_name_score = if weights.alt_name_enabled && has_alt_names {
            name_score.max(alt_name_score)
        } else {
            name_score
        };

        let mut phases = Vec::with_capacity(6);
        if weights.name_enabled {
            phases.push(Phase {
                score: best_name_score,
                weight: weights.name,
            });
        }
        if weights.gov_id_enabled && gov_id_score > 0.0 {
            phases.push(Phase {
                score: gov_id_score,
                weight: weights.critical_id,
            });
        }
        if weights.crypto_enabled && crypto_score > 0.0 {
            phases.push(Phase {
                score: crypto_score,
                weight: weights.critical_id,
            });
        }
        if weights.contact_enabled && contact_score > 0.0 {
            phases.push(Phase {
                score: contact_score,
                weight: weights.critical_id,
            });
        }
        if weights.address_enabled && address_score > 0.0 {
            phases.push(Phase {
                score: address_score,
                weight: weights.address,
            });
        }
        if weights.date_enabled && date_score > 0.0 {
            phases.push(Phase {
                score: date_score,
                weight: weights.supporting_info,
            });
        }

        // Source-id mismatch is a dilutor, not a fixed discount: a zero
        // contribution at `critical_id` weight joins the weighted average
        // before it's computed, so the penalty's size depends on what else
        // is already in the mix rather than shaving a flat percentage off
        // every candidate.
        if !query.source_id.is_empty() && !candidate.source_id.is_empty() && query.source_id != candidate.source_id
        {
            phases.push(Phase {
                score: 0.0,
                weight: weights.critical_id,
            });
        }

        let total_weight: f64 = phases.iter().map(|p| p.weight).sum();
        let mut overall = if total_weight > 0.0 {
            phases.iter().map(|p| p.score * p.weight).sum::<f64>() / total_weight
        } else {
            0.0
        };

        let critical_id_hit = (weights.gov_id_enabled && gov_id_score >= 0.99)
            || (weights.crypto_enabled && crypto_score >= 0.99)
            || (weights.contact_enabled && contact_score >= 0.99);
        if critical_id_hit {
            overall = 0.7 + 0.3 * name_score.max(alt_name_score);
        }

        tracing::debug!(
            name_score,
            alt_name_score,
            gov_id_score,
            crypto_score,
            contact_score,
            address_score,
            date_score,
            overall,
            "scored candidate"
        );

        ScoreBreakdown {
            name: name_score,
            alt_name: alt_name_score,
            government_id: gov_id_score,
            crypto: crypto_score,
            contact: contact_score,
            address: address_score,
            date: date_score,
            overall,
        }
    }

    fn name_phase(&self, qp: &PreparedFields, cp: &PreparedFields, sim: &crate::config::SimilarityConfig) -> f64 {
        let (q, c) = if sim.keep_stopwords {
            (&qp.primary_name_normalized, &cp.primary_name_normalized)
        } else {
            (&qp.primary_name_no_stopwords, &cp.primary_name_no_stopwords)
        };

        if !sim.phonetic_filtering_disabled && !phonetic_compatible(q, c) {
            return 0.0;
        }
        name_similarity(q, c, sim)
    }

    fn alt_name_phase(&self, qp: &PreparedFields, cp: &PreparedFields, sim: &crate::config::SimilarityConfig) -> f64 {
        let q_names: Vec<&String> = if qp.alt_names_no_stopwords.is_empty() {
            vec![&qp.primary_name_no_stopwords]
        } else {
            qp.alt_names_no_stopwords.iter().collect()
        };
        let c_names: Vec<&String> = std::iter::once(&cp.primary_name_no_stopwords)
            .chain(cp.alt_names_no_stopwords.iter())
            .collect();

        best_of(q_names.iter().flat_map(|q| {
            c_names.iter().map(move |c| {
                if !sim.phonetic_filtering_disabled && !phonetic_compatible(q, c) {
                    0.0
                } else {
                    name_similarity(q, c, sim)
                }
            })
        }))
    }

    /// Exact phase (§4.6): a hit requires identifier, type, and (when both
    /// sides supply one) country to all agree; there is no partial credit.
    fn government_id_phase(&self, qp: &PreparedFields, cp: &PreparedFields) -> f64 {
        if qp.government_ids.is_empty() || cp.government_ids.is_empty() {
            return 0.0;
        }
        let hit = qp
            .government_ids
            .iter()
            .any(|q| cp.government_ids.iter().any(|c| q.matches(c)));
        if hit {
            1.0
        } else {
            0.0
        }
    }

    /// Exact phase (§4.6): currency-and-address equality, address
    /// case-sensitive.
    fn crypto_phase(&self, qp: &PreparedFields, cp: &PreparedFields) -> f64 {
        if qp.crypto_addresses.is_empty() || cp.crypto_addresses.is_empty() {
            return 0.0;
        }
        let hit = qp
            .crypto_addresses
            .iter()
            .any(|q| cp.crypto_addresses.iter().any(|c| q.matches(c)));
        if hit {
            1.0
        } else {
            0.0
        }
    }

    /// Exact phase (§4.6): "email case-insensitive equality OR phone
    /// digit-only equality; returns 1 on first hit" — any single hit across
    /// email/phone/fax is enough, there is no averaging across fields.
    fn contact_phase(&self, qp: &PreparedFields, cp: &PreparedFields) -> f64 {
        for (q, c) in [
            (&qp.contact.email, &cp.contact.email),
            (&qp.contact.phone, &cp.contact.phone),
            (&qp.contact.fax, &cp.contact.fax),
        ] {
            if !q.is_empty() && !c.is_empty() && q == c {
                return 1.0;
            }
        }
        0.0
    }

    /// §4.6: `0.3*country_eq + 0.3*city_jw + 0.4*street_sim`, each
    /// component weighted only when both sides supply that field — a
    /// weighted average over present components, not a flat mean over
    /// whichever fields happen to be populated.
    fn address_phase(&self, qp: &PreparedFields, cp: &PreparedFields, sim: &crate::config::SimilarityConfig) -> f64 {
        if qp.addresses.is_empty() || cp.addresses.is_empty() {
            return 0.0;
        }
        best_of(qp.addresses.iter().flat_map(|q| {
            cp.addresses.iter().map(move |c| {
                let mut weight_sum = 0.0;
                let mut score_sum = 0.0;

                if !q.country.is_empty() && !c.country.is_empty() {
                    weight_sum += 0.3;
                    score_sum += 0.3 * if q.country == c.country { 1.0 } else { 0.0 };
                }
                if !q.city.is_empty() && !c.city.is_empty() {
                    weight_sum += 0.3;
                    score_sum += 0.3 * crate::similarity::jaro_winkler(&q.city, &c.city, sim);
                }
                let q_street = if q.line1.is_empty() { &q.line2 } else { &q.line1 };
                let c_street = if c.line1.is_empty() { &c.line2 } else { &c.line1 };
                if !q_street.is_empty() && !c_street.is_empty() {
                    weight_sum += 0.4;
                    score_sum += 0.4 * name_similarity(q_street, c_street, sim);
                }

                if weight_sum == 0.0 {
                    0.0
                } else {
                    score_sum / weight_sum
                }
            })
        }))
    }

    fn date_phase(&self, query: &Entity, candidate: &Entity) -> f64 {
        use crate::entity::EntityDetails::*;
        match (&query.details, &candidate.details) {
            (Person { birth_date: Some(a), .. }, Person { birth_date: Some(b), .. }) => {
                if a == b {
                    1.0
                } else {
                    0.0
                }
            }
            (Corporate { created_date: Some(a), .. }, Corporate { created_date: Some(b), .. }) => {
                if a == b {
                    1.0
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityType, GovernmentId, Source};

    fn entity(id: &str, name: &str) -> Entity {
        Entity::new(id, name, EntityType::Person, Source::OfacSdn).prepare()
    }

    #[test]
    fn identical_names_score_highly() {
        let scorer = EntityScorer::new(EngineConfig::default());
        let q = entity("q", "Nicolas Maduro Moros");
        let c = entity("c", "Nicolas Maduro Moros");
        let breakdown = scorer.score(&q, &c);
        assert!(breakdown.overall >= 0.99, "{breakdown:?}");
    }

    #[test]
    fn matching_source_id_short_circuits_to_one() {
        let scorer = EntityScorer::new(EngineConfig::default());
        let q = Entity::new("q", "Someone Else", EntityType::Person, Source::OfacSdn)
            .with_source_id("SDN-9")
            .prepare();
        let c = Entity::new("c", "Totally Different", EntityType::Person, Source::OfacSdn)
            .with_source_id("SDN-9")
            .prepare();
        let breakdown = scorer.score(&q, &c);
        assert_eq!(breakdown.overall, 1.0);
    }

    #[test]
    fn mismatched_source_id_dilutes_rather_than_discards() {
        let scorer = EntityScorer::new(EngineConfig::default());
        let q = Entity::new("q", "Nicolas Maduro Moros", EntityType::Person, Source::OfacSdn)
            .with_source_id("A")
            .prepare();
        let c = Entity::new("c", "Nicolas Maduro Moros", EntityType::Person, Source::OfacSdn)
            .with_source_id("B")
            .prepare();
        let breakdown = scorer.score(&q, &c);
        let weights = &scorer.config().weights;
        let expected = breakdown.name * weights.name / (weights.name + weights.critical_id);
        assert!((breakdown.overall - expected).abs() < 1e-9, "{breakdown:?}");
        assert!(breakdown.overall > 0.0 && breakdown.overall < breakdown.name, "{breakdown:?}");
    }

    #[test]
    fn unrelated_names_score_low() {
        let scorer = EntityScorer::new(EngineConfig::default());
        let q = entity("q", "John Smith");
        let c = entity("c", "Zizhou Peng");
        let breakdown = scorer.score(&q, &c);
        assert!(breakdown.overall < 0.5, "{breakdown:?}");
    }

    #[test]
    fn exact_gov_id_boosts_a_weak_name_match() {
        let scorer = EntityScorer::new(EngineConfig::default());
        let q = Entity::new("q", "Roberto Martinez", EntityType::Person, Source::OfacSdn)
            .with_government_ids(vec![GovernmentId {
                identifier: "P1234567".into(),
                id_type: "passport".into(),
                country: None,
            }])
            .prepare();
        let c = Entity::new("c", "Roberto Alvarez", EntityType::Person, Source::OfacSdn)
            .with_government_ids(vec![GovernmentId {
                identifier: "P1234567".into(),
                id_type: "passport".into(),
                country: None,
            }])
            .prepare();
        let breakdown = scorer.score(&q, &c);
        let expected = 0.7 + 0.3 * breakdown.name.max(breakdown.alt_name);
        assert!((breakdown.overall - expected).abs() < 1e-9, "{breakdown:?}");
        assert!(breakdown.overall > expected.min(0.7), "{breakdown:?}");
    }

    #[test]
    fn unprepared_entities_yield_zero_breakdown() {
        let scorer = EntityScorer::new(EngineConfig::default());
        let q = Entity::new("q", "No Prepare", EntityType::Person, Source::OfacSdn);
        let c = entity("c", "No Prepare");
        let breakdown = scorer.score(&q, &c);
        assert_eq!(breakdown.overall, 0.0);
    }
}
