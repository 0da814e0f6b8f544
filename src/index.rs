//! In-memory entity index (§4.7).
//!
//! Reads never block on a writer and writers never block on readers: the
//! whole index is an immutable [`IndexGeneration`] behind an
//! [`arc_swap::ArcSwap`]. A refresh builds the next generation off to the
//! side and then does one atomic pointer swap; any reader mid-search keeps
//! working against the generation it already has a handle on.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::entity::{Entity, EntityType, Source};
use crate::error::{MatchError, MatchResult};

#[derive(Debug, Default)]
struct IndexGeneration {
    entities: Vec<Arc<Entity>>,
    by_source: HashMap<Source, Vec<usize>>,
    by_type: HashMap<EntityType, Vec<usize>>,
}

impl IndexGeneration {
    fn build(entities: Vec<Entity>) -> Self {
        let mut by_source: HashMap<Source, Vec<usize>> = HashMap::new();
        let mut by_type: HashMap<EntityType, Vec<usize>> = HashMap::new();
        let mut stored = Vec::with_capacity(entities.len());

        for (idx, entity) in entities.into_iter().enumerate() {
            by_source.entry(entity.source.clone()).or_default().push(idx);
            by_type.entry(entity.entity_type).or_default().push(idx);
            stored.push(Arc::new(entity));
        }

        IndexGeneration {
            entities: stored,
            by_source,
            by_type,
        }
    }
}

/// Lock-free, read-mostly entity store. Every entity held must already be
/// prepared (§4.7's normalize-on-insert invariant); unprepared entities are
/// rejected rather than silently normalized on the caller's behalf, so the
/// normalizer version stamped on each entity stays the caller's
/// responsibility to manage.
pub struct EntityIndex {
    generation: ArcSwap<IndexGeneration>,
}

impl Default for EntityIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityIndex {
    pub fn new() -> Self {
        EntityIndex {
            generation: ArcSwap::from_pointee(IndexGeneration::default()),
        }
    }

    fn validate_prepared(entities: &[Entity]) -> MatchResult<()> {
        if let Some(bad) = entities.iter().find(|e| !e.is_prepared()) {
            return Err(MatchError::Validation(format!(
                "entity {} has no prepared fields; call Entity::prepare before indexing",
                bad.id
            )));
        }
        Ok(())
    }

    /// Replace the entire index contents in one atomic swap.
    pub fn replace_all(&self, entities: Vec<Entity>) -> MatchResult<()> {
        Self::validate_prepared(&entities)?;
        let count = entities.len();
        let next = IndexGeneration::build(entities);
        self.generation.store(Arc::new(next));
        tracing::info!(entity_count = count, "index generation replaced");
        Ok(())
    }

    /// Append entities to the current generation, producing a new one.
    pub fn add_all(&self, entities: Vec<Entity>) -> MatchResult<()> {
        Self::validate_prepared(&entities)?;
        let current = self.generation.load();
        let mut merged: Vec<Entity> = current
            .entities
            .iter()
            .map(|arc| (**arc).clone())
            .collect();
        let added = entities.len();
        merged.extend(entities);
        let next = IndexGeneration::build(merged);
        let total = next.entities.len();
        self.generation.store(Arc::new(next));
        tracing::info!(added, total, "entities added to index");
        Ok(())
    }

    pub fn clear(&self) {
        self.generation.store(Arc::new(IndexGeneration::default()));
        tracing::info!("index cleared");
    }

    pub fn size(&self) -> usize {
        self.generation.load().entities.len()
    }

    pub fn get_all(&self) -> Vec<Arc<Entity>> {
        self.generation.load().entities.clone()
    }

    pub fn get_by_source(&self, source: &Source) -> Vec<Arc<Entity>> {
        let gen = self.generation.load();
        gen.by_source
            .get(source)
            .map(|idxs| idxs.iter().map(|&i| gen.entities[i].clone()).collect())
            .unwrap_or_default()
    }

    pub fn get_by_type(&self, entity_type: EntityType) -> Vec<Arc<Entity>> {
        let gen = self.generation.load();
        gen.by_type
            .get(&entity_type)
            .map(|idxs| idxs.iter().map(|&i| gen.entities[i].clone()).collect())
            .unwrap_or_default()
    }
}
