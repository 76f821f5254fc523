//! Relations between entities that never own either endpoint.

use slotmap::{SecondaryMap, SlotMap, new_key_type};

use crate::entity::Entity;
use crate::error::GenerationError;
use crate::map::{EntityId, Map};

new_key_type! {
    pub struct RelationId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Wears,
    Contains,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Relation {
    pub kind: RelationKind,
    pub from: EntityId,
    pub to: EntityId,
}

impl Relation {
    /// `None` once the entity has left the map.
    pub fn resolve_from<'m>(&self, map: &'m Map) -> Option<&'m Entity> {
        map.entity(self.from)
    }

    pub fn resolve_to<'m>(&self, map: &'m Map) -> Option<&'m Entity> {
        map.entity(self.to)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Relations {
    relations: SlotMap<RelationId, Relation>,
    by_entity: SecondaryMap<EntityId, Vec<RelationId>>,
}

impl Relations {
    pub fn get(&self, id: RelationId) -> Option<&Relation> {
        self.relations.get(id)
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn relations_of(&self, entity: EntityId) -> impl Iterator<Item = (RelationId, &Relation)> {
        self.by_entity
            .get(entity)
            .into_iter()
            .flatten()
            .filter_map(|&id| self.relations.get(id).map(|relation| (id, relation)))
    }

    pub(crate) fn attach(
        &mut self,
        kind: RelationKind,
        from: EntityId,
        to: EntityId,
        entities: &SlotMap<EntityId, Entity>,
    ) -> Result<RelationId, GenerationError> {
        if !entities.contains_key(from) || !entities.contains_key(to) {
            return Err(GenerationError::MissingEntity);
        }
        let id = self.relations.insert(Relation { kind, from, to });
        for endpoint in [from, to] {
            if let Some(entry) = self.by_entity.entry(endpoint) {
                let ids = entry.or_default();
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        Ok(id)
    }

    pub(crate) fn detach(&mut self, id: RelationId) -> Option<Relation> {
        let relation = self.relations.remove(id)?;
        for endpoint in [relation.from, relation.to] {
            if let Some(ids) = self.by_entity.get_mut(endpoint) {
                ids.retain(|&other| other != id);
            }
        }
        Some(relation)
    }

    /// Drops every relation naming `entity`.
    pub(crate) fn forget(&mut self, entity: EntityId) {
        let Some(ids) = self.by_entity.remove(entity) else {
            return;
        };
        for id in ids {
            self.detach(id);
        }
    }
}
