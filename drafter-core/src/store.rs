//! Entity Store — the authoritative ordered collection of document entities.
//!
//! Entities are addressed two ways:
//!
//! * **by position** — `get`, `remove`, `replace`, `update`.  Positions shift
//!   down by one for every entity after a removed slot.
//! * **by id** — `index_of` / `get_by_id`.  The state log keeps ids, never
//!   positions, so every change it replays locates its target afresh.
//!
//! Every mutation bumps [`EntityStore::revision`] so derived indexes know
//! when to rebuild.

use thiserror::Error;

use crate::{Entity, EntityId, EntityProps};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

#[derive(Clone, Debug, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
    revision: u64,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ───────────────────── mutation ─────────────────────

    /// Append an entity and return its index.
    pub fn add(&mut self, entity: Entity) -> usize {
        self.entities.push(entity);
        self.revision += 1;
        self.entities.len() - 1
    }

    /// Remove the entity at `index`, shifting every later entity down by one.
    pub fn remove(&mut self, index: usize) -> Result<Entity, StoreError> {
        self.check(index)?;
        self.revision += 1;
        Ok(self.entities.remove(index))
    }

    /// Swap the entity at `index` for `entity`, returning the old one.
    pub fn replace(&mut self, index: usize, entity: Entity) -> Result<Entity, StoreError> {
        self.check(index)?;
        self.revision += 1;
        Ok(std::mem::replace(&mut self.entities[index], entity))
    }

    /// Write `props` onto the entity at `index`.
    ///
    /// Returns the values the written fields held beforehand.
    pub fn update(&mut self, index: usize, props: &EntityProps) -> Result<EntityProps, StoreError> {
        self.check(index)?;
        let entity = &mut self.entities[index];
        let before = entity.snapshot(props);
        entity.apply(props);
        self.revision += 1;
        Ok(before)
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.revision += 1;
    }

    // ───────────────────── queries ─────────────────────

    /// Current position of the entity with this id.
    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn get_by_id(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Mutation counter. Strictly increases with every change to the store.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn check(&self, index: usize) -> Result<(), StoreError> {
        if index < self.entities.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfBounds {
                index,
                len: self.entities.len(),
            })
        }
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    fn line(x: f64) -> Entity {
        Entity::line(Point::new(x, 0.0), Point::new(x, 10.0))
    }

    #[test]
    fn test_add_returns_index() {
        let mut store = EntityStore::new();
        assert_eq!(store.add(line(0.0)), 0);
        assert_eq!(store.add(line(1.0)), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove_shifts_later_indices() {
        let mut store = EntityStore::new();
        let entities: Vec<Entity> = (0..5).map(|i| line(i as f64)).collect();
        for e in &entities {
            store.add(e.clone());
        }

        store.remove(1).unwrap();

        assert_eq!(store.index_of(entities[0].id), Some(0));
        assert_eq!(store.index_of(entities[1].id), None);
        for (old, e) in entities.iter().enumerate().skip(2) {
            assert_eq!(store.index_of(e.id), Some(old - 1));
        }
    }

    #[test]
    fn test_out_of_bounds_is_an_error() {
        let mut store = EntityStore::new();
        assert_eq!(
            store.remove(0),
            Err(StoreError::IndexOutOfBounds { index: 0, len: 0 })
        );
        assert!(store.update(3, &EntityProps::default()).is_err());
        assert!(store.replace(0, line(0.0)).is_err());
    }

    #[test]
    fn test_update_returns_previous_values() {
        let mut store = EntityStore::new();
        let idx = store.add(line(0.0).with_layer("walls"));
        let before = store
            .update(idx, &EntityProps::default().with_layer("doors"))
            .unwrap();
        assert_eq!(before.layer.as_deref(), Some("walls"));
        assert_eq!(store.get(idx).unwrap().layer, "doors");
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut store = EntityStore::new();
        store.add(line(0.0));
        store.add(line(1.0));
        let fresh = line(9.0);
        let fresh_id = fresh.id;
        store.replace(0, fresh).unwrap();
        assert_eq!(store.index_of(fresh_id), Some(0));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_identity_is_by_id_not_value() {
        let mut store = EntityStore::new();
        let a = line(0.0);
        let mut twin = a.clone();
        twin.id = uuid::Uuid::new_v4();
        store.add(a.clone());
        store.add(twin.clone());
        assert_eq!(store.index_of(a.id), Some(0));
        assert_eq!(store.index_of(twin.id), Some(1));
    }

    #[test]
    fn test_revision_bumps_on_every_mutation() {
        let mut store = EntityStore::new();
        let r0 = store.revision();
        let idx = store.add(line(0.0));
        let r1 = store.revision();
        store.update(idx, &EntityProps::default().with_layer("x")).unwrap();
        let r2 = store.revision();
        store.remove(idx).unwrap();
        assert!(r0 < r1 && r1 < r2 && r2 < store.revision());
    }
}
