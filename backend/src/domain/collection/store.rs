//! # Entity Store
//!
//! The authoritative ordered sequence for one entity type. A store is an
//! immutable snapshot: every mutation returns a new store and leaves the
//! original untouched, so a half-applied state is never observable.

use crate::domain::models::{generate_id, Entity};

#[derive(Debug, Clone, PartialEq)]
pub struct EntityStore<T> {
    items: Vec<T>,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> EntityStore<T> {
    /// Deterministic copy of the seed, insertion order preserved
    pub fn initialize(seed: &[T]) -> Self {
        Self {
            items: seed.to_vec(),
        }
    }

    /// Replace every element matching `predicate` by `updater(element)`.
    /// No match is a no-op.
    pub fn replace<P, U>(&self, predicate: P, updater: U) -> Self
    where
        P: Fn(&T) -> bool,
        U: Fn(&T) -> T,
    {
        Self {
            items: self
                .items
                .iter()
                .map(|item| if predicate(item) { updater(item) } else { item.clone() })
                .collect(),
        }
    }

    /// Drop the element with `id`. Removing an absent id is a no-op.
    pub fn remove(&self, id: &str) -> Self {
        Self {
            items: self.items.iter().filter(|item| item.id() != id).cloned().collect(),
        }
    }

    /// Append `entity` under a freshly generated id; returns the new store and
    /// the stored record.
    pub fn insert(&self, mut entity: T) -> (Self, T) {
        let mut id = generate_id(T::KIND);
        while self.contains(&id) {
            id = generate_id(T::KIND);
        }
        entity.set_id(id);

        let mut items = self.items.clone();
        items.push(entity.clone());
        (Self { items }, entity)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
