//! # Storage Traits
//!
//! Storage abstractions the domain layer is written against. The collection
//! manager only sees `Repository<T>`, so the in-memory implementation used by
//! tests and demos can be swapped for the CSV store without touching any
//! mutation logic.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::Entity;

/// Storage-agnostic collection of one entity type, in insertion order
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// All records in insertion order
    async fn list(&self) -> Result<Vec<T>>;

    /// Retrieve a single record by id
    async fn get(&self, id: &str) -> Result<Option<T>>;

    /// Append a record under a freshly generated id and return the stored record
    async fn insert(&self, entity: T) -> Result<T>;

    /// Replace the record with the same id.
    /// Returns true if the id existed, false otherwise
    async fn update(&self, entity: &T) -> Result<bool>;

    /// Remove a record.
    /// Returns true if the record was found and removed, false otherwise
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// A single configuration document (salon settings, media library)
#[async_trait]
pub trait DocumentStorage<D>: Send + Sync
where
    D: Clone + Send + Sync + 'static,
{
    /// The stored document, or None if nothing was saved yet
    async fn load(&self) -> Result<Option<D>>;

    async fn save(&self, document: &D) -> Result<()>;
}
