//! # In-memory storage
//!
//! Process-lifetime storage used by tests, demos and the `memory` storage
//! backend. Each call swaps in a new `EntityStore` snapshot.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use tokio::sync::RwLock;

use crate::domain::collection::EntityStore;
use crate::domain::models::Entity;
use crate::storage::traits::{DocumentStorage, Repository};

pub struct InMemoryRepository<T> {
    store: RwLock<EntityStore<T>>,
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(EntityStore::default()),
        }
    }

    /// Repository holding a deterministic copy of `seed`
    pub fn with_seed(seed: &[T]) -> Self {
        Self {
            store: RwLock::new(EntityStore::initialize(seed)),
        }
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn list(&self) -> Result<Vec<T>> {
        Ok(self.store.read().await.items().to_vec())
    }

    async fn get(&self, id: &str) -> Result<Option<T>> {
        Ok(self.store.read().await.get(id).cloned())
    }

    async fn insert(&self, entity: T) -> Result<T> {
        let mut store = self.store.write().await;
        let (next, stored) = store.insert(entity);
        *store = next;
        debug!("Inserted {} {} in memory", T::KIND, stored.id());
        Ok(stored)
    }

    async fn update(&self, entity: &T) -> Result<bool> {
        let mut store = self.store.write().await;
        if !store.contains(entity.id()) {
            return Ok(false);
        }
        *store = store.replace(|item| item.id() == entity.id(), |_| entity.clone());
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut store = self.store.write().await;
        if !store.contains(id) {
            return Ok(false);
        }
        *store = store.remove(id);
        Ok(true)
    }
}

/// Single document held in memory
pub struct InMemoryDocument<D> {
    document: RwLock<Option<D>>,
}

impl<D> InMemoryDocument<D> {
    pub fn new(initial: Option<D>) -> Self {
        Self {
            document: RwLock::new(initial),
        }
    }
}

#[async_trait]
impl<D> DocumentStorage<D> for InMemoryDocument<D>
where
    D: Clone + Send + Sync + 'static,
{
    async fn load(&self) -> Result<Option<D>> {
        Ok(self.document.read().await.clone())
    }

    async fn save(&self, document: &D) -> Result<()> {
        *self.document.write().await = Some(document.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Client;

    fn client(id: &str, name: &str) -> Client {
        Client {
            id: id.to_string(),
            name: name.to_string(),
            phone: "+1234567890".to_string(),
            email: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_in_order() {
        let repo = InMemoryRepository::with_seed(&[client("client::a", "Sarah")]);
        let stored = repo.insert(client("", "Emily")).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Sarah");
        assert_eq!(all[1].id, stored.id);
    }

    #[tokio::test]
    async fn test_update_and_delete_report_existence() {
        let repo = InMemoryRepository::with_seed(&[client("client::a", "Sarah")]);

        assert!(repo.update(&client("client::a", "Sarah J.")).await.unwrap());
        assert!(!repo.update(&client("client::zz", "Ghost")).await.unwrap());
        assert_eq!(repo.get("client::a").await.unwrap().unwrap().name, "Sarah J.");

        assert!(repo.delete("client::a").await.unwrap());
        assert!(!repo.delete("client::a").await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_document_round_trip() {
        let doc = InMemoryDocument::new(None);
        assert_eq!(doc.load().await.unwrap(), None::<String>);
        doc.save(&"hello".to_string()).await.unwrap();
        assert_eq!(doc.load().await.unwrap().as_deref(), Some("hello"));
    }
}
