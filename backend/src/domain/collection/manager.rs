//! # Collection Manager
//!
//! Generic CRUD + filter controller over a `Repository<T>`, reused for
//! services, clients, appointments, offers and reviews.
//!
//! Every mutation runs under a single FIFO write lock, so mutations are
//! applied in call order and each read-modify-write is atomic. The optional
//! simulated latency is awaited while the lock is held; it delays but never
//! reorders operations.

use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::filter::FilterSet;
use super::gate::ConfirmationGate;
use crate::domain::models::{CollectionError, CollectionResult, Entity, Validate};
use crate::storage::Repository;

pub struct CollectionManager<T: Entity> {
    repository: Arc<dyn Repository<T>>,
    write_lock: Arc<Mutex<()>>,
    gate: ConfirmationGate,
    latency: Option<Duration>,
}

impl<T: Entity> Clone for CollectionManager<T> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            write_lock: Arc::clone(&self.write_lock),
            gate: self.gate.clone(),
            latency: self.latency,
        }
    }
}

impl<T: Entity + Validate> CollectionManager<T> {
    pub fn new(repository: Arc<dyn Repository<T>>) -> Self {
        Self {
            repository,
            write_lock: Arc::new(Mutex::new(())),
            gate: ConfirmationGate::new(),
            latency: None,
        }
    }

    /// Delay applied inside every mutation, mimicking a save round-trip
    pub fn with_latency(mut self, latency: Option<Duration>) -> Self {
        self.latency = latency.filter(|d| !d.is_zero());
        self
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    pub async fn list(&self) -> CollectionResult<Vec<T>> {
        Ok(self.repository.list().await?)
    }

    pub async fn list_filtered(&self, filters: &FilterSet) -> CollectionResult<Vec<T>> {
        let items = self.repository.list().await?;
        Ok(filters.apply(&items))
    }

    pub async fn find(&self, id: &str) -> CollectionResult<Option<T>> {
        Ok(self.repository.get(id).await?)
    }

    pub async fn get(&self, id: &str) -> CollectionResult<T> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| CollectionError::not_found(T::KIND, id))
    }

    pub async fn len(&self) -> CollectionResult<usize> {
        Ok(self.repository.list().await?.len())
    }

    /// Validate and append under a fresh id
    pub async fn create(&self, entity: T) -> CollectionResult<T> {
        let _guard = self.write_lock.lock().await;
        self.simulate_latency().await;

        if let Err(errors) = entity.validate() {
            warn!("Rejected new {}: {}", T::KIND, errors);
            return Err(CollectionError::Validation(errors));
        }

        let stored = self.repository.insert(entity).await?;
        info!("Created {} {}", T::KIND, stored.id());
        Ok(stored)
    }

    /// Full-record replace. The stored id always wins over the incoming one.
    pub async fn update(&self, id: &str, mut entity: T) -> CollectionResult<T> {
        let _guard = self.write_lock.lock().await;
        self.simulate_latency().await;

        if self.repository.get(id).await?.is_none() {
            return Err(CollectionError::not_found(T::KIND, id));
        }
        entity.set_id(id.to_string());

        if let Err(errors) = entity.validate() {
            warn!("Rejected update of {} {}: {}", T::KIND, id, errors);
            return Err(CollectionError::Validation(errors));
        }

        self.store_replacement(&entity).await?;
        info!("Updated {} {}", T::KIND, id);
        Ok(entity)
    }

    /// Read-modify-write under the lock: `change` derives the new record from
    /// the current one and the result is validated. Returns the record before
    /// and after the change.
    pub async fn modify<F>(&self, id: &str, change: F) -> CollectionResult<(T, T)>
    where
        F: FnOnce(&T) -> CollectionResult<T> + Send,
    {
        self.apply_change(id, change, true).await
    }

    /// Single-field change (status, active flag) that succeeds whenever the
    /// target exists. The rest of the record is stored as it was, so a
    /// record that fails validation elsewhere can still be transitioned.
    pub async fn transition<F>(&self, id: &str, change: F) -> CollectionResult<(T, T)>
    where
        F: FnOnce(&T) -> CollectionResult<T> + Send,
    {
        self.apply_change(id, change, false).await
    }

    async fn apply_change<F>(&self, id: &str, change: F, validate: bool) -> CollectionResult<(T, T)>
    where
        F: FnOnce(&T) -> CollectionResult<T> + Send,
    {
        let _guard = self.write_lock.lock().await;
        self.simulate_latency().await;

        let before = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| CollectionError::not_found(T::KIND, id))?;

        let mut after = change(&before)?;
        after.set_id(before.id().to_string());
        if validate {
            if let Err(errors) = after.validate() {
                warn!("Rejected change of {} {}: {}", T::KIND, id, errors);
                return Err(CollectionError::Validation(errors));
            }
        }

        self.store_replacement(&after).await?;
        info!("Modified {} {}", T::KIND, id);
        Ok((before, after))
    }

    async fn store_replacement(&self, entity: &T) -> CollectionResult<()> {
        if self.repository.update(entity).await? {
            Ok(())
        } else {
            Err(CollectionError::not_found(T::KIND, entity.id()))
        }
    }

    /// First phase of a delete: mark the target and return it for the
    /// confirmation prompt.
    pub async fn request_delete(&self, id: &str) -> CollectionResult<T> {
        let target = self.get(id).await?;
        self.gate.request(id);
        info!("Delete of {} {} awaiting confirmation", T::KIND, id);
        Ok(target)
    }

    /// Second phase: remove the pending target. Returns None when nothing was
    /// pending or the target is already gone.
    pub async fn confirm_delete(&self) -> CollectionResult<Option<T>> {
        let _guard = self.write_lock.lock().await;

        let Some(id) = self.gate.confirm() else {
            info!("Confirm delete on {} with nothing pending", T::KIND);
            return Ok(None);
        };

        self.simulate_latency().await;

        let Some(existing) = self.repository.get(&id).await? else {
            info!("Pending {} {} already gone", T::KIND, id);
            return Ok(None);
        };

        if self.repository.delete(&id).await? {
            info!("Deleted {} {}", T::KIND, id);
            Ok(Some(existing))
        } else {
            Ok(None)
        }
    }

    pub fn cancel_delete(&self) -> Option<String> {
        let cancelled = self.gate.cancel();
        if let Some(id) = &cancelled {
            info!("Cancelled delete of {} {}", T::KIND, id);
        }
        cancelled
    }

    pub fn pending_delete(&self) -> Option<String> {
        self.gate.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryRepository;
    use chrono::NaiveDate;
    use shared::{Appointment, AppointmentStatus, Service};
    use std::collections::HashSet;

    fn service(name: &str, description: &str, price: f64, duration: u32) -> Service {
        Service {
            id: String::new(),
            tag: crate::domain::models::validation::slugify(name),
            name: name.to_string(),
            description: description.to_string(),
            price,
            duration_minutes: duration,
            image_url: None,
        }
    }

    fn seeded_services() -> CollectionManager<Service> {
        let seed: Vec<Service> = ["Haircut", "Facial", "Waxing"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mut s = service(name, "seeded", 40.0 + i as f64, 30);
                s.id = format!("service::seed{}", i);
                s
            })
            .collect();
        CollectionManager::new(Arc::new(InMemoryRepository::with_seed(&seed)))
    }

    fn appointment(id: &str) -> Appointment {
        Appointment {
            id: id.to_string(),
            client_id: "client::sarah".to_string(),
            service_id: "service::haircut".to_string(),
            service_tag: "haircut".to_string(),
            service_name: "Haircut & Styling".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time_slot: "10:00 AM".parse().unwrap(),
            status: AppointmentStatus::Upcoming,
            price: 60.0,
            notes: Some("First visit".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_threading_adds_unique_record() {
        let manager = seeded_services();
        let original: HashSet<String> = manager.list().await.unwrap().into_iter().map(|s| s.id).collect();

        let created = manager
            .create(service("Threading", "Brow threading", 15.0, 15))
            .await
            .unwrap();

        assert_eq!(manager.len().await.unwrap(), 4);
        assert!(!original.contains(&created.id));
        assert_eq!(manager.list().await.unwrap().last(), Some(&created));
    }

    #[tokio::test]
    async fn test_create_with_empty_name_names_field_and_keeps_store() {
        let manager = seeded_services();
        let before = manager.list().await.unwrap();

        let err = manager.create(service("", "x", 10.0, 10)).await.unwrap_err();
        match err {
            CollectionError::Validation(errors) => assert!(errors.contains("name")),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(manager.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_replaces_record_and_keeps_id() {
        let manager = seeded_services();
        let mut replacement = service("Haircut Deluxe", "Cut and blow-dry", 70.0, 75);
        replacement.id = "service::something-else".to_string();

        let updated = manager.update("service::seed0", replacement).await.unwrap();
        assert_eq!(updated.id, "service::seed0");
        assert_eq!(manager.get("service::seed0").await.unwrap().name, "Haircut Deluxe");
        assert_eq!(manager.len().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found() {
        let manager = seeded_services();
        let err = manager
            .update("service::missing", service("Nails", "Manicure", 30.0, 45))
            .await
            .unwrap_err();
        assert!(matches!(err, CollectionError::NotFound { kind: "service", .. }));
    }

    #[tokio::test]
    async fn test_status_transition_changes_only_status() {
        let original = appointment("a1");
        let manager: CollectionManager<Appointment> =
            CollectionManager::new(Arc::new(InMemoryRepository::with_seed(&[original.clone()])));

        let (before, after) = manager
            .transition("a1", |a| {
                Ok(Appointment {
                    status: AppointmentStatus::Completed,
                    ..a.clone()
                })
            })
            .await
            .unwrap();

        assert_eq!(before, original);
        assert_eq!(
            after,
            Appointment {
                status: AppointmentStatus::Completed,
                ..original
            }
        );
        assert_eq!(manager.get("a1").await.unwrap(), after);
        assert_eq!(manager.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_transition_succeeds_on_record_invalid_elsewhere() {
        // e.g. a hand-edited CSV row with a negative price
        let broken = Appointment {
            price: -5.0,
            ..appointment("a1")
        };
        let manager: CollectionManager<Appointment> =
            CollectionManager::new(Arc::new(InMemoryRepository::with_seed(&[broken])));

        let cancel = |a: &Appointment| -> CollectionResult<Appointment> {
            Ok(Appointment {
                status: AppointmentStatus::Cancelled,
                ..a.clone()
            })
        };
        let err = manager.modify("a1", cancel).await.unwrap_err();
        assert!(matches!(err, CollectionError::Validation(_)));

        let (_, after) = manager.transition("a1", cancel).await.unwrap();
        assert_eq!(after.status, AppointmentStatus::Cancelled);
        assert_eq!(after.price, -5.0);
        assert_eq!(manager.get("a1").await.unwrap().status, AppointmentStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_modify_missing_id_is_not_found() {
        let manager: CollectionManager<Appointment> =
            CollectionManager::new(Arc::new(InMemoryRepository::new()));
        let err = manager.modify("a9", |a| Ok(a.clone())).await.unwrap_err();
        assert!(matches!(err, CollectionError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_confirm_without_request_removes_nothing() {
        let manager = seeded_services();
        assert_eq!(manager.confirm_delete().await.unwrap(), None);
        assert_eq!(manager.len().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_two_phase_delete() {
        let manager = seeded_services();

        let target = manager.request_delete("service::seed1").await.unwrap();
        assert_eq!(target.name, "Facial");
        assert_eq!(manager.pending_delete().as_deref(), Some("service::seed1"));
        assert_eq!(manager.len().await.unwrap(), 3);

        let deleted = manager.confirm_delete().await.unwrap();
        assert_eq!(deleted.map(|s| s.id).as_deref(), Some("service::seed1"));
        assert_eq!(manager.len().await.unwrap(), 2);

        // Second confirm is a no-op
        assert_eq!(manager.confirm_delete().await.unwrap(), None);
        assert_eq!(manager.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_cancel_delete_keeps_record() {
        let manager = seeded_services();
        manager.request_delete("service::seed2").await.unwrap();
        assert_eq!(manager.cancel_delete().as_deref(), Some("service::seed2"));
        assert_eq!(manager.confirm_delete().await.unwrap(), None);
        assert_eq!(manager.len().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_confirm_after_target_vanished_is_noop() {
        let manager = seeded_services();
        manager.request_delete("service::seed0").await.unwrap();

        let other = manager.clone();
        other.request_delete("service::seed0").await.unwrap();
        assert!(other.confirm_delete().await.unwrap().is_some());

        // Gate is shared between clones, so it is already empty
        assert_eq!(manager.confirm_delete().await.unwrap(), None);
        assert_eq!(manager.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_request_delete_of_missing_id_fails() {
        let manager = seeded_services();
        assert!(matches!(
            manager.request_delete("service::nope").await,
            Err(CollectionError::NotFound { .. })
        ));
        assert_eq!(manager.pending_delete(), None);
    }

    #[tokio::test]
    async fn test_count_matches_creates_minus_deletes() {
        let manager: CollectionManager<Service> = CollectionManager::new(Arc::new(InMemoryRepository::new()));
        let mut ids = Vec::new();
        for i in 0..12 {
            let created = manager
                .create(service(&format!("Service {}", i), "d", 10.0, 10))
                .await
                .unwrap();
            ids.push(created.id);
        }
        // An invalid create does not count
        assert!(manager.create(service("Broken", "d", 0.0, 10)).await.is_err());

        let mut deleted = 0;
        for id in ids.iter().skip(1).step_by(2) {
            manager.request_delete(id).await.unwrap();
            if manager.confirm_delete().await.unwrap().is_some() {
                deleted += 1;
            }
        }

        let remaining = manager.list().await.unwrap();
        assert_eq!(remaining.len(), 12 - deleted);
        let unique: HashSet<&str> = remaining.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(unique.len(), remaining.len());
    }

    #[tokio::test]
    async fn test_mutations_apply_in_call_order_under_latency() {
        let manager = seeded_services().with_latency(Some(Duration::from_millis(5)));

        let mut handles = Vec::new();
        for i in 0..5 {
            let m = manager.clone();
            handles.push(tokio::spawn(async move {
                m.create(service(&format!("Queued {}", i), "d", 10.0, 10)).await
            }));
            // Give each task a chance to queue on the lock before the next spawns
            tokio::task::yield_now().await;
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let names: Vec<String> = manager
            .list()
            .await
            .unwrap()
            .into_iter()
            .skip(3)
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Queued 0", "Queued 1", "Queued 2", "Queued 3", "Queued 4"]);
    }
}
