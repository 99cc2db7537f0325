//! # CSV Collection Repository
//!
//! File-based `Repository<T>` storing one collection per CSV file in the data
//! directory.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── settings.yaml
//! ├── media.yaml
//! ├── services.csv
//! ├── clients.csv
//! ├── appointments.csv
//! ├── offers.csv
//! └── reviews.csv
//! ```
//!
//! Every mutation reads the file into an `EntityStore`, applies the store
//! operation and writes the whole snapshot to a temporary file that is then
//! renamed over the original, so a reader never sees a half-written file.
//! Rows that fail to parse are left out of reads with a warning, and are
//! written back unchanged after the parsed rows so a mutation never drops
//! them.

use anyhow::Result;
use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::marker::PhantomData;
use std::path::PathBuf;
use tokio::sync::Mutex;

use super::connection::CsvConnection;
use super::records::CsvEntity;
use crate::domain::collection::EntityStore;
use crate::storage::traits::Repository;

/// Parsed rows plus the raw rows that could not be parsed
struct CsvSnapshot<T> {
    store: EntityStore<T>,
    headers: Option<StringRecord>,
    unparsed: Vec<StringRecord>,
}

impl<T> CsvSnapshot<T> {
    fn empty() -> Self {
        Self {
            store: EntityStore::default(),
            headers: None,
            unparsed: Vec::new(),
        }
    }

    fn with_store(&self, store: EntityStore<T>) -> Self {
        Self {
            store,
            headers: self.headers.clone(),
            unparsed: self.unparsed.clone(),
        }
    }
}

pub struct CsvRepository<T> {
    connection: CsvConnection,
    /// Serializes read-modify-write cycles on the file
    file_lock: Mutex<()>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: CsvEntity> CsvRepository<T> {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            connection,
            file_lock: Mutex::new(()),
            _entity: PhantomData,
        }
    }

    /// Open the repository, writing `seed` only if the file does not exist yet
    pub fn with_seed(connection: CsvConnection, seed: &[T]) -> Result<Self> {
        let repository = Self::new(connection);
        if !repository.file_path().exists() {
            repository.write_snapshot(&CsvSnapshot::empty().with_store(EntityStore::initialize(seed)))?;
            info!("Seeded {} with {} records", T::FILE_NAME, seed.len());
        }
        Ok(repository)
    }

    pub fn file_path(&self) -> PathBuf {
        self.connection.file_path(&format!("{}.csv", T::FILE_NAME))
    }

    fn read_snapshot(&self) -> Result<CsvSnapshot<T>> {
        let path = self.file_path();
        if !path.exists() {
            return Ok(CsvSnapshot::empty());
        }

        let file = File::open(&path)?;
        // flexible so a short or long row is kept as unparsed instead of failing the read
        let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(BufReader::new(file));
        let headers = csv_reader.headers()?.clone();

        let mut items = Vec::new();
        let mut unparsed = Vec::new();
        for (line, result) in csv_reader.records().enumerate() {
            let raw = result?;
            let parsed = raw
                .deserialize::<T::Record>(Some(&headers))
                .map_err(anyhow::Error::from)
                .and_then(T::from_record);
            match parsed {
                Ok(entity) => items.push(entity),
                Err(e) => {
                    warn!("Failed to parse {} record {}: {}. Skipping.", T::KIND, line + 1, e);
                    unparsed.push(raw);
                }
            }
        }

        Ok(CsvSnapshot {
            store: EntityStore::initialize(&items),
            headers: Some(headers),
            unparsed,
        })
    }

    fn write_snapshot(&self, snapshot: &CsvSnapshot<T>) -> Result<()> {
        let path = self.file_path();
        let temp_path = path.with_extension("csv.tmp");

        {
            let temp_file = File::create(&temp_path)?;
            let mut csv_writer = WriterBuilder::new().flexible(true).from_writer(BufWriter::new(temp_file));
            // serialize writes the header with the first row; without rows the
            // kept rows still need the file's original header
            if snapshot.store.is_empty() && !snapshot.unparsed.is_empty() {
                if let Some(headers) = &snapshot.headers {
                    csv_writer.write_record(headers)?;
                }
            }
            for entity in snapshot.store.items() {
                csv_writer.serialize(entity.to_record())?;
            }
            for raw in &snapshot.unparsed {
                csv_writer.write_record(raw)?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &path)?;
        if !snapshot.unparsed.is_empty() {
            warn!("Kept {} unparsed {} rows in {:?}", snapshot.unparsed.len(), T::KIND, path);
        }
        debug!("Wrote {} {} records to {:?}", snapshot.store.len(), T::KIND, path);
        Ok(())
    }
}

#[async_trait]
impl<T: CsvEntity> Repository<T> for CsvRepository<T> {
    async fn list(&self) -> Result<Vec<T>> {
        let _guard = self.file_lock.lock().await;
        Ok(self.read_snapshot()?.store.into_items())
    }

    async fn get(&self, id: &str) -> Result<Option<T>> {
        let _guard = self.file_lock.lock().await;
        Ok(self.read_snapshot()?.store.get(id).cloned())
    }

    async fn insert(&self, entity: T) -> Result<T> {
        let _guard = self.file_lock.lock().await;
        let snapshot = self.read_snapshot()?;
        let (next, stored) = snapshot.store.insert(entity);
        self.write_snapshot(&snapshot.with_store(next))?;
        Ok(stored)
    }

    async fn update(&self, entity: &T) -> Result<bool> {
        let _guard = self.file_lock.lock().await;
        let snapshot = self.read_snapshot()?;
        if !snapshot.store.contains(entity.id()) {
            return Ok(false);
        }
        let next = snapshot
            .store
            .replace(|item| item.id() == entity.id(), |_| entity.clone());
        self.write_snapshot(&snapshot.with_store(next))?;
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.file_lock.lock().await;
        let snapshot = self.read_snapshot()?;
        if !snapshot.store.contains(id) {
            return Ok(false);
        }
        let next = snapshot.store.remove(id);
        self.write_snapshot(&snapshot.with_store(next))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;
    use shared::{Appointment, AppointmentStatus, Review, ReviewStatus, Service};

    fn service(name: &str, tag: &str, price: f64) -> Service {
        Service {
            id: String::new(),
            tag: tag.to_string(),
            name: name.to_string(),
            description: format!("{} description", name),
            price,
            duration_minutes: 60,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_insert_persists_across_instances() -> Result<()> {
        let env = TestEnvironment::new().await?;

        let repo: CsvRepository<Service> = CsvRepository::new(env.connection.clone());
        let stored = repo.insert(service("Facial", "facial", 85.0)).await?;

        let reopened: CsvRepository<Service> = CsvRepository::new(env.connection.clone());
        let all = reopened.list().await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], stored);
        assert!(env.base_directory().join("services.csv").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_only_when_file_missing() -> Result<()> {
        let env = TestEnvironment::new().await?;
        let mut seeded = service("Haircut", "haircut", 60.0);
        seeded.id = "service::haircut".to_string();

        let repo = CsvRepository::with_seed(env.connection.clone(), &[seeded.clone()])?;
        assert!(repo.delete("service::haircut").await?);

        let reopened = CsvRepository::with_seed(env.connection.clone(), &[seeded])?;
        assert!(reopened.list().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete() -> Result<()> {
        let env = TestEnvironment::new().await?;
        let repo: CsvRepository<Service> = CsvRepository::new(env.connection.clone());

        let mut stored = repo.insert(service("Waxing", "waxing", 40.0)).await?;
        stored.price = 45.0;
        assert!(repo.update(&stored).await?);
        assert_eq!(repo.get(&stored.id).await?.map(|s| s.price), Some(45.0));

        let mut ghost = stored.clone();
        ghost.id = "service::ghost".to_string();
        assert!(!repo.update(&ghost).await?);

        assert!(repo.delete(&stored.id).await?);
        assert!(!repo.delete(&stored.id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_appointments_and_reviews_round_trip_through_file() -> Result<()> {
        let env = TestEnvironment::new().await?;
        let appointments: CsvRepository<Appointment> = CsvRepository::new(env.connection.clone());
        let reviews: CsvRepository<Review> = CsvRepository::new(env.connection.clone());

        let appointment = appointments
            .insert(Appointment {
                id: String::new(),
                client_id: "client::1".to_string(),
                service_id: "service::1".to_string(),
                service_tag: "haircut".to_string(),
                service_name: "Haircut & Styling".to_string(),
                date: chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                time_slot: "2:30 PM".parse().unwrap(),
                status: AppointmentStatus::Upcoming,
                price: 60.0,
                notes: Some("Bring photos, \"bob\" style".to_string()),
            })
            .await?;
        let review = reviews
            .insert(Review {
                id: String::new(),
                author_name: "Sarah Johnson".to_string(),
                service_name: Some("Haircut & Styling".to_string()),
                rating: 5.0,
                comment: "Amazing, truly".to_string(),
                images: vec!["https://cdn/a.jpg".to_string()],
                date_label: "2 weeks ago".to_string(),
                status: ReviewStatus::Approved,
            })
            .await?;

        assert_eq!(appointments.list().await?, vec![appointment]);
        assert_eq!(reviews.list().await?, vec![review]);
        Ok(())
    }

    #[tokio::test]
    async fn test_unparseable_rows_are_skipped() -> Result<()> {
        let env = TestEnvironment::new().await?;
        std::fs::write(
            env.base_directory().join("reviews.csv"),
            "id,author_name,service_name,rating,comment,images,date_label,status\n\
             review::1,Amanda Lee,,5.0,Great,,1 week ago,approved\n\
             review::2,Bad Row,,5.0,Nope,,1 week ago,archived\n",
        )?;

        let repo: CsvRepository<Review> = CsvRepository::new(env.connection.clone());
        let all = repo.list().await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].author_name, "Amanda Lee");
        Ok(())
    }

    #[tokio::test]
    async fn test_unparseable_rows_survive_mutations() -> Result<()> {
        let env = TestEnvironment::new().await?;
        std::fs::write(
            env.base_directory().join("reviews.csv"),
            "id,author_name,service_name,rating,comment,images,date_label,status\n\
             review::1,Amanda Lee,,5.0,Great,,1 week ago,approved\n\
             review::2,Bad Row,,5.0,Nope,,1 week ago,archived\n",
        )?;

        let repo: CsvRepository<Review> = CsvRepository::new(env.connection.clone());
        let inserted = repo
            .insert(Review {
                id: String::new(),
                author_name: "Rachel Green".to_string(),
                service_name: None,
                rating: 4.5,
                comment: "Lovely".to_string(),
                images: vec![],
                date_label: "Just now".to_string(),
                status: ReviewStatus::Pending,
            })
            .await?;
        assert!(repo.delete("review::1").await?);
        assert!(repo.delete(&inserted.id).await?);

        let content = std::fs::read_to_string(env.base_directory().join("reviews.csv"))?;
        assert!(content.starts_with("id,author_name,"));
        assert!(content.contains("review::2,Bad Row,,5.0,Nope,,1 week ago,archived"));
        assert!(repo.list().await?.is_empty());
        Ok(())
    }
}
