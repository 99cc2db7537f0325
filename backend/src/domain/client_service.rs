use log::info;
use shared::{Appointment, Client, ClientSummary};

use crate::domain::collection::CollectionManager;
use crate::domain::models::CollectionResult;
use crate::domain::notification::normalize_phone;
use crate::domain::projections;

/// Service for salon clients. Visit aggregates are always derived from the
/// appointment collection on read.
#[derive(Clone)]
pub struct ClientService {
    clients: CollectionManager<Client>,
    appointments: CollectionManager<Appointment>,
}

impl ClientService {
    pub fn new(clients: CollectionManager<Client>, appointments: CollectionManager<Appointment>) -> Self {
        Self { clients, appointments }
    }

    pub async fn list(&self) -> CollectionResult<Vec<Client>> {
        self.clients.list().await
    }

    pub async fn get(&self, id: &str) -> CollectionResult<Client> {
        self.clients.get(id).await
    }

    pub async fn find(&self, id: &str) -> CollectionResult<Option<Client>> {
        self.clients.find(id).await
    }

    pub async fn list_summaries(&self) -> CollectionResult<Vec<ClientSummary>> {
        let clients = self.clients.list().await?;
        let appointments = self.appointments.list().await?;
        info!("Summarizing {} clients", clients.len());
        Ok(projections::summarize_all(&clients, &appointments))
    }

    pub async fn summary(&self, id: &str) -> CollectionResult<ClientSummary> {
        let client = self.clients.get(id).await?;
        let appointments = self.appointments.list().await?;
        Ok(projections::summarize(&client, &appointments))
    }

    /// Match on phone digits only, so "+1 (234) 567-890" finds "+1234567890"
    pub async fn find_by_phone(&self, phone: &str) -> CollectionResult<Option<Client>> {
        let digits = normalize_phone(phone);
        if digits.is_empty() {
            return Ok(None);
        }
        Ok(self
            .clients
            .list()
            .await?
            .into_iter()
            .find(|c| normalize_phone(&c.phone) == digits))
    }

    /// Existing client with this phone, or a newly created one
    pub async fn find_or_create(&self, name: &str, phone: &str, email: Option<String>) -> CollectionResult<Client> {
        if let Some(existing) = self.find_by_phone(phone).await? {
            info!("Booking matched existing client {}", existing.id);
            return Ok(existing);
        }
        let client = Client {
            id: String::new(),
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
            email: email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
        };
        self.clients.create(client).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::Fixtures;
    use crate::storage::InMemoryRepository;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn setup_test() -> ClientService {
        let fixtures = Fixtures::build(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        ClientService::new(
            CollectionManager::new(Arc::new(InMemoryRepository::with_seed(&fixtures.clients))),
            CollectionManager::new(Arc::new(InMemoryRepository::with_seed(&fixtures.appointments))),
        )
    }

    #[tokio::test]
    async fn test_summaries_are_derived() {
        let service = setup_test();
        let summaries = service.list_summaries().await.unwrap();
        assert_eq!(summaries.len(), 5);

        let sarah = service.summary("client::sarah-johnson").await.unwrap();
        // Two completed visits (haircut 60, facial 85) and one upcoming haircut
        assert_eq!(sarah.total_appointments, 3);
        assert_eq!(sarah.total_spent, 145.0);
        assert_eq!(sarah.last_visit, NaiveDate::from_ymd_opt(2024, 6, 9));
        assert_eq!(sarah.preferred_services, vec!["haircut", "facial"]);

        // Jessica's only past visit was cancelled
        let jessica = service.summary("client::jessica-smith").await.unwrap();
        assert_eq!(jessica.total_spent, 0.0);
        assert_eq!(jessica.last_visit, None);
    }

    #[tokio::test]
    async fn test_find_by_phone_ignores_formatting() {
        let service = setup_test();
        let found = service.find_by_phone("+1 (234) 567-891").await.unwrap().unwrap();
        assert_eq!(found.name, "Emily Davis");
        assert!(service.find_by_phone("no digits").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_or_create() {
        let service = setup_test();
        let existing = service.find_or_create("Sarah J", "+1234567890", None).await.unwrap();
        assert_eq!(existing.id, "client::sarah-johnson");

        let created = service
            .find_or_create(" Rachel Green ", "+1 555 123 4567", Some("  ".to_string()))
            .await
            .unwrap();
        assert_eq!(created.name, "Rachel Green");
        assert_eq!(created.email, None);
        assert_eq!(service.list().await.unwrap().len(), 6);
    }
}
