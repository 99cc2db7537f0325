use log::info;
use shared::{DeleteRequestResponse, DeleteResultResponse, Service, ServiceForm, ServiceResponse};

use crate::domain::collection::CollectionManager;
use crate::domain::delete_flow;
use crate::domain::models::validation::slugify;
use crate::domain::models::{CollectionError, CollectionResult, ValidationErrors};

/// Service for managing the salon's service catalogue
#[derive(Clone)]
pub struct CatalogService {
    services: CollectionManager<Service>,
}

impl CatalogService {
    pub fn new(services: CollectionManager<Service>) -> Self {
        Self { services }
    }

    pub async fn list(&self) -> CollectionResult<Vec<Service>> {
        self.services.list().await
    }

    pub async fn get(&self, id: &str) -> CollectionResult<Service> {
        self.services.get(id).await
    }

    pub async fn find(&self, id: &str) -> CollectionResult<Option<Service>> {
        self.services.find(id).await
    }

    pub async fn find_by_tag(&self, tag: &str) -> CollectionResult<Option<Service>> {
        let tag = tag.trim().to_lowercase();
        Ok(self.services.list().await?.into_iter().find(|s| s.tag == tag))
    }

    /// `fallback_tag` applies when the form carries no tag: the stored tag on
    /// update, the slugged name on create
    fn from_form(form: ServiceForm, fallback_tag: Option<&str>) -> Service {
        let tag = form
            .tag
            .as_deref()
            .map(slugify)
            .filter(|t| !t.is_empty())
            .or_else(|| fallback_tag.map(str::to_string))
            .unwrap_or_else(|| slugify(&form.name));
        Service {
            id: String::new(),
            tag,
            name: form.name.trim().to_string(),
            description: form.description.trim().to_string(),
            price: form.price,
            duration_minutes: form.duration_minutes,
            image_url: form.image_url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()),
        }
    }

    /// Tags key bookings and filters, so two services may not share one
    async fn ensure_unique_tag(&self, tag: &str, own_id: Option<&str>) -> CollectionResult<()> {
        let taken = self
            .services
            .list()
            .await?
            .iter()
            .any(|s| s.tag == tag && Some(s.id.as_str()) != own_id);
        if taken && !tag.is_empty() {
            let mut errors = ValidationErrors::new();
            errors.add("tag", format!("'{}' is already used by another service", tag));
            return Err(CollectionError::Validation(errors));
        }
        Ok(())
    }

    pub async fn create(&self, form: ServiceForm) -> CollectionResult<ServiceResponse> {
        info!("Creating service: name={}", form.name);
        let service = Self::from_form(form, None);
        self.ensure_unique_tag(&service.tag, None).await?;

        let service = self.services.create(service).await?;
        Ok(ServiceResponse {
            success_message: format!("{} has been added successfully.", service.name),
            service,
        })
    }

    pub async fn update(&self, id: &str, form: ServiceForm) -> CollectionResult<ServiceResponse> {
        info!("Updating service: {}", id);
        let existing = self.services.get(id).await?;
        let service = Self::from_form(form, Some(&existing.tag));
        self.ensure_unique_tag(&service.tag, Some(id)).await?;

        let service = self.services.update(id, service).await?;
        Ok(ServiceResponse {
            success_message: format!("{} has been updated successfully.", service.name),
            service,
        })
    }

    pub async fn request_delete(&self, id: &str) -> CollectionResult<DeleteRequestResponse> {
        delete_flow::request(&self.services, id).await
    }

    pub async fn confirm_delete(&self) -> CollectionResult<DeleteResultResponse> {
        let deleted = self.services.confirm_delete().await?;
        Ok(delete_flow::confirmed(deleted.as_ref()))
    }

    pub fn cancel_delete(&self) -> DeleteResultResponse {
        delete_flow::cancelled(&self.services)
    }
}
