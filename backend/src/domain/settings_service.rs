use log::{info, warn};
use shared::SalonSettings;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::models::validation::{is_valid_phone, ValidationErrors};
use crate::domain::models::{CollectionError, CollectionResult, Validate};
use crate::storage::DocumentStorage;

/// Reminder lead times offered in the settings form, in minutes
pub const REMINDER_CHOICES: [u32; 5] = [15, 30, 60, 120, 1440];

impl Validate for SalonSettings {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !is_valid_phone(&self.contact_number) {
            errors.add("contact_number", "must be a valid phone number");
        }
        if !REMINDER_CHOICES.contains(&self.reminder_minutes) {
            errors.add(
                "reminder_minutes",
                format!("must be one of {:?}", REMINDER_CHOICES),
            );
        }
        errors.into_result()
    }
}

/// Service for the admin-editable salon settings document
#[derive(Clone)]
pub struct SettingsService {
    storage: Arc<dyn DocumentStorage<SalonSettings>>,
    write_lock: Arc<Mutex<()>>,
}

impl SettingsService {
    pub fn new(storage: Arc<dyn DocumentStorage<SalonSettings>>) -> Self {
        Self {
            storage,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Stored settings, or the defaults when none were saved
    pub async fn get(&self) -> CollectionResult<SalonSettings> {
        Ok(self.storage.load().await?.unwrap_or_default())
    }

    pub async fn update(&self, settings: SalonSettings) -> CollectionResult<SalonSettings> {
        let _guard = self.write_lock.lock().await;

        if let Err(errors) = settings.validate() {
            warn!("Rejected settings update: {}", errors);
            return Err(CollectionError::Validation(errors));
        }

        self.storage.save(&settings).await?;
        info!(
            "Updated settings: reminder {} min, whatsapp {}, auto-approve reviews {}",
            settings.reminder_minutes, settings.whatsapp_notifications, settings.auto_approve_reviews
        );
        Ok(settings)
    }
}
