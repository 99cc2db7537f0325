//! Identity and filterable fields shared by every collection entity.

use chrono::NaiveDate;
use shared::{Appointment, Client, Offer, Review, Service};
use std::fmt::Debug;
use uuid::Uuid;

/// A record held by a collection: it has a locally generated id and may expose
/// a calendar date and a category tag for the filter predicate set.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    /// Id prefix and log label, e.g. "service"
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Calendar day used by date filters
    fn filter_date(&self) -> Option<NaiveDate> {
        None
    }

    /// Tag used by category filters
    fn filter_category(&self) -> Option<&str> {
        None
    }

    /// Human-readable name used in confirmation prompts
    fn label(&self) -> String {
        self.id().to_string()
    }
}

/// Generate an id in format "<kind>::<uuid>"
pub fn generate_id(kind: &str) -> String {
    format!("{}::{}", kind, Uuid::new_v4().simple())
}

impl Entity for Service {
    const KIND: &'static str = "service";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn filter_category(&self) -> Option<&str> {
        Some(&self.tag)
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

impl Entity for Client {
    const KIND: &'static str = "client";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

impl Entity for Appointment {
    const KIND: &'static str = "appointment";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn filter_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn filter_category(&self) -> Option<&str> {
        Some(&self.service_tag)
    }

    fn label(&self) -> String {
        format!("{} on {} at {}", self.service_name, self.date, self.time_slot)
    }
}

impl Entity for Offer {
    const KIND: &'static str = "offer";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn filter_category(&self) -> Option<&str> {
        Some(if self.is_active { "active" } else { "inactive" })
    }

    fn label(&self) -> String {
        self.title.clone()
    }
}

impl Entity for Review {
    const KIND: &'static str = "review";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn filter_category(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn label(&self) -> String {
        format!("the review by {}", self.author_name)
    }
}
