//! Mapping between collection entities and CSV rows.
//!
//! Flat entities are written as-is. Appointments and reviews go through a
//! record struct so status strings and image lists have a stable column format:
//!
//! ```csv
//! id,client_id,service_id,service_tag,service_name,date,time_slot,status,price,notes
//! appointment::9f1c..,client::4e2a..,service::77b0..,haircut,Haircut & Styling,2024-06-01,10:00 AM,upcoming,60.0,
//! ```

use anyhow::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use shared::{Appointment, AppointmentStatus, Client, Offer, Review, ReviewStatus, Service, TimeSlot};

use crate::domain::models::Entity;

const IMAGE_SEPARATOR: &str = " | ";

/// An entity that can be stored as one row of `<FILE_NAME>.csv`
pub trait CsvEntity: Entity {
    type Record: Serialize + DeserializeOwned;

    const FILE_NAME: &'static str;

    fn to_record(&self) -> Self::Record;

    fn from_record(record: Self::Record) -> Result<Self>;
}

impl CsvEntity for Service {
    type Record = Service;
    const FILE_NAME: &'static str = "services";

    fn to_record(&self) -> Self::Record {
        self.clone()
    }

    fn from_record(record: Self::Record) -> Result<Self> {
        Ok(record)
    }
}

impl CsvEntity for Client {
    type Record = Client;
    const FILE_NAME: &'static str = "clients";

    fn to_record(&self) -> Self::Record {
        self.clone()
    }

    fn from_record(record: Self::Record) -> Result<Self> {
        Ok(record)
    }
}

impl CsvEntity for Offer {
    type Record = Offer;
    const FILE_NAME: &'static str = "offers";

    fn to_record(&self) -> Self::Record {
        self.clone()
    }

    fn from_record(record: Self::Record) -> Result<Self> {
        Ok(record)
    }
}

/// CSV record structure for appointments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRecord {
    id: String,
    client_id: String,
    service_id: String,
    service_tag: String,
    service_name: String,
    date: String,
    time_slot: String,
    status: String,
    price: f64,
    notes: String,
}

impl From<&Appointment> for AppointmentRecord {
    fn from(appointment: &Appointment) -> Self {
        AppointmentRecord {
            id: appointment.id.clone(),
            client_id: appointment.client_id.clone(),
            service_id: appointment.service_id.clone(),
            service_tag: appointment.service_tag.clone(),
            service_name: appointment.service_name.clone(),
            date: appointment.date.format("%Y-%m-%d").to_string(),
            time_slot: appointment.time_slot.label(),
            status: appointment.status.to_string(),
            price: appointment.price,
            notes: appointment.notes.clone().unwrap_or_default(),
        }
    }
}

impl TryFrom<AppointmentRecord> for Appointment {
    type Error = anyhow::Error;

    fn try_from(record: AppointmentRecord) -> Result<Self> {
        let date = chrono::NaiveDate::parse_from_str(&record.date, "%Y-%m-%d")
            .map_err(|e| anyhow::anyhow!("Failed to parse appointment date '{}': {}", record.date, e))?;
        let time_slot: TimeSlot = record.time_slot.parse()?;
        let status: AppointmentStatus = record
            .status
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;

        Ok(Appointment {
            id: record.id,
            client_id: record.client_id,
            service_id: record.service_id,
            service_tag: record.service_tag,
            service_name: record.service_name,
            date,
            time_slot,
            status,
            price: record.price,
            notes: Some(record.notes).filter(|n| !n.is_empty()),
        })
    }
}

impl CsvEntity for Appointment {
    type Record = AppointmentRecord;
    const FILE_NAME: &'static str = "appointments";

    fn to_record(&self) -> Self::Record {
        AppointmentRecord::from(self)
    }

    fn from_record(record: Self::Record) -> Result<Self> {
        Appointment::try_from(record)
    }
}

/// CSV record structure for reviews; images are joined into one column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRecord {
    id: String,
    author_name: String,
    service_name: String,
    rating: f64,
    comment: String,
    images: String,
    date_label: String,
    status: String,
}

impl From<&Review> for ReviewRecord {
    fn from(review: &Review) -> Self {
        ReviewRecord {
            id: review.id.clone(),
            author_name: review.author_name.clone(),
            service_name: review.service_name.clone().unwrap_or_default(),
            rating: review.rating,
            comment: review.comment.clone(),
            images: review.images.join(IMAGE_SEPARATOR),
            date_label: review.date_label.clone(),
            status: review.status.to_string(),
        }
    }
}

impl TryFrom<ReviewRecord> for Review {
    type Error = anyhow::Error;

    fn try_from(record: ReviewRecord) -> Result<Self> {
        let status: ReviewStatus = record
            .status
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;
        let images = record
            .images
            .split(IMAGE_SEPARATOR)
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Review {
            id: record.id,
            author_name: record.author_name,
            service_name: Some(record.service_name).filter(|s| !s.is_empty()),
            rating: record.rating,
            comment: record.comment,
            images,
            date_label: record.date_label,
            status,
        })
    }
}

impl CsvEntity for Review {
    type Record = ReviewRecord;
    const FILE_NAME: &'static str = "reviews";

    fn to_record(&self) -> Self::Record {
        ReviewRecord::from(self)
    }

    fn from_record(record: Self::Record) -> Result<Self> {
        Review::try_from(record)
    }
}
