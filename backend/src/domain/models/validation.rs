//! Field-level validation for records entering a collection.
//!
//! Validation is all-or-nothing: every offending field is collected before the
//! record is rejected, so callers can name all of them at once.

use once_cell::sync::Lazy;
use regex::Regex;
use shared::{Appointment, Client, Offer, Review, Service};
use std::fmt;

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s\-()]{8,}$").expect("phone pattern compiles"));

pub const MAX_REVIEW_IMAGES: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Names of the offending fields, in the order they were reported
    pub fn fields(&self) -> Vec<&'static str> {
        self.errors.iter().map(|e| e.field).collect()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// Ok when nothing was reported
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Records that can check their own required fields
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

pub fn require_text(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "is required");
    }
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone.trim())
}

pub fn is_http_url(url: &str) -> bool {
    let url = url.trim();
    (url.starts_with("https://") && url.len() > "https://".len())
        || (url.starts_with("http://") && url.len() > "http://".len())
}

/// Lower-case slug used as a service tag ("Hair Spa & Care" -> "hair-spa-care")
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

impl Validate for Service {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "name", &self.name);
        require_text(&mut errors, "description", &self.description);
        if !(self.price.is_finite() && self.price > 0.0) {
            errors.add("price", "must be greater than zero");
        }
        if self.duration_minutes == 0 {
            errors.add("duration_minutes", "must be greater than zero");
        }
        if self.tag.trim().is_empty() {
            errors.add("tag", "is required");
        }
        if let Some(url) = &self.image_url {
            if !is_http_url(url) {
                errors.add("image_url", "must be an http(s) URL");
            }
        }
        errors.into_result()
    }
}

impl Validate for Offer {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "title", &self.title);
        require_text(&mut errors, "description", &self.description);
        require_text(&mut errors, "discount_label", &self.discount_label);
        require_text(&mut errors, "validity_label", &self.validity_label);
        errors.into_result()
    }
}

impl Validate for Review {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "author_name", &self.author_name);
        require_text(&mut errors, "comment", &self.comment);
        let half_steps = self.rating * 2.0;
        if !(0.0..=5.0).contains(&self.rating) || half_steps.fract() != 0.0 {
            errors.add("rating", "must be between 0 and 5 in steps of 0.5");
        }
        if self.images.len() > MAX_REVIEW_IMAGES {
            errors.add("images", format!("at most {} images are allowed", MAX_REVIEW_IMAGES));
        } else if self.images.iter().any(|url| !is_http_url(url)) {
            errors.add("images", "must be http(s) URLs");
        }
        errors.into_result()
    }
}

impl Validate for Appointment {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "client_id", &self.client_id);
        require_text(&mut errors, "service_id", &self.service_id);
        if !(self.price.is_finite() && self.price >= 0.0) {
            errors.add("price", "must not be negative");
        }
        errors.into_result()
    }
}

impl Validate for Client {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "name", &self.name);
        if !is_valid_phone(&self.phone) {
            errors.add("phone", "must be a valid phone number");
        }
        if let Some(email) = &self.email {
            if !email.trim().is_empty() && !email.contains('@') {
                errors.add("email", "must be a valid email address");
            }
        }
        errors.into_result()
    }
}
