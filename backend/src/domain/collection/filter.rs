//! # Filter Predicate Set
//!
//! Independent predicates combined with logical AND. Applying a filter set
//! never mutates the store and keeps the store's relative order.

use chrono::NaiveDate;

use crate::domain::models::Entity;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Build from optional query parameters; blank categories impose no constraint
    pub fn from_parts(date: Option<NaiveDate>, category: Option<String>) -> Self {
        Self {
            date,
            category: category.filter(|c| !c.trim().is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.category.is_none()
    }

    /// Drop every predicate at once
    pub fn clear(&mut self) {
        self.date = None;
        self.category = None;
    }

    /// An entity lacking the filtered field does not pass that filter.
    pub fn matches<T: Entity>(&self, entity: &T) -> bool {
        let date_ok = match self.date {
            Some(date) => entity.filter_date() == Some(date),
            None => true,
        };
        let category_ok = match &self.category {
            Some(category) => entity.filter_category() == Some(category.as_str()),
            None => true,
        };
        date_ok && category_ok
    }

    pub fn apply<T: Entity>(&self, items: &[T]) -> Vec<T> {
        items.iter().filter(|item| self.matches(*item)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Appointment, AppointmentStatus, Client, TimeSlot};

    fn appointment(id: &str, date: &str, tag: &str) -> Appointment {
        Appointment {
            id: id.to_string(),
            client_id: "client::1".to_string(),
            service_id: format!("service::{}", tag),
            service_tag: tag.to_string(),
            service_name: tag.to_string(),
            date: date.parse().unwrap(),
            time_slot: "10:00 AM".parse::<TimeSlot>().unwrap(),
            status: AppointmentStatus::Upcoming,
            price: 60.0,
            notes: None,
        }
    }

    fn five_appointments() -> Vec<Appointment> {
        vec![
            appointment("a1", "2024-06-01", "haircut"),
            appointment("a2", "2024-06-02", "facial"),
            appointment("a3", "2024-06-01", "facial"),
            appointment("a4", "2024-06-02", "haircut"),
            appointment("a5", "2024-06-01", "haircut"),
        ]
    }

    fn ids(items: &[Appointment]) -> Vec<&str> {
        items.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let items = five_appointments();
        assert_eq!(FilterSet::new().apply(&items), items);
    }

    #[test]
    fn test_date_filter_keeps_relative_order() {
        let items = five_appointments();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let filtered = FilterSet::new().with_date(date).apply(&items);
        assert_eq!(ids(&filtered), vec!["a1", "a3", "a5"]);
    }

    #[test]
    fn test_date_filter_is_idempotent() {
        let items = five_appointments();
        let filters = FilterSet::new().with_date(NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
        let once = filters.apply(&items);
        let twice = filters.apply(&once);
        assert_eq!(once, twice);
        assert!(once.iter().all(|a| a.date == NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let items = five_appointments();
        let filters = FilterSet::new()
            .with_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
            .with_category("haircut");
        assert_eq!(ids(&filters.apply(&items)), vec!["a1", "a5"]);
    }

    #[test]
    fn test_clear_restores_full_order() {
        let items = five_appointments();
        let mut filters = FilterSet::new().with_category("facial");
        assert_eq!(filters.apply(&items).len(), 2);
        filters.clear();
        assert!(filters.is_empty());
        assert_eq!(filters.apply(&items), items);
    }

    #[test]
    fn test_entity_without_field_fails_filter() {
        let clients = vec![Client {
            id: "client::1".to_string(),
            name: "Sarah".to_string(),
            phone: "+1234567890".to_string(),
            email: None,
        }];
        let filters = FilterSet::new().with_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert!(filters.apply(&clients).is_empty());
    }

    #[test]
    fn test_blank_category_query_is_ignored() {
        let filters = FilterSet::from_parts(None, Some("  ".to_string()));
        assert!(filters.is_empty());
    }
}
