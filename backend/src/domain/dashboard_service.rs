use chrono::NaiveDate;
use log::debug;
use shared::{Appointment, AppointmentStatus, DashboardOverview, Review, ReviewStatus, ServiceCount};

use crate::domain::collection::CollectionManager;
use crate::domain::models::CollectionResult;
use shared::Client;

/// Read-only figures for the admin dashboard cards
#[derive(Clone)]
pub struct DashboardService {
    appointments: CollectionManager<Appointment>,
    clients: CollectionManager<Client>,
    reviews: CollectionManager<Review>,
}

impl DashboardService {
    pub fn new(
        appointments: CollectionManager<Appointment>,
        clients: CollectionManager<Client>,
        reviews: CollectionManager<Review>,
    ) -> Self {
        Self {
            appointments,
            clients,
            reviews,
        }
    }

    pub async fn overview(&self, today: NaiveDate) -> CollectionResult<DashboardOverview> {
        let appointments = self.appointments.list().await?;
        let total_clients = self.clients.len().await?;
        let reviews = self.reviews.list().await?;
        debug!("Building dashboard for {}", today);
        Ok(build_overview(today, &appointments, total_clients, &reviews))
    }
}

fn build_overview(
    today: NaiveDate,
    appointments: &[Appointment],
    total_clients: usize,
    reviews: &[Review],
) -> DashboardOverview {
    let active: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.status != AppointmentStatus::Cancelled)
        .collect();

    let todays_appointments = active.iter().filter(|a| a.date == today).count();

    let mut upcoming_today: Vec<Appointment> = active
        .iter()
        .filter(|a| a.date == today && a.status == AppointmentStatus::Upcoming)
        .map(|a| (*a).clone())
        .collect();
    upcoming_today.sort_by_key(|a| a.time_slot);

    let revenue = appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Completed)
        .map(|a| a.price)
        .sum();

    let approved: Vec<f64> = reviews
        .iter()
        .filter(|r| r.status == ReviewStatus::Approved)
        .map(|r| r.rating)
        .collect();
    let average_rating = if approved.is_empty() {
        None
    } else {
        let mean = approved.iter().sum::<f64>() / approved.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    };

    DashboardOverview {
        date: today,
        todays_appointments,
        total_clients,
        average_rating,
        approved_reviews: approved.len(),
        revenue,
        appointments_by_service: count_by_service(&active),
        upcoming_today,
    }
}

/// Busiest services first; ties keep first-seen order
fn count_by_service(appointments: &[&Appointment]) -> Vec<ServiceCount> {
    let mut counts: Vec<ServiceCount> = Vec::new();
    for appointment in appointments {
        match counts.iter_mut().find(|c| c.tag == appointment.service_tag) {
            Some(entry) => entry.count += 1,
            None => counts.push(ServiceCount {
                tag: appointment.service_tag.clone(),
                name: appointment.service_name.clone(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::Fixtures;
    use crate::storage::InMemoryRepository;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn setup_test() -> DashboardService {
        let fixtures = Fixtures::build(today());
        DashboardService::new(
            CollectionManager::new(Arc::new(InMemoryRepository::with_seed(&fixtures.appointments))),
            CollectionManager::new(Arc::new(InMemoryRepository::with_seed(&fixtures.clients))),
            CollectionManager::new(Arc::new(InMemoryRepository::with_seed(&fixtures.reviews))),
        )
    }

    #[tokio::test]
    async fn test_overview_from_fixtures() {
        let overview = setup_test().overview(today()).await.unwrap();

        assert_eq!(overview.todays_appointments, 3);
        assert_eq!(overview.total_clients, 5);
        assert_eq!(overview.approved_reviews, 3);
        assert_eq!(overview.average_rating, Some(4.8));
        assert_eq!(overview.revenue, 455.0);

        let slots: Vec<String> = overview.upcoming_today.iter().map(|a| a.time_slot.label()).collect();
        assert_eq!(slots, vec!["10:00 AM", "11:30 AM", "1:00 PM"]);

        let by_service: Vec<(&str, usize)> = overview
            .appointments_by_service
            .iter()
            .map(|c| (c.tag.as_str(), c.count))
            .collect();
        assert_eq!(
            by_service,
            vec![
                ("facial", 3),
                ("haircut", 2),
                ("keratin", 2),
                ("makeup", 2),
                ("waxing", 1),
                ("smoothing", 1)
            ]
        );
    }

    #[test]
    fn test_empty_overview() {
        let overview = build_overview(today(), &[], 0, &[]);
        assert_eq!(overview.average_rating, None);
        assert_eq!(overview.revenue, 0.0);
        assert!(overview.appointments_by_service.is_empty());
    }
}
