//! Read-only projections derived from the appointment collection.
//!
//! Nothing here mutates an appointment or client; client aggregates are
//! recomputed on every read instead of being stored.

use chrono::NaiveDate;
use shared::{Appointment, AppointmentStatus, Client, ClientGroup, ClientSummary};
use std::collections::HashMap;

const PREFERRED_SERVICE_LIMIT: usize = 3;

/// Group appointments by client. Groups appear in the order their first
/// appointment appears; each group keeps the appointments' relative order.
pub fn group_by_client(filtered: &[Appointment], clients: &[Client]) -> Vec<ClientGroup> {
    let mut groups: Vec<ClientGroup> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for appointment in filtered {
        let position = *positions
            .entry(appointment.client_id.as_str())
            .or_insert_with(|| {
                groups.push(ClientGroup {
                    client: lookup_client(clients, &appointment.client_id),
                    appointments: Vec::new(),
                });
                groups.len() - 1
            });
        groups[position].appointments.push(appointment.clone());
    }

    groups
}

fn lookup_client(clients: &[Client], client_id: &str) -> Client {
    clients
        .iter()
        .find(|c| c.id == client_id)
        .cloned()
        .unwrap_or_else(|| Client {
            id: client_id.to_string(),
            name: "Unknown client".to_string(),
            phone: String::new(),
            email: None,
        })
}

/// Visit aggregates for one client
pub fn summarize(client: &Client, appointments: &[Appointment]) -> ClientSummary {
    let own: Vec<&Appointment> = appointments.iter().filter(|a| a.client_id == client.id).collect();

    let total_appointments = own
        .iter()
        .filter(|a| a.status != AppointmentStatus::Cancelled)
        .count();

    let completed: Vec<&&Appointment> = own
        .iter()
        .filter(|a| a.status == AppointmentStatus::Completed)
        .collect();
    let total_spent = completed.iter().map(|a| a.price).sum();
    let last_visit: Option<NaiveDate> = completed.iter().map(|a| a.date).max();

    ClientSummary {
        client: client.clone(),
        total_appointments,
        total_spent,
        last_visit,
        preferred_services: preferred_tags(&own),
    }
}

pub fn summarize_all(clients: &[Client], appointments: &[Appointment]) -> Vec<ClientSummary> {
    clients.iter().map(|c| summarize(c, appointments)).collect()
}

/// Most booked service tags; ties keep first-seen order
fn preferred_tags(appointments: &[&Appointment]) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for appointment in appointments
        .iter()
        .filter(|a| a.status != AppointmentStatus::Cancelled)
    {
        match counts.iter_mut().find(|(tag, _)| *tag == appointment.service_tag) {
            Some((_, count)) => *count += 1,
            None => counts.push((appointment.service_tag.clone(), 1)),
        }
    }
    // sort_by is stable, so equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(PREFERRED_SERVICE_LIMIT)
        .map(|(tag, _)| tag)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: &str, name: &str) -> Client {
        Client {
            id: id.to_string(),
            name: name.to_string(),
            phone: "+1234567890".to_string(),
            email: None,
        }
    }

    fn appointment(id: &str, client_id: &str, tag: &str, day: u32, status: AppointmentStatus, price: f64) -> Appointment {
        Appointment {
            id: id.to_string(),
            client_id: client_id.to_string(),
            service_id: format!("service::{}", tag),
            service_tag: tag.to_string(),
            service_name: tag.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            time_slot: "11:00 AM".parse().unwrap(),
            status,
            price,
            notes: None,
        }
    }

    #[test]
    fn test_group_by_client_first_seen_order() {
        let clients = vec![client("c1", "Sarah"), client("c2", "Emily"), client("c3", "Michelle")];
        let items = vec![
            appointment("a1", "c2", "facial", 1, AppointmentStatus::Upcoming, 85.0),
            appointment("a2", "c1", "haircut", 1, AppointmentStatus::Upcoming, 60.0),
            appointment("a3", "c2", "waxing", 2, AppointmentStatus::Upcoming, 40.0),
            appointment("a4", "c3", "makeup", 2, AppointmentStatus::Upcoming, 75.0),
            appointment("a5", "c1", "facial", 3, AppointmentStatus::Upcoming, 85.0),
        ];

        let groups = group_by_client(&items, &clients);
        let names: Vec<&str> = groups.iter().map(|g| g.client.name.as_str()).collect();
        assert_eq!(names, vec!["Emily", "Sarah", "Michelle"]);

        let emily: Vec<&str> = groups[0].appointments.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(emily, vec!["a1", "a3"]);
        let sarah: Vec<&str> = groups[1].appointments.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(sarah, vec!["a2", "a5"]);
    }

    #[test]
    fn test_group_by_client_unknown_client_placeholder() {
        let items = vec![appointment("a1", "c404", "facial", 1, AppointmentStatus::Upcoming, 85.0)];
        let groups = group_by_client(&items, &[]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].client.id, "c404");
        assert_eq!(groups[0].client.name, "Unknown client");
    }

    #[test]
    fn test_group_by_client_empty() {
        assert!(group_by_client(&[], &[client("c1", "Sarah")]).is_empty());
    }

    #[test]
    fn test_summarize_derives_aggregates() {
        let sarah = client("c1", "Sarah");
        let items = vec![
            appointment("a1", "c1", "haircut", 1, AppointmentStatus::Completed, 60.0),
            appointment("a2", "c1", "facial", 3, AppointmentStatus::Completed, 85.0),
            appointment("a3", "c1", "haircut", 5, AppointmentStatus::Cancelled, 60.0),
            appointment("a4", "c1", "facial", 9, AppointmentStatus::Upcoming, 85.0),
            appointment("a5", "c2", "makeup", 2, AppointmentStatus::Completed, 75.0),
            appointment("a6", "c1", "facial", 10, AppointmentStatus::Upcoming, 85.0),
        ];

        let summary = summarize(&sarah, &items);
        assert_eq!(summary.total_appointments, 4);
        assert_eq!(summary.total_spent, 145.0);
        assert_eq!(summary.last_visit, NaiveDate::from_ymd_opt(2024, 6, 3));
        assert_eq!(summary.preferred_services, vec!["facial", "haircut"]);
    }

    #[test]
    fn test_summarize_client_without_history() {
        let summary = summarize(&client("c9", "Amanda"), &[]);
        assert_eq!(summary.total_appointments, 0);
        assert_eq!(summary.total_spent, 0.0);
        assert_eq!(summary.last_visit, None);
        assert!(summary.preferred_services.is_empty());
    }
}
