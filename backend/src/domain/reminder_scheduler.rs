//! Appointment reminders.
//!
//! One tokio task per upcoming appointment sleeps until `reminder_minutes`
//! before the appointment start (salon local time) and then sends the
//! reminder. Reminders whose due time has already passed are not scheduled.
//! A status change away from `upcoming` or a delete aborts the task.

use chrono::{Duration as ChronoDuration, Local, NaiveDate, NaiveDateTime};
use log::{debug, error, info, warn};
use shared::{Appointment, AppointmentStatus, Client, TimeSlot};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use crate::domain::notification::{DomainEvent, MessageKind, Notifier};
use crate::domain::settings_service::SettingsService;

/// When the reminder for an appointment is due
pub fn reminder_due_at(date: NaiveDate, slot: TimeSlot, reminder_minutes: u32) -> NaiveDateTime {
    date.and_time(slot.time()) - ChronoDuration::minutes(i64::from(reminder_minutes))
}

/// Time left until `due`, or None when it has already passed
pub fn delay_until(due: NaiveDateTime, now: NaiveDateTime) -> Option<Duration> {
    (due - now).to_std().ok().filter(|d| !d.is_zero())
}

/// A scheduled task and the generation it was started under
struct ScheduledReminder {
    generation: u64,
    handle: JoinHandle<()>,
}

type ReminderTasks = HashMap<String, ScheduledReminder>;

fn lock_tasks(tasks: &Mutex<ReminderTasks>) -> MutexGuard<'_, ReminderTasks> {
    tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Clone)]
pub struct ReminderScheduler {
    notifier: Notifier,
    settings: SettingsService,
    tasks: Arc<Mutex<ReminderTasks>>,
    next_generation: Arc<AtomicU64>,
}

impl ReminderScheduler {
    pub fn new(notifier: Notifier, settings: SettingsService) -> Self {
        Self {
            notifier,
            settings,
            tasks: Arc::new(Mutex::new(HashMap::new())),
            next_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    fn tasks(&self) -> MutexGuard<'_, ReminderTasks> {
        lock_tasks(&self.tasks)
    }

    /// Schedule reminders for appointments that were already upcoming when
    /// the process started. Returns how many were scheduled.
    pub async fn schedule_existing(&self, appointments: &[Appointment], clients: &[Client]) -> usize {
        let mut scheduled = 0;
        for appointment in appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Upcoming)
        {
            match clients.iter().find(|c| c.id == appointment.client_id) {
                Some(client) => {
                    if self.schedule(appointment, client).await {
                        scheduled += 1;
                    }
                }
                None => warn!("No client {} for appointment {}, no reminder", appointment.client_id, appointment.id),
            }
        }
        info!("Scheduled {} reminders for existing appointments", scheduled);
        scheduled
    }

    pub fn spawn(self, mut events: broadcast::Receiver<DomainEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("Reminder scheduler started");
            loop {
                match events.recv().await {
                    Ok(event) => self.handle(&event).await,
                    Err(RecvError::Lagged(skipped)) => warn!("Reminder scheduler skipped {} events", skipped),
                    Err(RecvError::Closed) => break,
                }
            }
            self.cancel_all();
            info!("Reminder scheduler stopped");
        })
    }

    pub async fn handle(&self, event: &DomainEvent) {
        match event {
            DomainEvent::AppointmentBooked { appointment, client } => {
                self.schedule(appointment, client).await;
            }
            DomainEvent::AppointmentStatusChanged { appointment, client, .. } => {
                match (appointment.status, client) {
                    (AppointmentStatus::Upcoming, Some(client)) => {
                        self.schedule(appointment, client).await;
                    }
                    _ => self.cancel(&appointment.id),
                }
            }
            DomainEvent::AppointmentDeleted { appointment } => self.cancel(&appointment.id),
            DomainEvent::ReviewSubmitted { .. } => {}
        }
    }

    /// Schedule (or reschedule) the reminder. Returns true if a task was started.
    pub async fn schedule(&self, appointment: &Appointment, client: &Client) -> bool {
        let reminder_minutes = match self.settings.get().await {
            Ok(settings) => settings.reminder_minutes,
            Err(e) => {
                error!("Could not read settings, no reminder for {}: {}", appointment.id, e);
                return false;
            }
        };

        let due = reminder_due_at(appointment.date, appointment.time_slot, reminder_minutes);
        let Some(delay) = delay_until(due, Local::now().naive_local()) else {
            debug!("Reminder for {} was due at {}, not scheduling", appointment.id, due);
            self.cancel(&appointment.id);
            return false;
        };

        let notifier = self.notifier.clone();
        let settings = self.settings.clone();
        let tasks = Arc::clone(&self.tasks);
        let appointment = appointment.clone();
        let client = client.clone();
        let id = appointment.id.clone();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        // Spawn and insert under one lock so the task cannot finish and
        // remove its entry before that entry exists
        let mut scheduled = self.tasks();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let enabled = settings.get().await.map(|s| s.whatsapp_notifications).unwrap_or(false);
            if enabled {
                notifier
                    .send_composed(notifier.appointment_message(MessageKind::Reminder, &appointment, &client))
                    .await;
            } else {
                debug!("Notifications disabled, reminder for {} dropped", appointment.id);
            }
            let mut tasks = lock_tasks(&tasks);
            if tasks.get(&appointment.id).map(|t| t.generation) == Some(generation) {
                tasks.remove(&appointment.id);
            }
        });

        if let Some(previous) = scheduled.insert(id.clone(), ScheduledReminder { generation, handle }) {
            previous.handle.abort();
        }
        drop(scheduled);
        info!("Reminder for {} scheduled at {}", id, due);
        true
    }

    pub fn cancel(&self, appointment_id: &str) {
        if let Some(task) = self.tasks().remove(appointment_id) {
            task.handle.abort();
            info!("Cancelled reminder for {}", appointment_id);
        }
    }

    pub fn cancel_all(&self) {
        for (_, task) in self.tasks().drain() {
            task.handle.abort();
        }
    }

    pub fn scheduled(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.tasks().keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::NotificationOutbox;
    use crate::storage::InMemoryDocument;
    use shared::SalonSettings;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_due_time_subtracts_lead() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let slot: TimeSlot = "10:00 AM".parse().unwrap();
        assert_eq!(reminder_due_at(date, slot, 60), at("2024-06-01", "09:00"));
        assert_eq!(reminder_due_at(date, slot, 1440), at("2024-05-31", "10:00"));
    }

    #[test]
    fn test_delay_until() {
        let due = at("2024-06-01", "09:00");
        assert_eq!(delay_until(due, at("2024-06-01", "08:30")), Some(Duration::from_secs(30 * 60)));
        assert_eq!(delay_until(due, at("2024-06-01", "09:00")), None);
        assert_eq!(delay_until(due, at("2024-06-01", "09:01")), None);
    }

    fn setup_test() -> ReminderScheduler {
        let outbox = NotificationOutbox::new(10);
        let notifier = Notifier::new("wa.me", None, Arc::new(outbox));
        let settings = SettingsService::new(Arc::new(InMemoryDocument::new(Some(SalonSettings::default()))));
        ReminderScheduler::new(notifier, settings)
    }

    fn appointment(id: &str, date: NaiveDate, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: id.to_string(),
            client_id: "client::1".to_string(),
            service_id: "service::haircut".to_string(),
            service_tag: "haircut".to_string(),
            service_name: "Haircut & Styling".to_string(),
            date,
            time_slot: "10:00 AM".parse().unwrap(),
            status,
            price: 60.0,
            notes: None,
        }
    }

    fn client() -> Client {
        Client {
            id: "client::1".to_string(),
            name: "Sarah Johnson".to_string(),
            phone: "+1234567890".to_string(),
            email: None,
        }
    }

    #[tokio::test]
    async fn test_future_booking_is_scheduled_and_cancelled() {
        let scheduler = setup_test();
        let next_week = Local::now().date_naive() + ChronoDuration::days(7);
        let booked = appointment("appointment::a", next_week, AppointmentStatus::Upcoming);

        scheduler
            .handle(&DomainEvent::AppointmentBooked {
                appointment: booked.clone(),
                client: client(),
            })
            .await;
        assert_eq!(scheduler.scheduled(), vec!["appointment::a"]);

        scheduler
            .handle(&DomainEvent::AppointmentStatusChanged {
                appointment: Appointment {
                    status: AppointmentStatus::Cancelled,
                    ..booked
                },
                client: Some(client()),
                previous: AppointmentStatus::Upcoming,
            })
            .await;
        assert!(scheduler.scheduled().is_empty());
    }

    #[tokio::test]
    async fn test_past_appointment_is_skipped() {
        let scheduler = setup_test();
        let last_week = Local::now().date_naive() - ChronoDuration::days(7);
        let scheduled = scheduler
            .schedule(&appointment("appointment::old", last_week, AppointmentStatus::Upcoming), &client())
            .await;
        assert!(!scheduled);
        assert!(scheduler.scheduled().is_empty());
    }

    #[tokio::test]
    async fn test_delete_cancels_reminder() {
        let scheduler = setup_test();
        let next_week = Local::now().date_naive() + ChronoDuration::days(7);
        let booked = appointment("appointment::b", next_week, AppointmentStatus::Upcoming);
        scheduler.schedule(&booked, &client()).await;

        scheduler
            .handle(&DomainEvent::AppointmentDeleted { appointment: booked })
            .await;
        assert!(scheduler.scheduled().is_empty());
    }

    #[tokio::test]
    async fn test_schedule_existing_upcoming_only() {
        let scheduler = setup_test();
        let next_week = Local::now().date_naive() + ChronoDuration::days(7);
        let last_week = Local::now().date_naive() - ChronoDuration::days(7);
        let orphan = Appointment {
            client_id: "client::gone".to_string(),
            ..appointment("appointment::orphan", next_week, AppointmentStatus::Upcoming)
        };
        let existing = vec![
            appointment("appointment::soon", next_week, AppointmentStatus::Upcoming),
            appointment("appointment::done", next_week, AppointmentStatus::Completed),
            appointment("appointment::past", last_week, AppointmentStatus::Upcoming),
            orphan,
        ];

        assert_eq!(scheduler.schedule_existing(&existing, &[client()]).await, 1);
        assert_eq!(scheduler.scheduled(), vec!["appointment::soon"]);
    }

    #[tokio::test]
    async fn test_reschedule_replaces_previous_task() {
        let scheduler = setup_test();
        let next_week = Local::now().date_naive() + ChronoDuration::days(7);
        let booked = appointment("appointment::c", next_week, AppointmentStatus::Upcoming);

        assert!(scheduler.schedule(&booked, &client()).await);
        let moved = Appointment {
            date: next_week + ChronoDuration::days(1),
            ..booked
        };
        assert!(scheduler.schedule(&moved, &client()).await);

        assert_eq!(scheduler.scheduled(), vec!["appointment::c"]);
        let tasks = scheduler.tasks();
        let current = tasks.get("appointment::c").unwrap();
        assert_eq!(current.generation, 1);
        assert!(!current.handle.is_finished());
    }
}
