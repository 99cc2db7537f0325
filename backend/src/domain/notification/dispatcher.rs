use log::{debug, error, info, warn};
use shared::AppointmentStatus;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use super::channel::MessageKind;
use super::events::DomainEvent;
use super::notifier::Notifier;
use crate::domain::settings_service::SettingsService;

/// Subscribes to domain events and turns them into messages. Runs beside the
/// mutations and never feeds back into them.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Notifier,
    settings: SettingsService,
}

impl NotificationDispatcher {
    pub fn new(notifier: Notifier, settings: SettingsService) -> Self {
        Self { notifier, settings }
    }

    pub fn spawn(self, mut events: broadcast::Receiver<DomainEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("Notification dispatcher started");
            loop {
                match events.recv().await {
                    Ok(event) => self.handle(&event).await,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Notification dispatcher skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            info!("Notification dispatcher stopped");
        })
    }

    async fn notifications_enabled(&self) -> bool {
        match self.settings.get().await {
            Ok(settings) => settings.whatsapp_notifications,
            Err(e) => {
                error!("Could not read settings, skipping notification: {}", e);
                false
            }
        }
    }

    pub async fn handle(&self, event: &DomainEvent) {
        if !self.notifications_enabled().await {
            debug!("WhatsApp notifications disabled, ignoring {}", event.name());
            return;
        }

        match event {
            DomainEvent::AppointmentBooked { appointment, client } => {
                self.notifier
                    .send_composed(self.notifier.appointment_message(MessageKind::Confirmation, appointment, client))
                    .await;
                self.notifier
                    .send_composed(self.notifier.appointment_message(
                        MessageKind::OwnerBookingAlert,
                        appointment,
                        client,
                    ))
                    .await;
            }
            DomainEvent::AppointmentStatusChanged {
                appointment,
                client: Some(client),
                previous,
            } if appointment.status == AppointmentStatus::Cancelled && *previous != AppointmentStatus::Cancelled => {
                self.notifier
                    .send_composed(self.notifier.appointment_message(MessageKind::Cancellation, appointment, client))
                    .await;
            }
            DomainEvent::ReviewSubmitted { review } => {
                self.notifier.send_composed(self.notifier.review_alert(review)).await;
            }
            other => debug!("No message for {}", other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::{EventBus, NotificationOutbox};
    use crate::storage::InMemoryDocument;
    use chrono::NaiveDate;
    use shared::{Appointment, Client, Review, ReviewStatus, SalonSettings};
    use std::sync::Arc;
    use std::time::Duration;

    fn appointment(status: AppointmentStatus) -> Appointment {
        Appointment {
            id: "appointment::1".to_string(),
            client_id: "client::1".to_string(),
            service_id: "service::makeup".to_string(),
            service_tag: "makeup".to_string(),
            service_name: "Professional Makeup".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time_slot: "4:00 PM".parse().unwrap(),
            status,
            price: 75.0,
            notes: None,
        }
    }

    fn client() -> Client {
        Client {
            id: "client::1".to_string(),
            name: "Amanda Lee".to_string(),
            phone: "+1234567894".to_string(),
            email: None,
        }
    }

    fn setup_test(whatsapp: bool) -> (NotificationDispatcher, NotificationOutbox) {
        let outbox = NotificationOutbox::new(20);
        let notifier = Notifier::new("wa.me", Some("+1 555 000 1111".to_string()), Arc::new(outbox.clone()));
        let settings = SettingsService::new(Arc::new(InMemoryDocument::new(Some(SalonSettings {
            whatsapp_notifications: whatsapp,
            ..SalonSettings::default()
        }))));
        (NotificationDispatcher::new(notifier, settings), outbox)
    }

    #[tokio::test]
    async fn test_booking_sends_confirmation_and_owner_alert() {
        let (dispatcher, outbox) = setup_test(true);
        dispatcher
            .handle(&DomainEvent::AppointmentBooked {
                appointment: appointment(AppointmentStatus::Upcoming),
                client: client(),
            })
            .await;

        let kinds: Vec<String> = outbox.list().into_iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec!["confirmation", "owner_booking_alert"]);
    }

    #[tokio::test]
    async fn test_only_cancellation_status_changes_notify() {
        let (dispatcher, outbox) = setup_test(true);
        dispatcher
            .handle(&DomainEvent::AppointmentStatusChanged {
                appointment: appointment(AppointmentStatus::Completed),
                client: Some(client()),
                previous: AppointmentStatus::Upcoming,
            })
            .await;
        assert!(outbox.is_empty());

        dispatcher
            .handle(&DomainEvent::AppointmentStatusChanged {
                appointment: appointment(AppointmentStatus::Cancelled),
                client: Some(client()),
                previous: AppointmentStatus::Upcoming,
            })
            .await;
        assert_eq!(outbox.list()[0].kind, "cancellation");
    }

    #[tokio::test]
    async fn test_disabled_setting_suppresses_messages() {
        let (dispatcher, outbox) = setup_test(false);
        dispatcher
            .handle(&DomainEvent::AppointmentBooked {
                appointment: appointment(AppointmentStatus::Upcoming),
                client: client(),
            })
            .await;
        assert!(outbox.is_empty());
    }

    #[tokio::test]
    async fn test_spawned_dispatcher_handles_review_events() {
        let (dispatcher, outbox) = setup_test(true);
        let bus = EventBus::new(8);
        let handle = dispatcher.spawn(bus.subscribe());

        bus.publish(DomainEvent::ReviewSubmitted {
            review: Review {
                id: "review::1".to_string(),
                author_name: "Rachel Green".to_string(),
                service_name: None,
                rating: 4.5,
                comment: "Great".to_string(),
                images: vec![],
                date_label: "Just now".to_string(),
                status: ReviewStatus::Pending,
            },
        });

        for _ in 0..50 {
            if !outbox.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(outbox.list()[0].kind, "owner_review_alert");

        drop(bus);
        handle.await.unwrap();
    }
}
