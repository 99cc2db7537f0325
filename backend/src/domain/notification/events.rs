use log::debug;
use shared::{Appointment, AppointmentStatus, Client, Review};
use tokio::sync::broadcast;

/// Emitted after a mutation has been applied
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    AppointmentBooked {
        appointment: Appointment,
        client: Client,
    },
    AppointmentStatusChanged {
        appointment: Appointment,
        client: Option<Client>,
        previous: AppointmentStatus,
    },
    AppointmentDeleted {
        appointment: Appointment,
    },
    ReviewSubmitted {
        review: Review,
    },
}

impl DomainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::AppointmentBooked { .. } => "appointment_booked",
            DomainEvent::AppointmentStatusChanged { .. } => "appointment_status_changed",
            DomainEvent::AppointmentDeleted { .. } => "appointment_deleted",
            DomainEvent::ReviewSubmitted { .. } => "review_submitted",
        }
    }
}

/// In-process broadcast of domain events
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Never fails the caller; an event nobody listens to is dropped.
    pub fn publish(&self, event: DomainEvent) {
        let name = event.name();
        match self.sender.send(event) {
            Ok(receivers) => debug!("Published {} to {} subscribers", name, receivers),
            Err(_) => debug!("Published {} with no subscribers", name),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ReviewStatus;

    fn review() -> Review {
        Review {
            id: "review::1".to_string(),
            author_name: "Rachel Green".to_string(),
            service_name: None,
            rating: 4.5,
            comment: "Lovely".to_string(),
            images: vec![],
            date_label: "Just now".to_string(),
            status: ReviewStatus::Pending,
        }
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_silent() {
        let bus = EventBus::new(4);
        bus.publish(DomainEvent::ReviewSubmitted { review: review() });
    }

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let bus = EventBus::new(4);
        let mut rx = bus.subscribe();
        bus.publish(DomainEvent::ReviewSubmitted { review: review() });
        let event = rx.recv().await.unwrap();
        assert_eq!(event.name(), "review_submitted");
    }
}
