use log::{debug, error, info};
use shared::{Appointment, Client, Review};
use std::sync::Arc;

use super::channel::{MessageChannel, MessageKind, OutboundMessage};
use super::deep_link::DeepLink;
use super::templates::{self, MessageContext};
use super::NotificationError;

/// Composes messages from domain records and hands them to the channel.
/// Sending never reports failure to the caller; failures are logged.
#[derive(Clone)]
pub struct Notifier {
    domain: String,
    owner_phone: Option<String>,
    channel: Arc<dyn MessageChannel>,
}

impl Notifier {
    pub fn new(domain: impl Into<String>, owner_phone: Option<String>, channel: Arc<dyn MessageChannel>) -> Self {
        Self {
            domain: domain.into(),
            owner_phone: owner_phone.filter(|p| !p.trim().is_empty()),
            channel,
        }
    }

    pub fn compose(&self, kind: MessageKind, phone: &str, text: &str) -> Result<OutboundMessage, NotificationError> {
        let link = DeepLink::compose(&self.domain, phone, text)?;
        Ok(OutboundMessage { kind, link })
    }

    /// Client-facing or owner message about one appointment
    pub fn appointment_message(
        &self,
        kind: MessageKind,
        appointment: &Appointment,
        client: &Client,
    ) -> Result<OutboundMessage, NotificationError> {
        let ctx = MessageContext::new(appointment, client);
        match kind {
            MessageKind::Confirmation => self.compose(kind, &client.phone, &templates::confirmation(&ctx)),
            MessageKind::Reminder => self.compose(kind, &client.phone, &templates::reminder(&ctx)),
            MessageKind::Cancellation => self.compose(kind, &client.phone, &templates::cancellation(&ctx)),
            MessageKind::OwnerBookingAlert => {
                let owner = self.owner_phone.as_deref().ok_or(NotificationError::OwnerPhoneMissing)?;
                self.compose(kind, owner, &templates::owner_booking_alert(&ctx))
            }
            MessageKind::OwnerReviewAlert => Err(NotificationError::UnsupportedMessage(kind.as_str())),
        }
    }

    pub fn review_alert(&self, review: &Review) -> Result<OutboundMessage, NotificationError> {
        let owner = self.owner_phone.as_deref().ok_or(NotificationError::OwnerPhoneMissing)?;
        self.compose(MessageKind::OwnerReviewAlert, owner, &templates::owner_review_alert(review))
    }

    pub async fn send(&self, message: &OutboundMessage) {
        match self.channel.deliver(message).await {
            Ok(()) => info!("Sent {} to {}", message.kind.as_str(), message.link.recipient),
            Err(e) => error!("Failed to send {} to {}: {}", message.kind.as_str(), message.link.recipient, e),
        }
    }

    /// Send a freshly composed message, logging composition failures
    pub async fn send_composed(&self, composed: Result<OutboundMessage, NotificationError>) {
        match composed {
            Ok(message) => self.send(&message).await,
            Err(NotificationError::OwnerPhoneMissing) => debug!("No owner phone configured, skipping alert"),
            Err(e) => error!("Could not compose message: {}", e),
        }
    }
}
