//! Delivery targets for composed messages.

use async_trait::async_trait;
use chrono::Utc;
use log::{error, info};
use shared::NotificationLink;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use super::deep_link::DeepLink;
use super::NotificationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Confirmation,
    Reminder,
    Cancellation,
    OwnerBookingAlert,
    OwnerReviewAlert,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Confirmation => "confirmation",
            MessageKind::Reminder => "reminder",
            MessageKind::Cancellation => "cancellation",
            MessageKind::OwnerBookingAlert => "owner_booking_alert",
            MessageKind::OwnerReviewAlert => "owner_review_alert",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub kind: MessageKind,
    pub link: DeepLink,
}

impl OutboundMessage {
    pub fn to_link(&self) -> NotificationLink {
        NotificationLink {
            kind: self.kind.as_str().to_string(),
            recipient: self.link.recipient.clone(),
            url: self.link.url.clone(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// An external messaging channel. Delivery is fire-and-forget from the
/// caller's point of view.
#[async_trait]
pub trait MessageChannel: Send + Sync {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), NotificationError>;
}

/// Bounded list of composed links, newest last, for the admin to open
#[derive(Debug, Clone)]
pub struct NotificationOutbox {
    links: Arc<Mutex<VecDeque<NotificationLink>>>,
    capacity: usize,
}

impl NotificationOutbox {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            links: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    fn guard(&self) -> MutexGuard<'_, VecDeque<NotificationLink>> {
        self.links.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, link: NotificationLink) {
        let mut links = self.guard();
        while links.len() >= self.capacity {
            links.pop_front();
        }
        links.push_back(link);
    }

    pub fn list(&self) -> Vec<NotificationLink> {
        self.guard().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }
}

#[async_trait]
impl MessageChannel for NotificationOutbox {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), NotificationError> {
        self.push(message.to_link());
        Ok(())
    }
}

/// Writes every message to the log
#[derive(Debug, Clone, Default)]
pub struct LoggingChannel;

#[async_trait]
impl MessageChannel for LoggingChannel {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), NotificationError> {
        info!(
            "Message {} to {}: {}",
            message.kind.as_str(),
            message.link.recipient,
            message.link.url
        );
        Ok(())
    }
}

/// Delivers to every inner channel; one failing channel does not stop the others
#[derive(Clone, Default)]
pub struct FanOutChannel {
    channels: Vec<Arc<dyn MessageChannel>>,
}

impl FanOutChannel {
    pub fn new(channels: Vec<Arc<dyn MessageChannel>>) -> Self {
        Self { channels }
    }
}

#[async_trait]
impl MessageChannel for FanOutChannel {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), NotificationError> {
        let mut first_error = None;
        for channel in &self.channels {
            if let Err(e) = channel.deliver(message).await {
                error!("Channel failed to deliver {}: {}", message.kind.as_str(), e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
