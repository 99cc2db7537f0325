//! # Side-Channel Notifier
//!
//! Mutations publish [`DomainEvent`]s on the [`EventBus`]; the
//! [`NotificationDispatcher`] subscribes, composes WhatsApp-style deep links
//! and hands them to a [`MessageChannel`]. A failing channel is logged and
//! never rolls back or blocks the mutation that triggered it.

pub mod channel;
pub mod deep_link;
pub mod dispatcher;
pub mod events;
pub mod notifier;
pub mod templates;

use thiserror::Error;

pub use channel::{FanOutChannel, LoggingChannel, MessageChannel, MessageKind, NotificationOutbox, OutboundMessage};
pub use deep_link::{normalize_phone, DeepLink};
pub use dispatcher::NotificationDispatcher;
pub use events::{DomainEvent, EventBus};
pub use notifier::Notifier;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("Phone number has no digits: {0:?}")]
    InvalidPhone(String),

    #[error("No owner phone number configured")]
    OwnerPhoneMissing,

    #[error("Message type {0} cannot be composed for an appointment")]
    UnsupportedMessage(&'static str),

    #[error("Messaging channel unavailable: {0}")]
    ChannelUnavailable(String),
}
