//! Status transition policy for appointments and reviews.
//!
//! Both status fields were historically free-form setters. `Permissive` keeps
//! that behaviour; `Strict` enforces the one-directional table:
//!
//! ```text
//! upcoming -> completed | cancelled
//! pending  -> approved  | rejected
//! ```

use serde::{Deserialize, Serialize};
use shared::{AppointmentStatus, ReviewStatus};

use super::errors::CollectionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    #[default]
    Permissive,
    Strict,
}

/// A status field with a strict transition table
pub trait StatusMachine: Copy + PartialEq + std::fmt::Display {
    const KIND: &'static str;

    fn strict_allows(self, to: Self) -> bool;
}

impl StatusMachine for AppointmentStatus {
    const KIND: &'static str = "appointment";

    fn strict_allows(self, to: Self) -> bool {
        matches!(
            (self, to),
            (AppointmentStatus::Upcoming, AppointmentStatus::Completed)
                | (AppointmentStatus::Upcoming, AppointmentStatus::Cancelled)
        )
    }
}

impl StatusMachine for ReviewStatus {
    const KIND: &'static str = "review";

    fn strict_allows(self, to: Self) -> bool {
        matches!(
            (self, to),
            (ReviewStatus::Pending, ReviewStatus::Approved)
                | (ReviewStatus::Pending, ReviewStatus::Rejected)
        )
    }
}

impl TransitionPolicy {
    /// Setting the current status again is always allowed.
    pub fn check<S: StatusMachine>(&self, from: S, to: S) -> Result<(), CollectionError> {
        if from == to {
            return Ok(());
        }
        match self {
            TransitionPolicy::Permissive => Ok(()),
            TransitionPolicy::Strict if from.strict_allows(to) => Ok(()),
            TransitionPolicy::Strict => Err(CollectionError::InvalidTransition {
                kind: S::KIND,
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    }
}
