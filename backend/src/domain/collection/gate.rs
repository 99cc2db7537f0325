use std::sync::{Arc, Mutex, MutexGuard};

/// Two-phase guard around a destructive operation: `request` marks a pending
/// target, `confirm` takes it, `cancel` discards it. At most one target is
/// pending at a time; a new request replaces the previous one.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationGate {
    pending: Arc<Mutex<Option<String>>>,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn request(&self, id: impl Into<String>) {
        *self.slot() = Some(id.into());
    }

    pub fn confirm(&self) -> Option<String> {
        self.slot().take()
    }

    pub fn cancel(&self) -> Option<String> {
        self.slot().take()
    }

    pub fn pending(&self) -> Option<String> {
        self.slot().clone()
    }
}
