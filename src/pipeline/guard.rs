//! Single-slot task guard

use std::sync::Arc;

use tokio::sync::{Semaphore, SemaphorePermit};

use crate::error::Result;

/// Admits one generate-action at a time. A second caller is turned away
/// with `Error::Busy` instead of queueing.
#[derive(Debug, Clone)]
pub struct TaskGuard {
    slot: Arc<Semaphore>,
}

impl TaskGuard {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Semaphore::new(1)),
        }
    }

    /// Claims the slot; it is released when the permit drops
    pub fn try_begin(&self) -> Result<SemaphorePermit<'_>> {
        Ok(self.slot.try_acquire()?)
    }

    pub fn is_busy(&self) -> bool {
        self.slot.available_permits() == 0
    }
}

impl Default for TaskGuard {
    fn default() -> Self {
        Self::new()
    }
}
