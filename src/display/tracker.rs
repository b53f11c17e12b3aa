//! Links lines that belong to the same kernel event.

use crate::audit::types::EventStamp;

/// Remembers the stamp of the last displayed event.
#[derive(Debug, Default, Clone)]
pub struct ContinuationTracker {
    last: Option<EventStamp>,
}

impl ContinuationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines without a stamp never continue anything.
    pub fn is_continuation(&self, stamp: Option<&EventStamp>) -> bool {
        matches!((stamp, self.last.as_ref()), (Some(s), Some(last)) if s == last)
    }

    /// A new event was displayed.
    pub fn start(&mut self, stamp: Option<EventStamp>) {
        self.last = stamp;
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
