//! Which record types are displayed.

use crate::audit::types::RecordType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayPolicy {
    show_all: bool,
}

impl DisplayPolicy {
    /// `show_all == false` keeps only SELinux decisions and errors.
    pub fn new(show_all: bool) -> Self {
        Self { show_all }
    }

    pub fn shows(&self, record_type: &RecordType) -> bool {
        self.show_all || record_type.is_selinux()
    }
}
