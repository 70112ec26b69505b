//! TTL classes for cached QR data.

use std::time::Duration;

const MINUTE_MS: u64 = 60 * 1000;

/// Default lifetime of each kind of cached record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlClass {
    /// Individual QR codes and history lists: 30 minutes
    QrCodes,
    /// User profiles: 1 hour
    UserData,
    /// Style templates: 24 hours
    Templates,
    /// Form drafts: 10 minutes
    FormData,
    /// Search result pages: 5 minutes
    SearchResults,
}

impl TtlClass {
    /// TTL in milliseconds.
    pub const fn millis(self) -> u64 {
        match self {
            TtlClass::QrCodes => 30 * MINUTE_MS,
            TtlClass::UserData => 60 * MINUTE_MS,
            TtlClass::Templates => 24 * 60 * MINUTE_MS,
            TtlClass::FormData => 10 * MINUTE_MS,
            TtlClass::SearchResults => 5 * MINUTE_MS,
        }
    }

    pub fn duration(self) -> Duration {
        Duration::from_millis(self.millis())
    }
}
