//! Source of the current time for `Time` conditions.

use chrono::{DateTime, FixedOffset, Local};

/// Supplies "now" to the evaluator.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl FixedClock {
    /// Build a clock from an RFC3339 timestamp.
    pub fn parse(timestamp: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(timestamp).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
