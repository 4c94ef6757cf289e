//! Process-local inputs: wall-clock time and fresh identifiers.
//!
//! Sync timestamps, statistics periods and project ids all come through
//! these two traits, so a replayed session sees the "now" and the ids it
//! was recorded with.

use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Source of project identifiers.
pub trait IdGenerator: Send + Sync {
    /// A new identifier, unique among stored projects and usable as a file name.
    fn generate_id(&self) -> String;
}
