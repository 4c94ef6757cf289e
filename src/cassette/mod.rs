//! Cassettes: recorded port interactions replayed in tests and demos.

pub mod format;
pub mod recorder;
pub mod replayer;
