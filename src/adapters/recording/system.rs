//! Recording wrappers for the clock and id ports.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use super::record_interaction;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{Clock, IdGenerator};

/// Records every reading of the inner clock.
pub struct RecordingClock {
    inner: Box<dyn Clock>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingClock {
    /// Wraps `inner`.
    pub fn new(inner: Box<dyn Clock>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl Clock for RecordingClock {
    fn now(&self) -> DateTime<Utc> {
        let now = self.inner.now();
        record_interaction(&self.recorder, "clock", "now", &(), &now);
        now
    }
}

/// Records every id the inner generator hands out.
pub struct RecordingIdGenerator {
    inner: Box<dyn IdGenerator>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingIdGenerator {
    /// Wraps `inner`.
    pub fn new(inner: Box<dyn IdGenerator>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl IdGenerator for RecordingIdGenerator {
    fn generate_id(&self) -> String {
        let id = self.inner.generate_id();
        record_interaction(&self.recorder, "id_gen", "generate_id", &(), &id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::{LiveClock, LiveIdGenerator};
    use crate::adapters::recording::shared_recorder;

    #[test]
    fn records_each_reading() {
        let recorder = shared_recorder("rec_clock");
        let clock = RecordingClock::new(Box::new(LiveClock), Arc::clone(&recorder));
        let _ = clock.now();
        let _ = clock.now();
        assert_eq!(recorder.lock().unwrap().len(), 2);
    }

    #[test]
    fn passes_through_generated_id() {
        let recorder = shared_recorder("rec_id_gen");
        let ids = RecordingIdGenerator::new(Box::new(LiveIdGenerator), Arc::clone(&recorder));
        assert_eq!(ids.generate_id().len(), 32);
        assert_eq!(recorder.lock().unwrap().len(), 1);
    }
}
