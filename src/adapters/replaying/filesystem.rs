//! Replaying adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::Mutex;

use super::{next_output, replay_result, replay_value};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{FileSystem, PortError};

/// Serves recorded filesystem results. Nothing touches disk.
pub struct ReplayingFileSystem {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFileSystem {
    /// Creates a replaying filesystem.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn result<T: serde::de::DeserializeOwned>(&self, method: &str) -> Result<T, PortError> {
        replay_result(next_output(&self.replayer, "fs", method), &format!("fs::{method}"))
    }
}

impl FileSystem for ReplayingFileSystem {
    fn read_to_string(&self, _path: &Path) -> Result<String, PortError> {
        self.result("read_to_string")
    }

    fn write(&self, _path: &Path, _contents: &str) -> Result<(), PortError> {
        self.result("write")
    }

    fn remove_file(&self, _path: &Path) -> Result<(), PortError> {
        self.result("remove_file")
    }

    fn exists(&self, _path: &Path) -> bool {
        replay_value(next_output(&self.replayer, "fs", "exists"), "fs::exists")
    }

    fn list_dir(&self, _path: &Path) -> Result<Vec<String>, PortError> {
        self.result("list_dir")
    }
}
