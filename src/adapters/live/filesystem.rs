//! Live filesystem adapter using `std::fs`.

use std::path::Path;

use crate::ports::filesystem::FileSystem;
use crate::ports::PortError;

/// Filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(std::fs::write(path, contents)?)
    }

    fn remove_file(&self, path: &Path) -> Result<(), PortError> {
        Ok(std::fs::remove_file(path)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>, PortError> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            if let Some(name) = entry?.file_name().to_str() {
                entries.push(name.to_string());
            }
        }
        entries.sort();
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_list_remove_cycle() {
        let dir = std::env::temp_dir().join("devlens_live_fs_test");
        let _ = std::fs::remove_dir_all(&dir);
        let fs = LiveFileSystem;

        fs.write(&dir.join("b.yaml"), "b").unwrap();
        fs.write(&dir.join("a.yaml"), "a").unwrap();
        assert_eq!(fs.list_dir(&dir).unwrap(), vec!["a.yaml", "b.yaml"]);
        assert_eq!(fs.read_to_string(&dir.join("a.yaml")).unwrap(), "a");

        fs.remove_file(&dir.join("a.yaml")).unwrap();
        assert!(!fs.exists(&dir.join("a.yaml")));
        assert!(fs.remove_file(&dir.join("a.yaml")).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
