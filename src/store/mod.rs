//! Project store: persistence for imported projects.
//!
//! All I/O goes through the `FileSystem` port, so the store works with live,
//! recording and replaying adapters. Layout:
//!
//! ```text
//! <root>/
//!   └── projects/
//!         └── <id>.yaml
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::context::ServiceContext;
use crate::error::{LensError, Result};
use crate::project::RepoProject;

/// Key/value store of [`RepoProject`] documents.
pub struct ProjectStore<'a> {
    ctx: &'a ServiceContext,
    root: PathBuf,
}

impl<'a> ProjectStore<'a> {
    /// Creates a store rooted at `root`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, root: &Path) -> Self {
        Self { ctx, root: root.to_path_buf() }
    }

    /// Writes `project` to `<root>/projects/<id>.yaml`, replacing any earlier version.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::Store`] if serialization or writing fails.
    pub fn save(&self, project: &RepoProject) -> Result<()> {
        let yaml = serde_yaml::to_string(project)
            .map_err(|e| LensError::Store(format!("failed to serialize project {}: {e}", project.id)))?;
        let path = self.project_path(&project.id);
        debug!(path = %path.display(), "saving project");
        self.ctx
            .fs
            .write(&path, &yaml)
            .map_err(|e| LensError::Store(format!("failed to write project {}: {e}", project.id)))
    }

    /// Reads the project with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::Store`] if the project is missing or unreadable.
    pub fn load(&self, id: &str) -> Result<RepoProject> {
        let path = self.project_path(id);
        let contents = self
            .ctx
            .fs
            .read_to_string(&path)
            .map_err(|e| LensError::Store(format!("failed to read project {id}: {e}")))?;
        serde_yaml::from_str(&contents).map_err(|e| LensError::Store(format!("failed to parse project {id}: {e}")))
    }

    /// Ids of every stored project, sorted. An absent store is empty.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::Store`] if the projects directory cannot be listed.
    pub fn list(&self) -> Result<Vec<String>> {
        let dir = self.root.join("projects");
        if !self.ctx.fs.exists(&dir) {
            return Ok(Vec::new());
        }
        let entries = self
            .ctx
            .fs
            .list_dir(&dir)
            .map_err(|e| LensError::Store(format!("failed to list projects: {e}")))?;
        let mut ids: Vec<String> =
            entries.into_iter().filter_map(|name| name.strip_suffix(".yaml").map(String::from)).collect();
        ids.sort();
        Ok(ids)
    }

    /// Deletes the project with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::Store`] if the project does not exist or cannot be removed.
    pub fn remove(&self, id: &str) -> Result<()> {
        let path = self.project_path(id);
        if !self.ctx.fs.exists(&path) {
            return Err(LensError::Store(format!("no project with id {id}")));
        }
        self.ctx
            .fs
            .remove_file(&path)
            .map_err(|e| LensError::Store(format!("failed to remove project {id}: {e}")))
    }

    fn project_path(&self, id: &str) -> PathBuf {
        self.root.join("projects").join(format!("{id}.yaml"))
    }
}
