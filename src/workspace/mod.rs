//! Local staging tree for one comparison run

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{CompareError, Result};
use crate::job::Side;

pub const DEFAULT_OUTPUT_ROOT: &str = "output";
pub const COOKIE_FILE: &str = "cookie.txt";
pub const COMPARISON_OUTPUT_DIR: &str = "bbboutput";

/// Staging directory `<output-root>/<change-id>/<job-id>`.
///
/// Creation and removal both go through `staging_path`, so a workspace
/// always removes exactly the tree it created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub root: PathBuf,
}

pub fn staging_path(output_root: &Path, change_id: &str, job_id: &str) -> PathBuf {
    output_root.join(change_id).join(job_id)
}

impl Workspace {
    /// Workspace for a (change-id, job-id) pair without touching the filesystem
    pub fn at(output_root: &Path, change_id: &str, job_id: &str) -> Self {
        Self {
            root: staging_path(output_root, change_id, job_id),
        }
    }

    /// Create the staging directory and its parents. Existing directories are fine.
    pub fn create(output_root: &Path, change_id: &str, job_id: &str) -> Result<Self> {
        let workspace = Self::at(output_root, change_id, job_id);
        fs::create_dir_all(&workspace.root)
            .map_err(|e| CompareError::filesystem(&workspace.root, e))?;
        tracing::debug!(path = %workspace.root.display(), "staging directory ready");
        Ok(workspace)
    }

    /// Recursively delete the staging directory. A missing tree is not an error.
    pub fn remove(output_root: &Path, change_id: &str, job_id: &str) {
        Self::at(output_root, change_id, job_id).cleanup();
    }

    pub fn cleanup(&self) {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => tracing::debug!(path = %self.root.display(), "staging directory removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.root.display(),
                error = %e,
                "failed to remove staging directory"
            ),
        }
    }

    pub fn cookie_path(&self) -> PathBuf {
        self.root.join(COOKIE_FILE)
    }

    pub fn side_dir(&self, side: Side) -> PathBuf {
        self.root.join(side.label())
    }

    /// Where a downloaded result file lands: `<root>/<side>/<workflow>/<file>`
    pub fn local_file(&self, side: Side, workflow: &str, filename: &str) -> PathBuf {
        self.side_dir(side).join(workflow).join(filename)
    }

    pub fn comparison_output_dir(&self) -> PathBuf {
        self.root.join(COMPARISON_OUTPUT_DIR)
    }
}
