//! Per-run scratch directories

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::backend::Runtime;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// A scratch directory owned by one run. Removed on drop unless kept for debugging.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    keep: bool,
}

impl ScratchDir {
    /// Create `<root>/<problem>-<runtime>-<pid>-<seq>`.
    ///
    /// The path is unique per process and per run, so concurrent runs never share artifacts.
    pub fn create(root: &Path, problem_id: &str, runtime: Runtime, keep: bool) -> io::Result<Self> {
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let name = format!("{}-{}-{}-{}", problem_id, runtime.id(), std::process::id(), seq);
        let path = root.join(name);
        if path.exists() {
            fs::remove_dir_all(&path)?;
        }
        fs::create_dir_all(&path)?;
        tracing::debug!(path = %path.display(), "created scratch directory");
        Ok(Self { path, keep })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `contents` to `name` inside the directory.
    pub fn write(&self, name: &str, contents: &str) -> io::Result<PathBuf> {
        let file = self.path.join(name);
        fs::write(&file, contents)?;
        Ok(file)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.keep {
            tracing::info!(path = %self.path.display(), "keeping scratch directory");
            return;
        }
        if let Err(e) = fs::remove_dir_all(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove scratch directory");
        }
    }
}
