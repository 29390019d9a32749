//! Working-area management for pipeline runs.
//!
//! A [`WorkingArea`] is the per-run scratch directory
//! `<base>/processing_<id>/`. It is created before any stage runs and released
//! exactly once when the run ends: explicitly through
//! [`WorkingArea::release`], or on drop if the run unwinds first.

use std::path::{Path, PathBuf};

use subburn_common::{Error, Result, VideoId};

/// Create `dir` and its parents if absent. Idempotent.
///
/// # Errors
///
/// Returns [`Error::DirectoryCreate`] on permission or filesystem errors.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| {
        tracing::error!(path = %dir.display(), error = %source, "Failed to create directory");
        Error::DirectoryCreate {
            path: dir.to_path_buf(),
            source,
        }
    })?;
    tracing::debug!(path = %dir.display(), "Ensured directory exists");
    Ok(())
}

/// Directory holding one run's intermediate artifacts.
///
/// # Example
///
/// ```no_run
/// use subburn_av::WorkingArea;
/// use subburn_common::VideoId;
/// use std::path::Path;
///
/// let id = VideoId::parse("abc123", "https://youtu.be/abc123")?;
/// let area = WorkingArea::create(Path::new("./output"), &id, false)?;
/// // ... stages write into area.path() ...
/// area.release();
/// # Ok::<(), subburn_common::Error>(())
/// ```
#[derive(Debug)]
pub struct WorkingArea {
    path: PathBuf,
    keep: bool,
    released: bool,
}

impl WorkingArea {
    /// Create the working area for `id` under `base`.
    ///
    /// `keep` decides what [`release`](Self::release) does: retain the
    /// directory, or remove it recursively.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DirectoryCreate`] if the directory cannot be created.
    pub fn create(base: &Path, id: &VideoId, keep: bool) -> Result<Self> {
        let path = Self::path_for(base, id);
        ensure_dir(&path)?;
        tracing::info!(path = %path.display(), "Created working directory");
        Ok(Self {
            path,
            keep,
            released: false,
        })
    }

    /// The deterministic working-area path for `id` under `base`.
    pub fn path_for(base: &Path, id: &VideoId) -> PathBuf {
        base.join(format!("processing_{id}"))
    }

    /// Path to the working directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a path for a named file inside the working area.
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// End the working area's lifecycle.
    ///
    /// Deletion errors are logged and never returned: cleanup must not mask
    /// the run's own result.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if self.keep {
            tracing::info!(path = %self.path.display(), "Keeping working directory as requested");
            return;
        }

        tracing::info!(path = %self.path.display(), "Cleaning up working directory");
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to remove working directory");
        }
    }
}

impl Drop for WorkingArea {
    fn drop(&mut self) {
        self.release_inner();
    }
}
