//! Temporary switch of the process working directory.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use sundry_ext::absolute_from;
use tracing::warn;

/// Switches the current directory and switches back when dropped.
///
/// The working directory is process-wide: guards on different threads race
/// with each other.
#[derive(Debug)]
pub struct CurrentDirGuard {
    original: PathBuf,
    target: Option<PathBuf>,
}

impl CurrentDirGuard {
    /// Enter `path` (resolved against the current directory).
    ///
    /// An empty path records the current directory without changing it.
    pub fn enter(path: impl AsRef<Path>) -> io::Result<Self> {
        let original = env::current_dir()?;
        let path = path.as_ref();

        let target = if path.as_os_str().is_empty() {
            None
        } else {
            let target = absolute_from(&original, path);
            env::set_current_dir(&target)?;
            Some(target)
        };

        Ok(Self { original, target })
    }

    /// The directory entered, `None` when the guard was created with an
    /// empty path.
    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    /// The directory restored on drop.
    pub fn original(&self) -> &Path {
        &self.original
    }
}

impl Drop for CurrentDirGuard {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.original) {
            warn!(
                path = %self.original.display(),
                error = %e,
                "Failed to restore current directory"
            );
        }
    }
}
