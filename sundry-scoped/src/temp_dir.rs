//! Directories removed recursively on drop.

use std::fmt;
use std::fs;
use std::io;
use std::mem;
use std::path::{Path, PathBuf};

use sundry_ext::absolute_from;
use tracing::{debug, warn};

use crate::random_temp_path;

/// A directory that is created up front and removed (with its contents)
/// when the guard is dropped.
#[derive(Debug)]
pub struct TempDir {
    path: PathBuf,
    armed: bool,
}

impl TempDir {
    /// A random directory under the system temp directory.
    pub fn new() -> io::Result<Self> {
        Self::create(random_temp_path(None))
    }

    /// A random directory under `parent`.
    pub fn in_dir(parent: impl AsRef<Path>) -> io::Result<Self> {
        let name = random_temp_path(None);
        let name = name.file_name().unwrap_or_default();
        Self::at(parent.as_ref().join(name))
    }

    /// Manage `path`, resolved against the current directory and created
    /// (with parents) if missing.
    pub fn at(path: impl AsRef<Path>) -> io::Result<Self> {
        let base = std::env::current_dir()?;
        Self::create(absolute_from(base, path))
    }

    fn create(path: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&path)?;
        Ok(Self { path, armed: true })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A path inside the directory; nothing is created.
    pub fn child(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path.join(name)
    }

    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Files directly inside the directory, sorted.
    pub fn files(&self) -> io::Result<Vec<PathBuf>> {
        self.list(|ty| ty.is_file())
    }

    /// Subdirectories directly inside the directory, sorted.
    pub fn dirs(&self) -> io::Result<Vec<PathBuf>> {
        self.list(|ty| ty.is_dir())
    }

    /// Every entry directly inside the directory, sorted.
    pub fn entries(&self) -> io::Result<Vec<PathBuf>> {
        self.list(|_| true)
    }

    fn list(&self, keep: impl Fn(&fs::FileType) -> bool) -> io::Result<Vec<PathBuf>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            if keep(&entry.file_type()?) {
                out.push(entry.path());
            }
        }
        out.sort();
        Ok(out)
    }

    /// Disarm removal and hand back the path.
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        mem::take(&mut self.path)
    }

    /// Remove now, reporting any failure.
    pub fn close(mut self) -> io::Result<()> {
        self.armed = false;
        remove_dir_if_exists(&self.path)
    }
}

fn remove_dir_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

impl AsRef<Path> for TempDir {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for TempDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match remove_dir_if_exists(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed temporary directory"),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove temporary directory"
            ),
        }
    }
}
