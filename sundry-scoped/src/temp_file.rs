//! Files that clean up after themselves.

use std::fmt;
use std::fs;
use std::io;
use std::mem;
use std::path::{Path, PathBuf};

use sundry_ext::absolute_from;
use tracing::{debug, warn};

use crate::file_ops::{remove_file_if_exists, FileOps};
use crate::random_temp_path;

/// A file path that is deleted when the guard is dropped.
///
/// The file is not created until something is written to it.
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
    armed: bool,
}

impl TempFile {
    /// A random `.tmp` name under the system temp directory.
    pub fn new() -> Self {
        Self {
            path: random_temp_path(Some("tmp")),
            armed: true,
        }
    }

    /// Manage a specific path, resolved against the current directory.
    pub fn named(path: impl AsRef<Path>) -> io::Result<Self> {
        let base = std::env::current_dir()?;
        Ok(Self {
            path: absolute_from(base, path),
            armed: true,
        })
    }

    /// Replace the last extension (`"csv"` and `".csv"` are equivalent).
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.path
            .set_extension(extension.strip_prefix('.').unwrap_or(extension));
        self
    }

    /// A new temp file holding `text`.
    pub fn with_text(text: &str) -> io::Result<Self> {
        let file = Self::new();
        file.write_text(text)?;
        Ok(file)
    }

    /// A new temp file holding `bytes`.
    pub fn with_bytes(bytes: &[u8]) -> io::Result<Self> {
        let file = Self::new();
        file.write_bytes(bytes)?;
        Ok(file)
    }

    /// A new temp file holding `lines`, one per line.
    pub fn with_lines<I>(lines: I) -> io::Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let file = Self::new();
        file.write_lines(lines)?;
        Ok(file)
    }

    /// Disarm deletion and hand back the path.
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        mem::take(&mut self.path)
    }

    /// Delete now, reporting any failure.
    pub fn close(mut self) -> io::Result<()> {
        self.armed = false;
        remove_file_if_exists(&self.path)
    }
}

impl Default for TempFile {
    fn default() -> Self {
        Self::new()
    }
}

impl FileOps for TempFile {
    fn path(&self) -> &Path {
        &self.path
    }
}

impl AsRef<Path> for TempFile {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for TempFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match remove_file_if_exists(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed temporary file"),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove temporary file"
            ),
        }
    }
}

/// An existing file whose original contents are put back when dropped.
#[derive(Debug)]
pub struct RestoreFile {
    path: PathBuf,
    original: Vec<u8>,
    armed: bool,
}

impl RestoreFile {
    /// Snapshot `path`; the file must exist.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = absolute_from(std::env::current_dir()?, path);
        let original = fs::read(&path)?;
        Ok(Self {
            path,
            original,
            armed: true,
        })
    }

    /// Snapshot `path`, then overwrite it with `bytes`.
    pub fn with_bytes(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<Self> {
        let file = Self::new(path)?;
        file.write_bytes(bytes)?;
        Ok(file)
    }

    /// Snapshot `path`, then overwrite it with `text`.
    pub fn with_text(path: impl AsRef<Path>, text: &str) -> io::Result<Self> {
        Self::with_bytes(path, text.as_bytes())
    }

    /// The bytes that will be restored.
    pub fn original(&self) -> &[u8] {
        &self.original
    }

    /// Put the original contents back now, reporting any failure.
    pub fn restore(mut self) -> io::Result<()> {
        self.armed = false;
        fs::write(&self.path, &self.original)
    }
}

impl FileOps for RestoreFile {
    fn path(&self) -> &Path {
        &self.path
    }
}

impl AsRef<Path> for RestoreFile {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl Drop for RestoreFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = fs::write(&self.path, &self.original) {
            warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to restore original file contents"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Hello\nWorld!";
    const LINES: [&str; 2] = ["Hello", "World!"];

    #[test]
    fn not_created_until_written() {
        let file = TempFile::new();
        assert!(!file.exists());
        assert_eq!(file.try_read_text().unwrap(), None);
        assert_eq!(file.try_read_bytes().unwrap(), None);
        assert_eq!(file.try_read_lines().unwrap(), None);
    }

    #[test]
    fn text_round_trip() {
        let file = TempFile::new();
        file.write_text(TEXT).unwrap();

        assert_eq!(file.read_text().unwrap(), TEXT);
        assert_eq!(file.read_text().unwrap(), fs::read_to_string(file.path()).unwrap());
    }

    #[test]
    fn lines_round_trip() {
        let file = TempFile::new();
        file.write_lines(LINES).unwrap();

        assert_eq!(file.read_lines().unwrap(), LINES);
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "Hello\nWorld!\n");
    }

    #[test]
    fn bytes_round_trip() {
        let file = TempFile::new();
        file.write_bytes(TEXT.as_bytes()).unwrap();

        assert_eq!(file.read_bytes().unwrap(), TEXT.as_bytes());
        assert_eq!(file.read_bytes().unwrap(), fs::read(file.path()).unwrap());
    }

    #[test]
    fn constructors_with_content() {
        let text = TempFile::with_text(TEXT).unwrap();
        assert_eq!(text.read_text().unwrap(), TEXT);

        let lines = TempFile::with_lines(LINES).unwrap();
        assert_eq!(lines.read_lines().unwrap(), LINES);

        let bytes = TempFile::with_bytes(TEXT.as_bytes()).unwrap();
        assert_eq!(bytes.read_bytes().unwrap(), TEXT.as_bytes());
    }

    #[test]
    fn append_extends_contents() {
        let file = TempFile::new();
        file.append_text("a").unwrap();
        file.append_text("b").unwrap();
        file.append_lines(["c", "d"]).unwrap();
        assert_eq!(file.read_text().unwrap(), "abc\nd\n");
    }

    #[test]
    fn with_extension_replaces_last_extension() {
        let file = TempFile::new().with_extension(".json");
        assert_eq!(file.path().extension().unwrap(), "json");
        assert!(file.file_name().unwrap().ends_with(".json"));
        assert!(!file.file_name().unwrap().contains(".tmp"));

        let dir = tempfile::tempdir().unwrap();
        let named = TempFile::named(dir.path().join("report.tar.gz"))
            .unwrap()
            .with_extension("zip");
        assert_eq!(named.path(), dir.path().join("report.tar.zip"));
    }

    #[test]
    fn deleted_on_drop() {
        let path = {
            let file = TempFile::with_text(TEXT).unwrap();
            assert!(file.exists());
            file.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn named_file_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("named.txt");
        {
            let file = TempFile::named(&target).unwrap();
            file.write_text("x").unwrap();
            assert!(target.exists());
        }
        assert!(!target.exists());
    }

    #[test]
    fn keep_disarms_deletion() {
        let file = TempFile::with_text(TEXT).unwrap();
        let path = file.keep();
        assert!(path.exists());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn close_reports_and_deletes() {
        let file = TempFile::with_text(TEXT).unwrap();
        let path = file.path().to_path_buf();
        file.close().unwrap();
        assert!(!path.exists());

        // Never written: nothing to delete, still fine.
        TempFile::new().close().unwrap();
    }

    #[test]
    fn copy_to_duplicates_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("copy.txt");
        let file = TempFile::with_text(TEXT).unwrap();
        assert_eq!(file.copy_to(&dest).unwrap(), TEXT.len() as u64);
        assert_eq!(fs::read_to_string(dest).unwrap(), TEXT);
    }

    #[test]
    fn restore_file_puts_original_back_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("settings.ini");
        fs::write(&target, "original").unwrap();

        {
            let file = RestoreFile::with_text(&target, "changed").unwrap();
            assert_eq!(file.read_text().unwrap(), "changed");
            assert_eq!(file.original(), b"original");
            file.append_text(" more").unwrap();
        }

        assert_eq!(fs::read_to_string(&target).unwrap(), "original");
    }

    #[test]
    fn restore_file_explicit_restore() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("data.bin");
        fs::write(&target, [1u8, 2, 3]).unwrap();

        let file = RestoreFile::with_bytes(&target, &[9, 9]).unwrap();
        assert_eq!(fs::read(&target).unwrap(), vec![9, 9]);
        file.restore().unwrap();
        assert_eq!(fs::read(&target).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn restore_file_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RestoreFile::new(dir.path().join("missing")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
