//! Whole-file read/write helpers shared by the file guards.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Convenience I/O on the file a guard manages.
///
/// Lines are written with a trailing `\n` each and read back without their
/// terminators (`\r\n` included).
pub trait FileOps {
    /// The managed path.
    fn path(&self) -> &Path;

    fn exists(&self) -> bool {
        self.path().is_file()
    }

    fn read_text(&self) -> io::Result<String> {
        fs::read_to_string(self.path())
    }

    fn read_bytes(&self) -> io::Result<Vec<u8>> {
        fs::read(self.path())
    }

    fn read_lines(&self) -> io::Result<Vec<String>> {
        Ok(self.read_text()?.lines().map(str::to_string).collect())
    }

    /// [`FileOps::read_text`], or `None` when the file does not exist.
    fn try_read_text(&self) -> io::Result<Option<String>> {
        missing_as_none(self.read_text())
    }

    /// [`FileOps::read_bytes`], or `None` when the file does not exist.
    fn try_read_bytes(&self) -> io::Result<Option<Vec<u8>>> {
        missing_as_none(self.read_bytes())
    }

    /// [`FileOps::read_lines`], or `None` when the file does not exist.
    fn try_read_lines(&self) -> io::Result<Option<Vec<String>>> {
        missing_as_none(self.read_lines())
    }

    fn write_text(&self, text: &str) -> io::Result<()> {
        fs::write(self.path(), text)
    }

    fn write_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        fs::write(self.path(), bytes)
    }

    fn write_lines<I>(&self, lines: I) -> io::Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        Self: Sized,
    {
        self.write_bytes(join_lines(lines).as_bytes())
    }

    /// Append to the file, creating it if needed.
    fn append_text(&self, text: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path())?;
        file.write_all(text.as_bytes())
    }

    fn append_lines<I>(&self, lines: I) -> io::Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        Self: Sized,
    {
        self.append_text(&join_lines(lines))
    }

    /// Copy the file to `dest`, returning the number of bytes copied.
    fn copy_to(&self, dest: impl AsRef<Path>) -> io::Result<u64>
    where
        Self: Sized,
    {
        fs::copy(self.path(), dest)
    }

    /// The final path component, if it is valid UTF-8.
    fn file_name(&self) -> Option<&str> {
        self.path().file_name().and_then(|n| n.to_str())
    }

    /// Whether another process holds the file open exclusively.
    ///
    /// Only Windows enforces share modes; elsewhere an openable file is never
    /// locked. Errors other than a sharing or lock violation are returned.
    fn is_locked(&self) -> io::Result<bool> {
        match OpenOptions::new().read(true).write(true).open(self.path()) {
            Ok(_) => Ok(false),
            Err(e) if is_lock_violation(&e) => Ok(true),
            Err(e) => Err(e),
        }
    }
}

#[cfg(windows)]
fn is_lock_violation(e: &io::Error) -> bool {
    const ERROR_SHARING_VIOLATION: i32 = 32;
    const ERROR_LOCK_VIOLATION: i32 = 33;
    matches!(
        e.raw_os_error(),
        Some(ERROR_SHARING_VIOLATION | ERROR_LOCK_VIOLATION)
    )
}

#[cfg(not(windows))]
fn is_lock_violation(_: &io::Error) -> bool {
    false
}

fn join_lines<I>(lines: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = String::new();
    for line in lines {
        out.push_str(line.as_ref());
        out.push('\n');
    }
    out
}

fn missing_as_none<T>(result: io::Result<T>) -> io::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Remove a file, treating "already gone" as success.
pub(crate) fn remove_file_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
