//! # sundry-scoped
//!
//! Guards that undo their side effects when dropped:
//!
//! - [`TempFile`]: a file path that is deleted on drop
//! - [`RestoreFile`]: an existing file whose original bytes come back on drop
//! - [`TempDir`]: a directory removed recursively on drop
//! - [`CurrentDirGuard`]: a current-directory switch reverted on drop
//! - [`BlockTimer`]: logs how long a block took when it ends
//!
//! [`process`] runs external programs in a chosen working directory.
//!
//! Cleanup in `Drop` never panics; failures are reported through `tracing`.
//! Each guard also offers an explicit `close()` / `restore()` that returns the
//! `io::Result` instead.
//!
//! ## Example
//!
//! ```rust
//! use sundry_scoped::{FileOps, TempFile};
//!
//! let path = {
//!     let file = TempFile::with_text("Hello\nWorld!").unwrap();
//!     assert_eq!(file.read_lines().unwrap(), vec!["Hello", "World!"]);
//!     file.path().to_path_buf()
//! };
//! assert!(!path.exists());
//! ```

mod block_timer;
mod current_dir;
mod file_ops;
pub mod process;
mod temp_dir;
mod temp_file;

pub use block_timer::BlockTimer;
pub use current_dir::CurrentDirGuard;
pub use file_ops::FileOps;
pub use temp_dir::TempDir;
pub use temp_file::{RestoreFile, TempFile};

use std::path::PathBuf;

/// A fresh, collision-free name under the system temp directory.
fn random_temp_path(extension: Option<&str>) -> PathBuf {
    let mut name = uuid::Uuid::new_v4().simple().to_string();
    if let Some(ext) = extension {
        name.push('.');
        name.push_str(ext);
    }
    std::env::temp_dir().join(name)
}
