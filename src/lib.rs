//! # sundry
//!
//! A grab bag of small utilities, re-exported from one place.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                            sundry                            │
//! │  ┌──────────────┐  ┌────────────────┐  ┌──────────────────┐  │
//! │  │ sundry-ext   │  │ sundry-window  │  │ sundry-scoped    │  │
//! │  │ (extensions) │◀─│ (rates, ETAs)  │  │ (RAII guards)    │  │
//! │  └──────────────┘  └───────┬────────┘  └──────────────────┘  │
//! │                            │                                 │
//! │        notify          ┌───▼───┐      settings               │
//! │  (change events)       │ meter │◀── (config file + env)      │
//! │                        └───────┘                             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`ext`]**: string, parsing, collection, error-chain, date and path helpers
//! - **[`window`]**: [`MovingAverage`] throughput/ETA estimation and [`RollingWindow`]
//! - **[`scoped`]**: temp files and directories, working-directory guards,
//!   block timers
//! - **[`notify`]**: property-change notification for observable values
//! - **[`meter`]**: the line throughput meter behind the `sundry-meter` binary
//!
//! ## Usage
//!
//! ```
//! use std::time::Duration;
//! use sundry::{MovingAverage, StrExt, Case};
//!
//! let average: MovingAverage = MovingAverage::builder()
//!     .total_items(1_000)
//!     .window(Duration::from_secs(30))
//!     .build()
//!     .unwrap();
//! average.push_many(10);
//! assert_eq!(average.pushed(), 10);
//!
//! assert_eq!("report".ensure_suffix(".csv", Case::Sensitive), "report.csv");
//! ```
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Meter lines from a long-running job
//! ./import.sh | sundry-meter --total 250000 --passthrough > import.log
//!
//! # Meter a file with a short averaging window
//! sundry-meter --window 10s access.log
//! ```

pub mod meter;
pub mod notify;
pub mod settings;

pub use sundry_ext as ext;
pub use sundry_scoped as scoped;
pub use sundry_window as window;

// Re-export the most used types for convenience
pub use meter::{Meter, Summary};
pub use notify::{Notifier, Observable, Validity};
pub use settings::MeterSettings;
pub use sundry_ext::{Case, JoinExt, StrExt, StrictMap};
pub use sundry_scoped::{BlockTimer, CurrentDirGuard, FileOps, TempDir, TempFile};
pub use sundry_window::{Eta, MovingAverage, RollingWindow, Status, Throughput};
