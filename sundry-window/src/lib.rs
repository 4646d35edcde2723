//! # sundry-window
//!
//! Bounded buffers and throughput estimation for long-running jobs.
//!
//! - [`RollingWindow`]: fixed-capacity FIFO that evicts its oldest item
//! - [`MovingAverage`]: items-per-second over a trailing time window, with
//!   time remaining, completion estimates and a printable status line
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sundry_window::MovingAverage;
//!
//! let progress: MovingAverage = MovingAverage::new(10_000);
//! for _ in 0..10_000 {
//!     // ... process one record ...
//!     progress.push();
//! }
//! println!("{}", progress.status());
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for [`MovingAverageConfig`] and
//!   [`Eta`], `Serialize` for [`Status`], and the [`serde_duration`] adapter

mod error;
mod format;
mod moving_average;
mod rolling;

#[cfg(feature = "serde")]
pub mod serde_duration;

pub use error::WindowError;
pub use format::{format_count, format_duration, format_rate, format_remaining, parse_duration};
pub use moving_average::{
    Clock, Eta, ManualClock, MovingAverage, MovingAverageBuilder, MovingAverageConfig, Status,
    SystemClock, Throughput, DEFAULT_PRECISION, DEFAULT_WINDOW, MAX_PRECISION,
};
pub use rolling::RollingWindow;
