//! # sundry-ext
//!
//! Small extension helpers that come up in almost every application:
//! string trimming and casing, lenient and strict parsing, byte/string
//! conversions, digit grouping, pluralisation, collection joins and keyed
//! diffs, and error-chain flattening.
//!
//! ## Design Goals
//!
//! - **Extension traits over free functions** where the receiver is obvious
//!   (`"name".ensure_suffix(".json", Case::Sensitive)`)
//! - **Safe variants** for absent input: functions ending in `_opt` take an
//!   `Option` and map `None` to `None` (or `false`) instead of failing
//! - **Strict variants** return typed errors that name the offending input
//!
//! ## Example
//!
//! ```rust
//! use sundry_ext::{pluralize, Case, JoinExt, StrExt};
//!
//! let file = "report".ensure_suffix(".csv", Case::Insensitive);
//! assert_eq!(file, "report.csv");
//!
//! assert_eq!(pluralize(3, "entr", "ies", "y"), "entries");
//! assert_eq!([1, 2, 3].join_with(", "), "1, 2, 3");
//! ```

mod bytes;
mod collections;
mod datetime;
mod error;
mod errors;
mod numbers;
mod parse;
mod paths;
mod plural;
mod strings;

pub use bytes::*;
pub use collections::*;
pub use datetime::*;
pub use error::{MapError, ParseError};
pub use errors::*;
pub use numbers::*;
pub use parse::*;
pub use paths::*;
pub use plural::*;
pub use strings::*;
