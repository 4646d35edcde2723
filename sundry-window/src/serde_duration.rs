//! Serde adapter storing a `Duration` as a compact unit string (`"90s"`).
//!
//! Use with `#[serde(with = "sundry_window::serde_duration")]`.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

use crate::format::{format_duration, parse_duration};

pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_duration(*value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse_duration(&text).map_err(serde::de::Error::custom)
}
