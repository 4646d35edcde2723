//! Settings for the throughput meter.
//!
//! Loaded from an optional config file (any format the `config` crate
//! understands, e.g. TOML) layered under `SUNDRY_*` environment variables:
//!
//! ```toml
//! total = 250000
//! precision = 1
//! window = "30s"
//! refresh = "500ms"
//! passthrough = true
//! ```
//!
//! Durations use unit strings: `ns`, `us`, `ms`, `s`, `m`, `h`.

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use sundry_window::{MovingAverageConfig, DEFAULT_PRECISION, DEFAULT_WINDOW};

/// Prefix for environment overrides (`SUNDRY_WINDOW=90s`).
pub const ENV_PREFIX: &str = "SUNDRY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterSettings {
    /// Expected number of lines; 0 when unknown.
    pub total: u64,
    /// Decimal places shown for rates.
    pub precision: u32,
    /// Trailing window the rate is averaged over.
    #[serde(with = "sundry_window::serde_duration")]
    pub window: Duration,
    /// How often the status line is redrawn.
    #[serde(with = "sundry_window::serde_duration")]
    pub refresh: Duration,
    /// Copy input lines to stdout.
    pub passthrough: bool,
    /// Suppress the live status line (the final summary is still printed).
    pub quiet: bool,
}

impl Default for MeterSettings {
    fn default() -> Self {
        Self {
            total: 0,
            precision: DEFAULT_PRECISION,
            window: DEFAULT_WINDOW,
            refresh: Duration::from_secs(1),
            passthrough: false,
            quiet: false,
        }
    }
}

impl MeterSettings {
    /// Load from `path` (if given) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder.add_source(env).build()?.try_deserialize()
    }

    /// The moving-average configuration these settings describe.
    pub fn moving_average_config(&self) -> MovingAverageConfig {
        MovingAverageConfig {
            total_items: self.total,
            precision: self.precision,
            window: self.window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env() -> Environment {
        Environment::with_prefix(ENV_PREFIX).source(Some(config::Map::new()))
    }

    #[test]
    fn defaults_without_sources() {
        let settings = MeterSettings::load_with_env(None, no_env()).unwrap();
        assert_eq!(settings, MeterSettings::default());
        assert_eq!(settings.window, Duration::from_secs(60));
    }

    #[test]
    fn reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meter.toml");
        std::fs::write(
            &path,
            "total = 5000\nwindow = \"30s\"\nrefresh = \"250ms\"\npassthrough = true\n",
        )
        .unwrap();

        let settings = MeterSettings::load_with_env(Some(&path), no_env()).unwrap();
        assert_eq!(settings.total, 5000);
        assert_eq!(settings.window, Duration::from_secs(30));
        assert_eq!(settings.refresh, Duration::from_millis(250));
        assert!(settings.passthrough);
        assert_eq!(settings.precision, DEFAULT_PRECISION);
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meter.toml");
        std::fs::write(&path, "window = \"30s\"\n").unwrap();

        let mut vars = config::Map::new();
        vars.insert("SUNDRY_WINDOW".to_string(), "2m".to_string());
        vars.insert("SUNDRY_PRECISION".to_string(), "3".to_string());
        let env = Environment::with_prefix(ENV_PREFIX).source(Some(vars));

        let settings = MeterSettings::load_with_env(Some(&path), env).unwrap();
        assert_eq!(settings.window, Duration::from_secs(120));
        assert_eq!(settings.precision, 3);
    }

    #[test]
    fn bad_duration_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meter.toml");
        std::fs::write(&path, "window = \"soon\"\n").unwrap();

        assert!(MeterSettings::load_with_env(Some(&path), no_env()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(MeterSettings::load_with_env(Some(&path), no_env()).is_err());
    }

    #[test]
    fn converts_to_moving_average_config() {
        let settings = MeterSettings {
            total: 10,
            precision: 2,
            window: Duration::from_secs(5),
            ..Default::default()
        };
        let config = settings.moving_average_config();
        assert_eq!(config.total_items, 10);
        assert_eq!(config.precision, 2);
        assert_eq!(config.window, Duration::from_secs(5));
    }
}
