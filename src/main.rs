use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use sundry::meter::Meter;
use sundry::settings::MeterSettings;
use sundry::window::parse_duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sundry-meter")]
#[command(about = "Measure the line throughput of a pipe or file")]
struct Args {
    /// File to read (stdin when omitted)
    file: Option<PathBuf>,

    /// Settings file (TOML, JSON, YAML); SUNDRY_* environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Expected number of lines, enables the ETA
    #[arg(short, long)]
    total: Option<u64>,

    /// Averaging window (e.g., "30s", "2m")
    #[arg(short, long, value_parser = parse_duration_arg)]
    window: Option<Duration>,

    /// Status refresh interval (e.g., "1s", "250ms")
    #[arg(short, long, value_parser = parse_duration_arg)]
    refresh: Option<Duration>,

    /// Decimal places shown for rates
    #[arg(long)]
    precision: Option<u32>,

    /// Copy input lines to stdout
    #[arg(short, long)]
    passthrough: bool,

    /// Only print the final summary
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// Command-line flags win over file and environment settings.
    fn apply(&self, settings: &mut MeterSettings) {
        if let Some(total) = self.total {
            settings.total = total;
        }
        if let Some(window) = self.window {
            settings.window = window;
        }
        if let Some(refresh) = self.refresh {
            settings.refresh = refresh;
        }
        if let Some(precision) = self.precision {
            settings.precision = precision;
        }
        settings.passthrough |= self.passthrough;
        settings.quiet |= self.quiet;
    }
}

fn parse_duration_arg(s: &str) -> Result<Duration, String> {
    parse_duration(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut settings = MeterSettings::load(args.config.as_deref())
        .with_context(|| match &args.config {
            Some(path) => format!("failed to load settings from {}", path.display()),
            None => "failed to load settings from the environment".to_string(),
        })?;
    args.apply(&mut settings);

    let meter = Meter::new(settings)?;
    let stdout = tokio::io::stdout();
    let stderr = tokio::io::stderr();

    match &args.file {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            meter.run(file, stdout, stderr).await?;
        }
        None => {
            meter.run(tokio::io::stdin(), stdout, stderr).await?;
        }
    }

    Ok(())
}
