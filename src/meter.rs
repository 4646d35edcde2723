//! Line throughput meter.
//!
//! Reads newline-delimited input on a background task, pushes one sample per
//! line into a [`MovingAverage`], and redraws a status line on a fixed
//! interval. Input can optionally be passed through unchanged.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{ensure, Context, Result};
use sundry_ext::pluralize_s;
use sundry_window::{format_count, format_rate, MovingAverage};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::settings::MeterSettings;

/// Lines buffered between the reader task and the meter loop.
const CHANNEL_CAPACITY: usize = 1024;

/// Totals for a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub lines: u64,
    pub elapsed: Duration,
    /// Lines per second over the whole run.
    pub overall_rate: f64,
    pub precision: u32,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} in {:.1}s ({}/sec)",
            format_count(self.lines),
            pluralize_s(self.lines, "line"),
            self.elapsed.as_secs_f64(),
            format_rate(self.overall_rate, self.precision)
        )
    }
}

/// Meters lines from an async reader.
///
/// ```
/// use sundry::meter::Meter;
/// use sundry::settings::MeterSettings;
///
/// # tokio_test::block_on(async {
/// let meter = Meter::new(MeterSettings { quiet: true, ..Default::default() }).unwrap();
/// let summary = meter
///     .run(&b"alpha\nbeta\n"[..], tokio::io::sink(), tokio::io::sink())
///     .await
///     .unwrap();
/// assert_eq!(summary.lines, 2);
/// # });
/// ```
pub struct Meter {
    settings: MeterSettings,
    average: Arc<MovingAverage>,
}

impl Meter {
    /// Build a meter, validating the averaging settings.
    pub fn new(settings: MeterSettings) -> Result<Self> {
        ensure!(
            !settings.refresh.is_zero(),
            "refresh interval must be greater than zero"
        );
        let average = MovingAverage::builder()
            .config(settings.moving_average_config())
            .build()
            .context("invalid meter settings")?;
        Ok(Self {
            settings,
            average: Arc::new(average),
        })
    }

    /// Shared handle to the underlying estimator.
    pub fn average(&self) -> Arc<MovingAverage> {
        Arc::clone(&self.average)
    }

    /// The status line shown while running.
    pub fn status_line(&self) -> String {
        let pushed = self.average.pushed();
        if self.settings.total > 0 {
            self.average.status_with_progress(pushed, self.settings.total)
        } else {
            format!(
                "{}/sec, {} {}",
                format_rate(self.average.current_rate(), self.settings.precision),
                format_count(pushed),
                pluralize_s(pushed, "line")
            )
        }
    }

    /// Consume `input` to the end.
    ///
    /// Lines are copied to `output` when passthrough is on. Status lines go
    /// to `status` every refresh interval unless quiet, followed by the
    /// final summary.
    pub async fn run<R, W, S>(&self, input: R, mut output: W, mut status: S) -> Result<Summary>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin,
        S: AsyncWrite + Unpin,
    {
        let (tx, mut rx) = mpsc::channel::<Vec<u8>>(CHANNEL_CAPACITY);

        let reader = tokio::spawn(async move {
            let mut reader = BufReader::new(input);
            loop {
                let mut line = Vec::new();
                match reader.read_until(b'\n', &mut line).await {
                    Ok(0) => {
                        debug!("Input closed");
                        return Ok(());
                    }
                    Ok(_) => {
                        if tx.send(line).await.is_err() {
                            // Meter loop stopped
                            return Ok(());
                        }
                    }
                    Err(e) => return Err(e),
                }
            }
        });

        let started = Instant::now();
        self.average.start();
        info!(
            total = self.settings.total,
            window = ?self.settings.window,
            "Meter started"
        );

        let mut ticker = tokio::time::interval(self.settings.refresh);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut drew_status = false;

        loop {
            tokio::select! {
                line = rx.recv() => {
                    let Some(line) = line else { break };
                    self.average.push();
                    if self.settings.passthrough {
                        output.write_all(&line).await.context("failed to write output")?;
                    }
                }
                _ = ticker.tick() => {
                    if !self.settings.quiet {
                        let text = format!("\r{}", self.status_line());
                        status.write_all(text.as_bytes()).await?;
                        status.flush().await?;
                        drew_status = true;
                    }
                }
            }
        }

        if !self.settings.quiet {
            status
                .write_all(format!("\r{}", self.status_line()).as_bytes())
                .await?;
            drew_status = true;
        }

        output.flush().await?;
        reader
            .await
            .context("reader task failed")?
            .context("failed to read input")?;

        let summary = Summary {
            lines: self.average.pushed(),
            elapsed: started.elapsed(),
            overall_rate: self.average.overall_rate(),
            precision: self.settings.precision,
        };
        info!(lines = summary.lines, elapsed = ?summary.elapsed, "Meter finished");

        let prefix = if drew_status { "\n" } else { "" };
        status
            .write_all(format!("{prefix}{summary}\n").as_bytes())
            .await?;
        status.flush().await?;

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> MeterSettings {
        MeterSettings {
            refresh: Duration::from_secs(3600),
            quiet: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn counts_lines() {
        let meter = Meter::new(settings()).unwrap();
        let mut out = Vec::new();
        let mut status = Vec::new();

        let summary = meter
            .run(&b"a\nb\nc\n"[..], &mut out, &mut status)
            .await
            .unwrap();

        assert_eq!(summary.lines, 3);
        assert!(out.is_empty());
        let status = String::from_utf8(status).unwrap();
        assert!(status.starts_with("3 lines in "), "{status}");
    }

    #[tokio::test]
    async fn last_line_without_newline_counts() {
        let meter = Meter::new(settings()).unwrap();
        let summary = meter
            .run(&b"one\ntwo"[..], tokio::io::sink(), tokio::io::sink())
            .await
            .unwrap();
        assert_eq!(summary.lines, 2);
    }

    #[tokio::test]
    async fn passthrough_copies_input() {
        let meter = Meter::new(MeterSettings {
            passthrough: true,
            ..settings()
        })
        .unwrap();
        let mut out = Vec::new();

        meter
            .run(
                std::io::Cursor::new(b"x\n\xffy\n".to_vec()),
                &mut out,
                tokio::io::sink(),
            )
            .await
            .unwrap();

        assert_eq!(out, b"x\n\xffy\n");
    }

    #[tokio::test]
    async fn empty_input() {
        let meter = Meter::new(settings()).unwrap();
        let mut status = Vec::new();
        let summary = meter
            .run(tokio::io::empty(), tokio::io::sink(), &mut status)
            .await
            .unwrap();
        assert_eq!(summary.lines, 0);
        assert!(String::from_utf8(status).unwrap().starts_with("0 lines"));
    }

    #[tokio::test]
    async fn status_line_is_drawn_when_not_quiet() {
        let meter = Meter::new(MeterSettings {
            total: 10,
            quiet: false,
            ..settings()
        })
        .unwrap();
        let mut status = Vec::new();

        meter
            .run(&b"1\n2\n"[..], tokio::io::sink(), &mut status)
            .await
            .unwrap();

        let status = String::from_utf8(status).unwrap();
        assert!(status.starts_with('\r'), "{status}");
        assert!(status.contains("of 10)"), "{status}");
        assert!(status.contains("\n2 lines in "), "{status}");
    }

    #[test]
    fn status_line_without_total() {
        let meter = Meter::new(settings()).unwrap();
        meter.average().push_many(1);
        assert!(meter.status_line().ends_with("/sec, 1 line"));
    }

    #[test]
    fn rejects_zero_window() {
        let result = Meter::new(MeterSettings {
            window: Duration::ZERO,
            ..settings()
        });
        assert!(result.is_err());
    }

    #[test]
    fn rejects_zero_refresh() {
        let result = Meter::new(MeterSettings {
            refresh: Duration::ZERO,
            ..settings()
        });
        let err = result.err().unwrap();
        assert!(err.to_string().contains("refresh"), "{err}");
    }

    #[test]
    fn summary_display() {
        let summary = Summary {
            lines: 12_345,
            elapsed: Duration::from_millis(2_500),
            overall_rate: 4938.0,
            precision: 1,
        };
        assert_eq!(summary.to_string(), "12,345 lines in 2.5s (4,938.0/sec)");
    }
}
