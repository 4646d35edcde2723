//! Logs how long a scope took.

use std::time::{Duration, Instant};

use sundry_ext::with_thousands;
use tracing::Level;

/// Measures the enclosing block and logs the elapsed time when it ends.
///
/// ```rust
/// use sundry_scoped::BlockTimer;
///
/// {
///     let _timer = BlockTimer::start("load config");
///     // ... work ...
/// } // logs: Timer 'load config' ran in '0 milliseconds'
/// ```
#[derive(Debug)]
pub struct BlockTimer {
    name: String,
    started: Instant,
    level: Option<Level>,
    done: bool,
}

impl BlockTimer {
    /// Start timing; the result is logged at `INFO`.
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started: Instant::now(),
            level: Some(Level::INFO),
            done: false,
        }
    }

    /// Start timing without logging anything.
    pub fn silent(name: impl Into<String>) -> Self {
        let mut timer = Self::start(name);
        timer.level = None;
        timer
    }

    /// Log at `level` instead of `INFO`.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Stop, log, and return the elapsed time.
    pub fn finish(mut self) -> Duration {
        let elapsed = self.elapsed();
        self.report(elapsed);
        self.done = true;
        elapsed
    }

    fn report(&self, elapsed: Duration) {
        let Some(level) = self.level else {
            return;
        };
        let ms = with_thousands(elapsed.as_millis());
        let name = self.name.as_str();
        let elapsed_ms = elapsed.as_millis() as u64;

        if level == Level::ERROR {
            tracing::error!(timer = name, elapsed_ms, "Timer '{name}' ran in '{ms} milliseconds'");
        } else if level == Level::WARN {
            tracing::warn!(timer = name, elapsed_ms, "Timer '{name}' ran in '{ms} milliseconds'");
        } else if level == Level::INFO {
            tracing::info!(timer = name, elapsed_ms, "Timer '{name}' ran in '{ms} milliseconds'");
        } else if level == Level::DEBUG {
            tracing::debug!(timer = name, elapsed_ms, "Timer '{name}' ran in '{ms} milliseconds'");
        } else {
            tracing::trace!(timer = name, elapsed_ms, "Timer '{name}' ran in '{ms} milliseconds'");
        }
    }
}

impl Drop for BlockTimer {
    fn drop(&mut self) {
        if !self.done {
            self.report(self.elapsed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` with a subscriber recording every level, returning the output.
    fn capture_logs(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(Level::TRACE)
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn measures_elapsed_time() {
        let timer = BlockTimer::start("sleep");
        std::thread::sleep(Duration::from_millis(20));
        assert!(timer.elapsed() >= Duration::from_millis(20));
        assert_eq!(timer.name(), "sleep");

        let total = timer.finish();
        assert!(total >= Duration::from_millis(20));
    }

    #[test]
    fn silent_timer_still_measures() {
        let timer = BlockTimer::silent("quiet");
        assert!(timer.level.is_none());
        assert!(timer.finish() < Duration::from_secs(60));
    }

    #[test]
    fn level_can_be_changed() {
        let timer = BlockTimer::start("x").with_level(Level::DEBUG);
        assert_eq!(timer.level, Some(Level::DEBUG));
    }

    #[test]
    fn logs_message_at_info_on_drop() {
        let logs = capture_logs(|| {
            let _timer = BlockTimer::start("load config");
        });
        let lines: Vec<&str> = logs.lines().collect();
        assert_eq!(lines.len(), 1, "{logs}");
        assert!(lines[0].trim_start().starts_with("INFO"), "{logs}");
        assert!(lines[0].contains("Timer 'load config' ran in '"), "{logs}");
        assert!(lines[0].contains(" milliseconds'"), "{logs}");
    }

    #[test]
    fn logs_at_configured_level_once() {
        let logs = capture_logs(|| {
            let timer = BlockTimer::start("query").with_level(Level::DEBUG);
            timer.finish();
        });
        let lines: Vec<&str> = logs.lines().collect();
        assert_eq!(lines.len(), 1, "{logs}");
        assert!(lines[0].trim_start().starts_with("DEBUG"), "{logs}");
        assert!(lines[0].contains("Timer 'query' ran in '"), "{logs}");
    }

    #[test]
    fn silent_timer_logs_nothing() {
        let logs = capture_logs(|| {
            let _timer = BlockTimer::silent("hidden");
        });
        assert!(logs.is_empty(), "{logs}");
    }

    #[test]
    fn message_uses_thousands_separators() {
        let timer = BlockTimer {
            name: "batch".to_string(),
            started: Instant::now(),
            level: Some(Level::WARN),
            done: true,
        };
        let logs = capture_logs(|| timer.report(Duration::from_millis(1_234_567)));
        assert!(logs.trim_start().starts_with("WARN"), "{logs}");
        assert!(
            logs.contains("Timer 'batch' ran in '1,234,567 milliseconds'"),
            "{logs}"
        );
    }
}
