//! Moving-average throughput and time-remaining estimation.
//!
//! Samples are timestamped as they are pushed and kept in a queue. Every read
//! first culls samples older than the window, then derives the rate from what
//! is left. Until the first cull the rate is measured against the time since
//! the first sample, so a fresh estimator reports sensible numbers before a
//! full window has elapsed.

use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use parking_lot::Mutex;

use crate::error::WindowError;
use crate::format::{format_count, format_rate, format_remaining};

/// Largest supported rounding precision (decimal places).
pub const MAX_PRECISION: u32 = 15;

/// Default averaging window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Default rounding precision.
pub const DEFAULT_PRECISION: u32 = 1;

const COMPLETION_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Clocks
// ============================================================================

/// Source of monotonic time for timestamping samples.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the estimator.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Create a clock frozen at the current instant.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a clock frozen at `instant`.
    pub fn starting_at(instant: Instant) -> Self {
        Self {
            now: Arc::new(Mutex::new(instant)),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

// ============================================================================
// Configuration and results
// ============================================================================

/// Settings for a [`MovingAverage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovingAverageConfig {
    /// Number of items the whole job will process (0 when unknown).
    pub total_items: u64,
    /// Decimal places kept when rounding rates.
    pub precision: u32,
    /// Length of the trailing averaging window.
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_duration"))]
    pub window: Duration,
}

impl Default for MovingAverageConfig {
    fn default() -> Self {
        Self {
            total_items: 0,
            precision: DEFAULT_PRECISION,
            window: DEFAULT_WINDOW,
        }
    }
}

impl MovingAverageConfig {
    /// Check the window is non-zero and the precision is representable.
    pub fn validate(&self) -> Result<(), WindowError> {
        if self.window.is_zero() {
            return Err(WindowError::ZeroWindow);
        }
        if self.precision > MAX_PRECISION {
            return Err(WindowError::PrecisionTooLarge {
                precision: self.precision,
                max: MAX_PRECISION,
            });
        }
        Ok(())
    }
}

/// Estimated time remaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Eta {
    Finite(Duration),
    /// No progress is being made, so no estimate exists.
    Infinite,
}

impl Eta {
    /// The remaining duration, `None` when infinite.
    pub fn as_duration(self) -> Option<Duration> {
        match self {
            Eta::Finite(d) => Some(d),
            Eta::Infinite => None,
        }
    }

    pub fn is_infinite(self) -> bool {
        matches!(self, Eta::Infinite)
    }
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_remaining(*self))
    }
}

/// Point-in-time view of a moving average.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Status {
    /// Items per second over the current window.
    pub rate: f64,
    pub remaining: Eta,
    /// Wall-clock completion estimate; `None` while the rate is zero.
    pub estimated_completion: Option<DateTime<Local>>,
    /// Decimal places used when rendering `rate`.
    pub precision: u32,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let completion = self
            .estimated_completion
            .map(|ts| ts.format(COMPLETION_FORMAT).to_string())
            .unwrap_or_default();
        write!(
            f,
            "{}/sec, {} remaining.  Completion time: {}",
            format_rate(self.rate, self.precision),
            format_remaining(self.remaining),
            completion
        )
    }
}

/// Object-safe surface shared by throughput estimators.
pub trait Throughput: Send + Sync {
    /// Restart the clock used by [`Throughput::overall_rate`].
    fn start(&self);
    /// Record one item.
    fn push(&self);
    /// Record `count` items at one instant.
    fn push_many(&self, count: u64);
    /// Items per second over the trailing window.
    fn current_rate(&self) -> f64;
    fn time_remaining(&self) -> Eta;
    /// Items per second since the last start or reset.
    fn overall_rate(&self) -> f64;
    fn status(&self) -> Status;
    /// Drop every sample and counter, keeping the configuration.
    fn reset(&self);
}

// ============================================================================
// Internal state
// ============================================================================

#[derive(Debug)]
struct State<T> {
    samples: VecDeque<(Instant, T)>,
    pushed: u64,
    started: Instant,
    config: MovingAverageConfig,
    previous_run_offset: u64,
}

impl<T> State<T> {
    fn new(config: MovingAverageConfig, previous_run_offset: u64, now: Instant) -> Self {
        Self {
            samples: VecDeque::new(),
            pushed: 0,
            started: now,
            config,
            previous_run_offset,
        }
    }

    /// Drop every sample strictly older than `now - window`.
    fn cull(&mut self, now: Instant) {
        let Some(cutoff) = now.checked_sub(self.config.window) else {
            return;
        };
        while matches!(self.samples.front(), Some((ts, _)) if *ts < cutoff) {
            self.samples.pop_front();
        }
    }

    fn rate(&mut self, now: Instant) -> f64 {
        self.cull(now);
        let Some((first, _)) = self.samples.front() else {
            return 0.0;
        };

        // Nothing culled yet: we are still inside the first window.
        let elapsed = if self.samples.len() as u64 == self.pushed {
            now.saturating_duration_since(*first)
        } else {
            self.config.window
        };

        let secs = elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        round_to(self.samples.len() as f64 / secs, self.config.precision)
    }

    fn remaining(&mut self, now: Instant) -> Eta {
        if self.config.total_items < 1 {
            return Eta::Finite(Duration::ZERO);
        }

        let rate = self.rate(now);
        if rate == 0.0 {
            return Eta::Infinite;
        }

        let left = self.config.total_items as f64
            - self.pushed as f64
            - self.previous_run_offset as f64;
        let secs = (left / rate).max(0.0);
        Eta::Finite(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
    }

    fn overall_rate(&self, now: Instant) -> f64 {
        let secs = now.saturating_duration_since(self.started).as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        round_to(self.pushed as f64 / secs, self.config.precision)
    }

    fn status(&mut self, now: Instant) -> Status {
        let rate = self.rate(now);
        let remaining = self.remaining(now);
        Status {
            rate,
            remaining,
            estimated_completion: completion_time(rate, remaining),
            precision: self.config.precision,
        }
    }

    fn push_at(&mut self, now: Instant, item: T) {
        self.samples.push_back((now, item));
        self.pushed += 1;
    }

    fn reset(&mut self, now: Instant) {
        self.samples.clear();
        self.pushed = 0;
        self.started = now;
    }
}

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

fn completion_time(rate: f64, remaining: Eta) -> Option<DateTime<Local>> {
    if rate == 0.0 {
        return None;
    }
    let remaining = chrono::Duration::from_std(remaining.as_duration()?).ok()?;
    Local::now().checked_add_signed(remaining)
}

// ============================================================================
// MovingAverage
// ============================================================================

/// Thread-safe moving-average estimator.
///
/// `T` is an optional payload stored with each timestamp; the default `()`
/// only counts. All methods take `&self` and lock once, so an estimator can
/// be shared behind an `Arc` between a producer and any number of readers.
///
/// ```rust
/// use sundry_window::{Eta, ManualClock, MovingAverage};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let ma: MovingAverage = MovingAverage::builder()
///     .total_items(100)
///     .clock(clock.clone())
///     .build()
///     .unwrap();
///
/// ma.push_many(10);
/// clock.advance(Duration::from_secs(5));
///
/// assert_eq!(ma.current_rate(), 2.0);
/// assert_eq!(ma.time_remaining(), Eta::Finite(Duration::from_secs(45)));
/// ```
#[derive(Debug)]
pub struct MovingAverage<T = ()> {
    clock: Arc<dyn Clock>,
    state: Mutex<State<T>>,
}

impl<T> MovingAverage<T> {
    /// Create an estimator with a 60 second window and a precision of 1.
    pub fn new(total_items: u64) -> Self {
        Self::with_precision(total_items, DEFAULT_PRECISION)
    }

    /// Create an estimator with a 60 second window.
    ///
    /// Precision above [`MAX_PRECISION`] is clamped.
    pub fn with_precision(total_items: u64, precision: u32) -> Self {
        let config = MovingAverageConfig {
            total_items,
            precision: precision.min(MAX_PRECISION),
            window: DEFAULT_WINDOW,
        };
        Self::from_parts(config, Arc::new(SystemClock), 0)
    }

    /// Create a builder for full control over window, clock and offset.
    pub fn builder() -> MovingAverageBuilder<T> {
        MovingAverageBuilder::new()
    }

    fn from_parts(config: MovingAverageConfig, clock: Arc<dyn Clock>, offset: u64) -> Self {
        let now = clock.now();
        Self {
            clock,
            state: Mutex::new(State::new(config, offset, now)),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> MovingAverageConfig {
        self.state.lock().config
    }

    /// Restart the clock used by [`MovingAverage::overall_rate`].
    pub fn start(&self) {
        let now = self.clock.now();
        self.state.lock().started = now;
    }

    /// Record one item.
    pub fn push_item(&self, item: T) {
        let now = self.clock.now();
        self.state.lock().push_at(now, item);
    }

    /// Record several items sharing one timestamp.
    pub fn push_items<I: IntoIterator<Item = T>>(&self, items: I) {
        let now = self.clock.now();
        let mut state = self.state.lock();
        for item in items {
            state.push_at(now, item);
        }
    }

    /// Items per second over the trailing window, rounded to the precision.
    ///
    /// Zero when the window is empty.
    pub fn current_rate(&self) -> f64 {
        let now = self.clock.now();
        self.state.lock().rate(now)
    }

    /// Time until `total_items` have been pushed at the current rate.
    ///
    /// Zero when no total is set, [`Eta::Infinite`] while the rate is zero.
    pub fn time_remaining(&self) -> Eta {
        let now = self.clock.now();
        self.state.lock().remaining(now)
    }

    /// Wall-clock completion estimate, `None` while the rate is zero.
    pub fn estimated_completion(&self) -> Option<DateTime<Local>> {
        self.status().estimated_completion
    }

    /// [`MovingAverage::time_remaining`] formatted for display.
    pub fn remaining_display(&self) -> String {
        format_remaining(self.time_remaining())
    }

    /// Snapshot of rate, remaining time and completion estimate.
    pub fn status(&self) -> Status {
        let now = self.clock.now();
        self.state.lock().status(now)
    }

    /// Status line followed by `(current of total)`.
    pub fn status_with_progress(&self, current: u64, total: u64) -> String {
        format!(
            "{} ({} of {})",
            self.status(),
            format_count(current),
            format_count(total)
        )
    }

    /// Items per second since the last start or reset.
    pub fn overall_rate(&self) -> f64 {
        let now = self.clock.now();
        self.state.lock().overall_rate(now)
    }

    /// Timestamps in the current window, oldest first.
    pub fn current_times(&self) -> Vec<Instant> {
        let now = self.clock.now();
        let mut state = self.state.lock();
        state.cull(now);
        state.samples.iter().map(|(ts, _)| *ts).collect()
    }

    /// Items pushed before this run that count toward the total.
    pub fn previous_run_offset(&self) -> u64 {
        self.state.lock().previous_run_offset
    }

    pub fn set_previous_run_offset(&self, offset: u64) {
        self.state.lock().previous_run_offset = offset;
    }

    /// Items pushed since creation or the last reset.
    pub fn pushed(&self) -> u64 {
        self.state.lock().pushed
    }

    /// Drop every sample and counter and restart the clock.
    pub fn reset(&self) {
        let now = self.clock.now();
        self.state.lock().reset(now);
    }

    /// Reset with a new item total.
    pub fn reset_total(&self, total_items: u64) {
        let now = self.clock.now();
        let mut state = self.state.lock();
        state.config.total_items = total_items;
        state.reset(now);
    }

    /// Reset with an entirely new configuration.
    pub fn reconfigure(&self, config: MovingAverageConfig) -> Result<(), WindowError> {
        config.validate()?;
        let now = self.clock.now();
        let mut state = self.state.lock();
        state.config = config;
        state.reset(now);
        Ok(())
    }
}

impl<T: Clone> MovingAverage<T> {
    /// Record `count` copies of `item` sharing one timestamp.
    pub fn push_repeated(&self, item: T, count: u64) {
        let now = self.clock.now();
        let mut state = self.state.lock();
        for _ in 0..count {
            state.push_at(now, item.clone());
        }
    }

    /// Items in the current window, oldest first.
    pub fn current_items(&self) -> Vec<T> {
        let now = self.clock.now();
        let mut state = self.state.lock();
        state.cull(now);
        state.samples.iter().map(|(_, item)| item.clone()).collect()
    }
}

impl<T: Default> MovingAverage<T> {
    /// Record one default item.
    pub fn push(&self) {
        self.push_item(T::default());
    }
}

impl<T: Default + Clone> MovingAverage<T> {
    /// Record `count` default items sharing one timestamp.
    pub fn push_many(&self, count: u64) {
        self.push_repeated(T::default(), count);
    }
}

impl<T: Default + Clone + Send> Throughput for MovingAverage<T> {
    fn start(&self) {
        MovingAverage::start(self)
    }

    fn push(&self) {
        MovingAverage::push(self)
    }

    fn push_many(&self, count: u64) {
        MovingAverage::push_many(self, count)
    }

    fn current_rate(&self) -> f64 {
        MovingAverage::current_rate(self)
    }

    fn time_remaining(&self) -> Eta {
        MovingAverage::time_remaining(self)
    }

    fn overall_rate(&self) -> f64 {
        MovingAverage::overall_rate(self)
    }

    fn status(&self) -> Status {
        MovingAverage::status(self)
    }

    fn reset(&self) {
        MovingAverage::reset(self)
    }
}

/// Builder for configuring a [`MovingAverage`].
#[derive(Debug)]
pub struct MovingAverageBuilder<T = ()> {
    config: MovingAverageConfig,
    clock: Arc<dyn Clock>,
    previous_run_offset: u64,
    _items: PhantomData<fn() -> T>,
}

impl<T> Default for MovingAverageBuilder<T> {
    fn default() -> Self {
        Self {
            config: MovingAverageConfig::default(),
            clock: Arc::new(SystemClock),
            previous_run_offset: 0,
            _items: PhantomData,
        }
    }
}

impl<T> MovingAverageBuilder<T> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: MovingAverageConfig) -> Self {
        self.config = config;
        self
    }

    pub fn total_items(mut self, total_items: u64) -> Self {
        self.config.total_items = total_items;
        self
    }

    /// Set the rounding precision.
    ///
    /// Defaults to 1 decimal place if not specified.
    pub fn precision(mut self, precision: u32) -> Self {
        self.config.precision = precision;
        self
    }

    /// Set the averaging window.
    ///
    /// Defaults to 60 seconds if not specified.
    pub fn window(mut self, window: Duration) -> Self {
        self.config.window = window;
        self
    }

    /// Use a custom clock.
    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Items completed by a previous run that count toward the total.
    pub fn previous_run_offset(mut self, offset: u64) -> Self {
        self.previous_run_offset = offset;
        self
    }

    /// Build the estimator, validating the configuration.
    pub fn build(self) -> Result<MovingAverage<T>, WindowError> {
        self.config.validate()?;
        Ok(MovingAverage::from_parts(
            self.config,
            self.clock,
            self.previous_run_offset,
        ))
    }
}
