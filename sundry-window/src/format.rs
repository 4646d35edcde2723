//! Human-readable rates, counts and durations.

use std::time::Duration;

use sundry_ext::{group_digits, pluralize, with_thousands, Case, StrExt};

use crate::error::WindowError;
use crate::moving_average::Eta;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// Pretty-print a time remaining.
///
/// The layout shrinks with the duration: `d.hh:mm:ss`, `hh:mm:ss`, `mm:ss`,
/// then `ss seconds`. One leading zero is dropped, so five seconds prints as
/// `5 seconds` and an hour and two minutes as `1:02:00`.
pub fn format_remaining(eta: Eta) -> String {
    let Eta::Finite(remaining) = eta else {
        return "unknown".to_string();
    };

    let total = remaining.as_secs();
    let days = total / SECS_PER_DAY;
    let hours = (total % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total % SECS_PER_MINUTE;

    let text = if total >= SECS_PER_DAY {
        format!("{days:02}.{hours:02}:{minutes:02}:{seconds:02}")
    } else if total >= SECS_PER_HOUR {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else if total >= SECS_PER_MINUTE {
        format!("{minutes:02}:{seconds:02}")
    } else {
        format!("{seconds:02} {}", pluralize(total, "second", "s", ""))
    };

    text.ensure_no_prefix("0", Case::Sensitive)
}

/// Format a rate with `precision` decimals and thousands separators.
pub fn format_rate(rate: f64, precision: u32) -> String {
    let fixed = format!("{:.*}", precision as usize, rate);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };

    let mut out = String::with_capacity(fixed.len() + whole.len() / 3);
    out.push_str(sign);
    out.push_str(&group_digits(whole));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Format an integer with thousands separators.
pub fn format_count(n: u64) -> String {
    with_thousands(n)
}

/// Suffix to nanoseconds multiplier (order matters: longer suffixes first)
const UNITS: &[(&str, f64)] = &[
    ("ns", 1.0),
    ("µs", 1_000.0),
    ("us", 1_000.0),
    ("ms", 1_000_000.0),
    ("s", 1_000_000_000.0),
    ("m", 60_000_000_000.0),
    ("h", 3_600_000_000_000.0),
];

/// Parse duration strings like "90s", "250ms", "1.5m", "2h"
pub fn parse_duration(s: &str) -> Result<Duration, WindowError> {
    let s = s.trim();
    let invalid = |reason: &str| WindowError::InvalidDuration {
        input: s.to_string(),
        reason: reason.to_string(),
    };

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str
                .trim()
                .parse()
                .map_err(|e: std::num::ParseFloatError| invalid(&e.to_string()))?;
            if !val.is_finite() || val < 0.0 {
                return Err(invalid("must be a finite, non-negative number"));
            }
            let nanos = val * multiplier;
            if nanos >= u64::MAX as f64 {
                return Err(invalid("too large"));
            }
            return Ok(Duration::from_nanos(nanos as u64));
        }
    }

    Err(invalid("expected one of ns, us, ms, s, m, h"))
}

/// Format a duration with the largest unit that represents it exactly
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }

    const NANOS_PER_SEC: u128 = 1_000_000_000;
    let steps: [(u128, &str); 5] = [
        (NANOS_PER_SEC * 3600, "h"),
        (NANOS_PER_SEC * 60, "m"),
        (NANOS_PER_SEC, "s"),
        (1_000_000, "ms"),
        (1_000, "µs"),
    ];
    for (size, suffix) in steps {
        if nanos % size == 0 {
            return format!("{}{}", nanos / size, suffix);
        }
    }
    format!("{}ns", nanos)
}
