//! Optional date/time formatting.

use std::fmt::Display;

use chrono::format::{DelayedFormat, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

/// Anything chrono can render with a strftime layout.
pub trait FormatWith {
    /// Render with a strftime `layout`.
    fn format_with<'a>(&self, layout: &'a str) -> DelayedFormat<StrftimeItems<'a>>;
}

impl FormatWith for NaiveDateTime {
    fn format_with<'a>(&self, layout: &'a str) -> DelayedFormat<StrftimeItems<'a>> {
        self.format(layout)
    }
}

impl FormatWith for NaiveDate {
    fn format_with<'a>(&self, layout: &'a str) -> DelayedFormat<StrftimeItems<'a>> {
        self.format(layout)
    }
}

impl<Tz> FormatWith for DateTime<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    fn format_with<'a>(&self, layout: &'a str) -> DelayedFormat<StrftimeItems<'a>> {
        self.format(layout)
    }
}

/// Format an optional value; `None` in, `None` out.
pub fn format_opt<T: FormatWith>(value: Option<&T>, layout: &str) -> Option<String> {
    value.map(|v| v.format_with(layout).to_string())
}
