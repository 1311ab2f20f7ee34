//! Formatters turning raw data-space values into axis-label and readout text.
//!
//! The engine never formats by itself; every instance carries one
//! [`ValueFormatter`] per axis. `Auto` is the default for both axes; the x
//! formatter is usually derived from the configured [`XAlignment`].

use std::fmt;
use std::rc::Rc;

use chrono::{Datelike, TimeZone, Timelike};

use crate::config::XAlignment;

/// The unit raw epoch values are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EpochUnit {
    #[default]
    Seconds,
    Milliseconds,
}

impl EpochUnit {
    pub fn units_per_second(&self) -> f64 {
        match self {
            EpochUnit::Seconds => 1.0,
            EpochUnit::Milliseconds => 1_000.0,
        }
    }
}

/// Wall-clock formatter for epoch-based x values.
///
/// The date is only shown when `domain` spans more than one calendar day (or
/// `force_date_visible` is set); milliseconds are shown when the domain is
/// shorter than `milliseconds_threshold` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeFormatter {
    pub epoch_unit: EpochUnit,
    pub force_date_visible: bool,
    /// Domain span (seconds) below which milliseconds are appended.
    pub milliseconds_threshold: f64,
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self {
            epoch_unit: EpochUnit::Seconds,
            force_date_visible: false,
            milliseconds_threshold: 60.0,
        }
    }
}

impl TimeFormatter {
    pub fn for_epoch_unit(epoch_unit: EpochUnit) -> Self {
        Self {
            epoch_unit,
            ..Self::default()
        }
    }

    pub fn format(&self, value: f64, domain: (f64, f64)) -> String {
        let ups = self.epoch_unit.units_per_second();
        let (lo, hi) = if domain.0 <= domain.1 {
            (domain.0 / ups, domain.1 / ups)
        } else {
            (domain.1 / ups, domain.0 / ups)
        };
        let at = secs_to_local(value / ups);
        let start = secs_to_local(lo);
        let end = secs_to_local(hi);

        let show_date = self.force_date_visible || start.date_naive() != end.date_naive();
        let mut out = if show_date && start.year() != end.year() {
            at.format("%Y-%m-%d %H:%M:%S").to_string()
        } else if show_date {
            at.format("%m-%d %H:%M:%S").to_string()
        } else {
            at.format("%H:%M:%S").to_string()
        };
        if hi - lo < self.milliseconds_threshold {
            out.push_str(&format!(".{:03}", at.nanosecond() / 1_000_000));
        }
        out
    }
}

/// Seconds since the epoch → local time. Non-finite and out-of-range values
/// fall back to the epoch itself.
fn secs_to_local(secs: f64) -> chrono::DateTime<chrono::Local> {
    let epoch = chrono::DateTime::<chrono::Utc>::default();
    if !secs.is_finite() {
        return epoch.with_timezone(&chrono::Local);
    }
    let whole = secs.floor();
    let nanos = (((secs - whole) * 1e9).round() as u32).min(999_999_999);
    chrono::Utc
        .timestamp_opt(whole as i64, nanos)
        .single()
        .unwrap_or(epoch)
        .with_timezone(&chrono::Local)
}

/// Fixed decimal notation with an optional unit suffix.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecimalFormatter {
    pub decimal_places: Option<usize>,
    pub unit: Option<String>,
}

impl DecimalFormatter {
    pub fn format(&self, value: f64, fallback_places: usize) -> String {
        let places = self.decimal_places.unwrap_or(fallback_places).min(MAX_PRECISION);
        with_unit(format!("{:.*}", places, value), self.unit.as_deref())
    }
}

/// Compact scientific notation (`1.23e5`, `-4.00e-2`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScientificFormatter {
    pub digits: Option<usize>,
    pub unit: Option<String>,
}

impl ScientificFormatter {
    pub fn format(&self, value: f64, fallback_digits: usize) -> String {
        let digits = self.digits.unwrap_or(fallback_digits).min(MAX_PRECISION);
        with_unit(format_scientific(value, digits), self.unit.as_deref())
    }
}

fn format_scientific(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return format!("{:.*}", digits, 0.0_f64);
    }
    if !value.is_finite() {
        return format!("{}", value);
    }
    let exp = value.abs().log10().floor() as i32;
    let mantissa = value / 10f64.powi(exp);
    if exp == 0 {
        format!("{:.*}", digits, mantissa)
    } else {
        format!("{:.*}e{}", digits, mantissa, exp)
    }
}

/// Most decimal places any formatter emits; f64 carries no more.
pub const MAX_PRECISION: usize = 17;

fn with_unit(s: String, unit: Option<&str>) -> String {
    match unit {
        Some(u) => format!("{} {}", s, u),
        None => s,
    }
}

/// `Auto` number formatting: integers verbatim, fractions rounded to
/// `precision` places with trailing zeros trimmed, very large or very small
/// magnitudes in scientific notation. Zero is always `"0"`.
pub fn format_auto(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return format!("{}", value);
    }
    let precision = precision.min(MAX_PRECISION);
    let magnitude = value.abs();
    if magnitude >= 1e12 || magnitude < 10f64.powi(-(precision as i32)) {
        return format_scientific(value, precision.min(3));
    }
    if value.fract() == 0.0 {
        return format!("{}", value as i64);
    }
    let s = format!("{:.*}", precision, value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Seconds → `HH:MM:SS`, prefixed with `Nd ` once past a day.
pub fn format_relative_time(seconds: f64) -> String {
    if !seconds.is_finite() {
        return format!("{}", seconds);
    }
    let sign = if seconds < 0.0 { "-" } else { "" };
    let total = seconds.abs().floor() as u64;
    let (days, rest) = (total / 86_400, total % 86_400);
    let (h, m, s) = (rest / 3600, (rest % 3600) / 60, rest % 60);
    if days > 0 {
        format!("{sign}{days}d {h:02}:{m:02}:{s:02}")
    } else {
        format!("{sign}{h:02}:{m:02}:{s:02}")
    }
}

/// Host-supplied value → display string conversion.
#[derive(Clone, Default)]
pub enum ValueFormatter {
    /// See [`format_auto`].
    #[default]
    Auto,
    Decimal(DecimalFormatter),
    Scientific(ScientificFormatter),
    Time(TimeFormatter),
    /// Seconds relative to a start point, see [`format_relative_time`].
    RelativeTime,
    Custom(Rc<dyn Fn(f64) -> String>),
}

impl fmt::Debug for ValueFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueFormatter::Auto => write!(f, "Auto"),
            ValueFormatter::Decimal(d) => f.debug_tuple("Decimal").field(d).finish(),
            ValueFormatter::Scientific(s) => f.debug_tuple("Scientific").field(s).finish(),
            ValueFormatter::Time(t) => f.debug_tuple("Time").field(t).finish(),
            ValueFormatter::RelativeTime => write!(f, "RelativeTime"),
            ValueFormatter::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl ValueFormatter {
    pub fn custom(f: impl Fn(f64) -> String + 'static) -> Self {
        ValueFormatter::Custom(Rc::new(f))
    }

    /// Formatter for x-axis labels under the given alignment.
    pub fn for_alignment(alignment: XAlignment) -> Self {
        match alignment {
            XAlignment::Step => ValueFormatter::Auto,
            XAlignment::Epoch => ValueFormatter::Time(TimeFormatter::for_epoch_unit(EpochUnit::Seconds)),
            XAlignment::AbsoluteTime => {
                ValueFormatter::Time(TimeFormatter::for_epoch_unit(EpochUnit::Milliseconds))
            }
            XAlignment::RelativeTime => ValueFormatter::RelativeTime,
        }
    }

    /// Format `value`; `domain` is the axis' data extent (used by `Time`),
    /// `precision` the fallback number of decimal places.
    pub fn format(&self, value: f64, domain: (f64, f64), precision: usize) -> String {
        match self {
            ValueFormatter::Auto => format_auto(value, precision),
            ValueFormatter::Decimal(d) => d.format(value, precision),
            ValueFormatter::Scientific(s) => s.format(value, precision),
            ValueFormatter::Time(t) => t.format(value, domain),
            ValueFormatter::RelativeTime => format_relative_time(value),
            ValueFormatter::Custom(f) => f(value),
        }
    }
}
