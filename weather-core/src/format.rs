use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::model::UnitSystem;

/// Shown in place of any value that cannot be rendered.
pub const PLACEHOLDER: &str = "—";

/// Turns raw sample fields into display strings for one unit system.
///
/// Every method is total: bad input gives [`PLACEHOLDER`], never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitFormatter {
    unit_system: UnitSystem,
}

impl UnitFormatter {
    pub fn new(unit_system: UnitSystem) -> Self {
        Self { unit_system }
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    pub fn temperature(&self, value: Option<f64>) -> String {
        let symbol = match self.unit_system {
            UnitSystem::Metric | UnitSystem::Uk => "°C",
            UnitSystem::Us => "°F",
        };
        with_suffix(value, symbol)
    }

    pub fn wind_speed(&self, value: Option<f64>) -> String {
        let symbol = match self.unit_system {
            UnitSystem::Metric => " km/h",
            UnitSystem::Us | UnitSystem::Uk => " mph",
        };
        with_suffix(value, symbol)
    }

    pub fn precip_probability(&self, value: Option<f64>) -> String {
        with_suffix(value, "%")
    }

    /// Weekday and clock time of `epoch` in the named timezone.
    pub fn time_of_day(&self, epoch: i64, timezone: &str) -> String {
        let pattern = match self.unit_system {
            UnitSystem::Us => "%a %-I:%M %p",
            UnitSystem::Metric | UnitSystem::Uk => "%a %H:%M",
        };
        render(epoch, timezone, pattern)
    }

    /// Full "as of" timestamp. A missing epoch means "right now".
    pub fn as_of(&self, epoch: Option<i64>, timezone: &str) -> String {
        self.as_of_with(epoch, timezone, Utc::now)
    }

    pub fn as_of_with<N>(&self, epoch: Option<i64>, timezone: &str, now_fn: N) -> String
    where
        N: Fn() -> DateTime<Utc>,
    {
        let epoch = epoch.unwrap_or_else(|| now_fn().timestamp());
        let pattern = match self.unit_system {
            UnitSystem::Us => "%A, %B %-d, %Y %-I:%M %p %Z",
            UnitSystem::Metric | UnitSystem::Uk => "%A, %-d %B %Y %H:%M %Z",
        };
        render(epoch, timezone, pattern)
    }
}

fn with_suffix(value: Option<f64>, suffix: &str) -> String {
    match value.and_then(round_half_up) {
        Some(rounded) => format!("{rounded}{suffix}"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Nearest integer with halves rounded towards positive infinity.
/// Magnitudes outside the `i64` range have no sensible display and give `None`.
fn round_half_up(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }

    let rounded = if (value - value.trunc()).abs() == 0.5 {
        value.ceil()
    } else {
        value.round()
    };

    (rounded.abs() < i64::MAX as f64).then_some(rounded as i64)
}

fn render(epoch: i64, timezone: &str, pattern: &str) -> String {
    // Unknown zone names fall back to UTC rather than failing.
    let tz: Tz = timezone.parse().unwrap_or(Tz::UTC);

    match DateTime::from_timestamp(epoch, 0) {
        Some(utc) => utc.with_timezone(&tz).format(pattern).to_string(),
        None => PLACEHOLDER.to_string(),
    }
}
