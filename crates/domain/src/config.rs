use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::words::WordSet;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Countdown options
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Resolved options for one call to start a countdown.
///
/// Field names serialize in camelCase so option objects and config
/// files use the same keys (`enableUtc`, `zeroPad`, `countUp`, ...).
/// Once resolved the config is shared read-only by every target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CountdownConfig {
    pub year: i64,
    /// 1-based month. Values outside 1..=12 roll over into adjacent years.
    pub month: i64,
    pub day: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,

    pub words: WordSet,
    /// Use the plural word form for amounts above 1.
    pub plural: bool,
    /// Render one sentence into a single element instead of four sections.
    pub inline: bool,
    pub enable_utc: bool,
    /// Tick interval in milliseconds.
    pub refresh: u64,
    /// Pad structured amounts below 10 with a leading `0`.
    pub zero_pad: bool,
    /// Keep ticking after the target, showing elapsed time.
    pub count_up: bool,

    pub inline_class: String,
    pub section_class: String,
    pub amount_class: String,
    pub word_class: String,

    #[serde(skip)]
    pub on_end: OnEnd,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            year: 2015,
            month: 6,
            day: 28,
            hours: 9,
            minutes: 0,
            seconds: 0,
            words: WordSet::default(),
            plural: true,
            inline: false,
            enable_utc: false,
            refresh: 1000,
            zero_pad: false,
            count_up: false,
            inline_class: "simply-countdown-inline".into(),
            section_class: "simply-section".into(),
            amount_class: "simply-amount".into(),
            word_class: "simply-word".into(),
            on_end: OnEnd::default(),
        }
    }
}

impl CountdownConfig {
    /// Attach the completion callback, fired once when a target expires.
    pub fn with_on_end<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_end = OnEnd::new(f);
        self
    }

    /// The calendar fields of the target instant.
    pub fn target_date(&self) -> TargetDate {
        TargetDate {
            year: self.year,
            month: self.month,
            day: self.day,
            hours: self.hours,
            minutes: self.minutes,
            seconds: self.seconds,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Completion callback
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Zero-argument completion callback. Defaults to a no-op.
#[derive(Clone)]
pub struct OnEnd(Arc<dyn Fn() + Send + Sync>);

impl OnEnd {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self) {
        (self.0)()
    }
}

impl Default for OnEnd {
    fn default() -> Self {
        Self::new(|| {})
    }
}

impl fmt::Debug for OnEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OnEnd(..)")
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Target date
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Wall-clock fields of a target instant, before any zone is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetDate {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TargetDate {
    /// Build the naive wall-clock time, rolling out-of-range fields over
    /// into their neighbours (month 13 is January next year, day 0 is the
    /// last day of the previous month, hour 24 is midnight the next day).
    pub fn to_naive(&self) -> Result<NaiveDateTime> {
        let out_of_range = || Error::InvalidDate(format!("{self:?} is outside the calendar range"));

        let months = self
            .year
            .checked_mul(12)
            .zip(self.month.checked_sub(1))
            .and_then(|(m, offset)| m.checked_add(offset))
            .ok_or_else(out_of_range)?;
        let year = i32::try_from(months.div_euclid(12)).map_err(|_| out_of_range())?;
        let month = months.rem_euclid(12) as u32 + 1;

        let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(out_of_range)?;

        let offset = self
            .day
            .checked_sub(1)
            .and_then(Duration::try_days)
            .zip(Duration::try_hours(self.hours))
            .and_then(|(d, h)| d.checked_add(&h))
            .zip(Duration::try_minutes(self.minutes))
            .and_then(|(acc, m)| acc.checked_add(&m))
            .zip(Duration::try_seconds(self.seconds))
            .and_then(|(acc, s)| acc.checked_add(&s))
            .ok_or_else(out_of_range)?;

        first_of_month
            .checked_add_signed(offset)
            .ok_or_else(out_of_range)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl CountdownConfig {
    /// Report suspicious values. Resolution never calls this; countdowns
    /// start with whatever was supplied.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.refresh == 0 {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                field: "refresh".into(),
                message: "refresh must be greater than 0".into(),
            });
        }

        if let Err(e) = self.target_date().to_naive() {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                field: "year".into(),
                message: e.to_string(),
            });
        }

        if !(1..=12).contains(&self.month) {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Warning,
                field: "month".into(),
                message: format!("month {} is outside 1-12 and will roll over", self.month),
            });
        }

        if self.day < 1 {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Warning,
                field: "day".into(),
                message: format!("day {} rolls back into the previous month", self.day),
            });
        }

        for unit in crate::breakdown::TimeUnit::ALL {
            let words = self.words.unit(unit);
            if words.singular.is_empty() || words.plural.is_empty() {
                issues.push(ConfigIssue {
                    severity: ConfigSeverity::Warning,
                    field: format!("words.{}", unit.key()),
                    message: "singular and plural words should not be empty".into(),
                });
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn date(year: i64, month: i64, day: i64, hours: i64) -> TargetDate {
        TargetDate {
            year,
            month,
            day,
            hours,
            minutes: 0,
            seconds: 0,
        }
    }

    #[test]
    fn plain_date_builds() {
        let dt = date(2015, 6, 28, 9).to_naive().unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2015, 6, 28, 9));
    }

    #[test]
    fn month_thirteen_rolls_into_next_year() {
        let dt = date(2024, 13, 1, 0).to_naive().unwrap();
        assert_eq!((dt.year(), dt.month()), (2025, 1));
    }

    #[test]
    fn month_zero_is_previous_december() {
        let dt = date(2024, 0, 15, 0).to_naive().unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 12, 15));
    }

    #[test]
    fn day_zero_is_last_day_of_previous_month() {
        let dt = date(2024, 3, 0, 0).to_naive().unwrap();
        assert_eq!((dt.month(), dt.day()), (2, 29));
    }

    #[test]
    fn hour_overflow_moves_to_next_day() {
        let dt = date(2024, 1, 31, 25).to_naive().unwrap();
        assert_eq!((dt.month(), dt.day(), dt.hour()), (2, 1, 1));
    }

    #[test]
    fn absurd_year_is_rejected() {
        assert!(matches!(
            date(i64::MAX / 2, 1, 1, 0).to_naive(),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn minimum_month_and_day_are_rejected() {
        assert!(matches!(
            date(2024, i64::MIN, 1, 0).to_naive(),
            Err(Error::InvalidDate(_))
        ));
        assert!(matches!(
            date(2024, 1, i64::MIN, 0).to_naive(),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn defaults_validate_cleanly() {
        assert!(CountdownConfig::default().validate().is_empty());
    }

    #[test]
    fn zero_refresh_is_an_error() {
        let config = CountdownConfig {
            refresh: 0,
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, ConfigSeverity::Error);
        assert_eq!(issues[0].to_string(), "[ERROR] refresh: refresh must be greater than 0");
    }

    #[test]
    fn out_of_range_month_warns() {
        let config = CountdownConfig {
            month: 14,
            ..Default::default()
        };
        let issues = config.validate();
        assert!(issues
            .iter()
            .any(|i| i.field == "month" && i.severity == ConfigSeverity::Warning));
    }

    #[test]
    fn on_end_is_invoked() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let config = CountdownConfig::default().with_on_end(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });
        config.on_end.call();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
