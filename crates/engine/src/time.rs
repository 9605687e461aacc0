//! Target normalization and per-tick remaining/elapsed computation.

use chrono::{DateTime, Timelike, Utc};
use sc_domain::{CountdownConfig, Error, Result, TargetDate, TimeBreakdown};

use crate::clock::LocalZone;

/// What a single tick observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The target is still ahead.
    Remaining(TimeBreakdown),
    /// The target has passed and count-up is enabled.
    Elapsed(TimeBreakdown),
    /// The target has passed and count-up is disabled.
    Expired,
}

impl TickOutcome {
    /// The breakdown to display; zero once expired.
    pub fn breakdown(&self) -> TimeBreakdown {
        match self {
            TickOutcome::Remaining(b) | TickOutcome::Elapsed(b) => *b,
            TickOutcome::Expired => TimeBreakdown::ZERO,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, TickOutcome::Expired)
    }
}

/// Pure time computation for one countdown.
#[derive(Debug, Clone)]
pub struct TimeEngine {
    target: DateTime<Utc>,
    zone: LocalZone,
    enable_utc: bool,
    count_up: bool,
}

impl TimeEngine {
    pub fn new(config: &CountdownConfig, zone: LocalZone) -> Result<Self> {
        let target = normalize_target(&config.target_date(), zone, config.enable_utc)?;
        tracing::debug!(
            instant = %target,
            enable_utc = config.enable_utc,
            count_up = config.count_up,
            "normalized countdown target"
        );
        Ok(Self {
            target,
            zone,
            enable_utc: config.enable_utc,
            count_up: config.count_up,
        })
    }

    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    /// Compare the target against `now`.
    ///
    /// Any positive span counts as remaining, even one below a second
    /// (which displays as all zeros without expiring).
    pub fn evaluate(&self, now: DateTime<Utc>) -> TickOutcome {
        let reference = if self.enable_utc {
            relabel_now(now, self.zone)
        } else {
            now
        };

        let left_ms = (self.target - reference).num_milliseconds();
        if left_ms > 0 {
            TickOutcome::Remaining(TimeBreakdown::from_millis(left_ms))
        } else if self.count_up {
            TickOutcome::Elapsed(TimeBreakdown::from_millis(
                (now - self.target).num_milliseconds(),
            ))
        } else {
            TickOutcome::Expired
        }
    }
}

/// Place the target's wall-clock fields in `zone`.
///
/// With `enable_utc`, the UTC fields of that instant are read back and
/// placed in `zone` again. This shifts the target by the zone's offset;
/// it is not a zone conversion.
pub fn normalize_target(
    date: &TargetDate,
    zone: LocalZone,
    enable_utc: bool,
) -> Result<DateTime<Utc>> {
    let naive = date.to_naive()?;
    let unrepresentable = || Error::InvalidDate(format!("{naive} has no local representation"));

    let local = zone.from_local(&naive).ok_or_else(unrepresentable)?;
    if !enable_utc {
        return Ok(local);
    }
    zone.from_local(&local.naive_utc()).ok_or_else(unrepresentable)
}

/// Rebuild `now` from its own local calendar fields, dropping the
/// sub-second part.
fn relabel_now(now: DateTime<Utc>, zone: LocalZone) -> DateTime<Utc> {
    let fields = zone.to_local(now);
    let fields = fields.with_nanosecond(0).unwrap_or(fields);
    zone.from_local(&fields).unwrap_or(now)
}
