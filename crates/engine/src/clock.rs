//! Sources of "now" and of the local wall-clock zone.

use chrono::{DateTime, Duration, FixedOffset, Local, LocalResult, NaiveDateTime, TimeZone, Utc};

/// Supplies the current instant to every tick.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The operating system's wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A wall clock pinned to `anchor` at creation that then advances with
/// tokio's monotonic clock. Under a paused test runtime it moves only
/// when tokio time does.
#[derive(Debug, Clone)]
pub struct AnchoredClock {
    anchor: DateTime<Utc>,
    origin: tokio::time::Instant,
}

impl AnchoredClock {
    pub fn new(anchor: DateTime<Utc>) -> Self {
        Self {
            anchor,
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Clock for AnchoredClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = tokio::time::Instant::now().duration_since(self.origin);
        self.anchor + Duration::from_std(elapsed).unwrap_or(Duration::zero())
    }
}

/// The zone whose wall-clock fields count as "local".
#[derive(Debug, Clone, Copy, Default)]
pub enum LocalZone {
    /// The host's configured time zone.
    #[default]
    System,
    Fixed(FixedOffset),
}

impl LocalZone {
    /// Place local wall-clock fields on the timeline.
    ///
    /// Ambiguous times take the earlier instant; times skipped by a
    /// forward transition move one hour later.
    pub fn from_local(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            LocalZone::System => resolve_local(&Local, naive),
            LocalZone::Fixed(offset) => resolve_local(offset, naive),
        }
    }

    /// Local wall-clock fields of `instant`.
    pub fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            LocalZone::System => instant.with_timezone(&Local).naive_local(),
            LocalZone::Fixed(offset) => instant.with_timezone(offset).naive_local(),
        }
    }
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
    let earliest = |n: &NaiveDateTime| match tz.from_local_datetime(n) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(early, _) => Some(early),
        LocalResult::None => None,
    };

    earliest(naive)
        .or_else(|| earliest(&(*naive + Duration::hours(1))))
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn fixed_zone_round_trips_fields() {
        let zone = LocalZone::Fixed(FixedOffset::east_opt(2 * 3600).unwrap());
        let instant = zone.from_local(&naive(2024, 5, 1, 12)).unwrap();
        assert_eq!(instant.naive_utc(), naive(2024, 5, 1, 10));
        assert_eq!(zone.to_local(instant), naive(2024, 5, 1, 12));
    }

    #[tokio::test(start_paused = true)]
    async fn anchored_clock_follows_tokio_time() {
        let anchor = Utc::now();
        let clock = AnchoredClock::new(anchor);
        assert_eq!(clock.now(), anchor);
        tokio::time::advance(std::time::Duration::from_millis(1_500)).await;
        assert_eq!(clock.now() - anchor, Duration::milliseconds(1_500));
    }
}
