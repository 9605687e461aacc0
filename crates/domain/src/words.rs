//! Singular/plural vocabulary for the four display units.

use serde::{Deserialize, Serialize};

use crate::breakdown::{TimeBreakdown, TimeUnit};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitWords {
    pub singular: String,
    pub plural: String,
}

impl UnitWords {
    pub fn new(singular: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            singular: singular.into(),
            plural: plural.into(),
        }
    }

    /// Pick the form for `amount`.
    ///
    /// With `plural` enabled the plural form is used only above 1, so both
    /// 0 and 1 read as singular.
    pub fn pick(&self, amount: u64, plural: bool) -> &str {
        if plural && amount > 1 {
            &self.plural
        } else {
            &self.singular
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSet {
    pub days: UnitWords,
    pub hours: UnitWords,
    pub minutes: UnitWords,
    pub seconds: UnitWords,
}

impl Default for WordSet {
    fn default() -> Self {
        Self {
            days: UnitWords::new("day", "days"),
            hours: UnitWords::new("hour", "hours"),
            minutes: UnitWords::new("minute", "minutes"),
            seconds: UnitWords::new("second", "seconds"),
        }
    }
}

impl WordSet {
    pub fn unit(&self, unit: TimeUnit) -> &UnitWords {
        match unit {
            TimeUnit::Days => &self.days,
            TimeUnit::Hours => &self.hours,
            TimeUnit::Minutes => &self.minutes,
            TimeUnit::Seconds => &self.seconds,
        }
    }

    /// Words for every unit of `breakdown`, in display order.
    pub fn select(&self, breakdown: &TimeBreakdown, plural: bool) -> [&str; 4] {
        TimeUnit::ALL.map(|unit| self.unit(unit).pick(breakdown.amount(unit), plural))
    }
}
