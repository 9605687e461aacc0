//! `sc-domain`: shared data types for simply-countdown.
//!
//! Holds the resolved [`CountdownConfig`], the [`TimeBreakdown`] every tick
//! produces, the singular/plural [`WordSet`], and the option resolver that
//! deep-merges user overrides over the documented defaults.

pub mod breakdown;
pub mod config;
pub mod error;
pub mod resolve;
pub mod words;

pub use breakdown::{TimeBreakdown, TimeUnit};
pub use config::{ConfigIssue, ConfigSeverity, CountdownConfig, OnEnd, TargetDate};
pub use error::{Error, Result};
pub use resolve::{deep_merge, defaults_value};
pub use words::{UnitWords, WordSet};
