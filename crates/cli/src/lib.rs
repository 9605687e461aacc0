//! `sc-cli`: terminal host for simply-countdown.
//!
//! Builds an in-memory page from a TOML file, binds countdowns to its
//! panels through the selector adapter, and paints the panels to stdout.

pub mod cli;
pub mod page;
pub mod paint;
