pub mod config;
pub mod run;

use anyhow::Context;
use chrono::{Datelike, NaiveDateTime, Timelike};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Map, Value};

use crate::page::AppConfig;

/// simply-countdown: live countdown timers in the terminal.
#[derive(Debug, Parser)]
#[command(name = "simply-countdown", version, about)]
pub struct Cli {
    /// Page and options file.
    #[arg(long, env = "SC_CONFIG", default_value = "countdown.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Bind countdowns to the page's panels and paint them (default).
    Run(RunArgs),
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Resolve the options and report any issues.
    Validate,
    /// Dump the resolved options (with defaults) as TOML.
    Show,
}

/// Command-line overrides. Only flags that are given take part in
/// resolution, so file options are not reset by absent flags.
#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Selector of the panels to bind (defaults to `page.selector`).
    pub selector: Option<String>,
    /// Target as local wall-clock time, `YYYY-MM-DD HH:MM:SS`.
    #[arg(long)]
    pub date: Option<String>,
    /// Render one sentence per panel.
    #[arg(long)]
    pub inline: bool,
    /// Pad single-digit amounts with a leading zero.
    #[arg(long)]
    pub zero_pad: bool,
    /// Keep counting after the target passes.
    #[arg(long)]
    pub count_up: bool,
    /// Treat the target fields as UTC fields.
    #[arg(long)]
    pub utc: bool,
    /// Always use singular words.
    #[arg(long)]
    pub no_plural: bool,
    /// Tick interval in milliseconds.
    #[arg(long)]
    pub refresh: Option<u64>,
}

impl RunArgs {
    /// The flags as an option object for the resolver.
    pub fn overrides(&self) -> anyhow::Result<Value> {
        let mut map = Map::new();

        if let Some(raw) = &self.date {
            let at = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .with_context(|| format!("parsing --date {raw:?} (expected YYYY-MM-DD HH:MM:SS)"))?;
            map.insert("year".into(), json!(at.year()));
            map.insert("month".into(), json!(at.month()));
            map.insert("day".into(), json!(at.day()));
            map.insert("hours".into(), json!(at.hour()));
            map.insert("minutes".into(), json!(at.minute()));
            map.insert("seconds".into(), json!(at.second()));
        }
        if self.inline {
            map.insert("inline".into(), json!(true));
        }
        if self.zero_pad {
            map.insert("zeroPad".into(), json!(true));
        }
        if self.count_up {
            map.insert("countUp".into(), json!(true));
        }
        if self.utc {
            map.insert("enableUtc".into(), json!(true));
        }
        if self.no_plural {
            map.insert("plural".into(), json!(false));
        }
        if let Some(refresh) = self.refresh {
            map.insert("refresh".into(), json!(refresh));
        }

        Ok(Value::Object(map))
    }
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the page file at `path`. A missing file yields the defaults.
pub fn load_config(path: &str) -> anyhow::Result<AppConfig> {
    if !std::path::Path::new(path).exists() {
        tracing::debug!(path, "no config file, using defaults");
        return Ok(AppConfig::default());
    }

    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    toml::from_str(&raw).with_context(|| format!("parsing {path}"))
}
