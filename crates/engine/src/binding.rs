//! Resolving caller input into render targets and starting one scheduler
//! per target.

use std::sync::Arc;

use futures_util::future::join_all;
use sc_domain::{CountdownConfig, Result};
use serde_json::Value;

use crate::clock::{Clock, LocalZone, SystemClock};
use crate::element::{ElementRef, ElementResolver};
use crate::scheduler::{Scheduler, SchedulerState};
use crate::time::TimeEngine;

/// What a countdown is bound to.
#[derive(Clone)]
pub enum Target {
    /// Looked up through the [`ElementResolver`]; may match nothing.
    Selector(String),
    Single(ElementRef),
    Collection(Vec<ElementRef>),
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Target::Selector(selector.to_string())
    }
}

impl From<String> for Target {
    fn from(selector: String) -> Self {
        Target::Selector(selector)
    }
}

impl From<ElementRef> for Target {
    fn from(element: ElementRef) -> Self {
        Target::Single(element)
    }
}

impl From<Vec<ElementRef>> for Target {
    fn from(elements: Vec<ElementRef>) -> Self {
        Target::Collection(elements)
    }
}

/// Entry point: binds countdowns to targets found through a resolver.
///
/// # Example
///
/// ```rust,no_run
/// # async fn demo() -> sc_domain::Result<()> {
/// use sc_engine::{Countdown, MemoryDocument};
///
/// let doc = MemoryDocument::new();
/// doc.add_element("div", Some("launch"), &["countdown"]);
///
/// let countdown = Countdown::new(doc.clone());
/// let mut handle = countdown.countdownify(
///     ".countdown",
///     &serde_json::json!({ "year": 2030, "month": 1, "day": 1, "zeroPad": true }),
/// )?;
/// handle.wait().await;
/// # Ok(())
/// # }
/// ```
pub struct Countdown {
    resolver: Arc<dyn ElementResolver>,
    clock: Arc<dyn Clock>,
    zone: LocalZone,
}

impl Countdown {
    /// Use the system clock and the host's local zone.
    pub fn new<R: ElementResolver + 'static>(resolver: R) -> Self {
        Self {
            resolver: Arc::new(resolver),
            clock: Arc::new(SystemClock),
            zone: LocalZone::System,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_zone(mut self, zone: LocalZone) -> Self {
        self.zone = zone;
        self
    }

    /// Expand `target` into render targets, in order.
    pub fn bind(&self, target: Target) -> Vec<ElementRef> {
        match target {
            Target::Selector(selector) => self.resolver.resolve(&selector),
            Target::Single(element) => vec![element],
            Target::Collection(elements) => elements,
        }
    }

    /// Start one independent scheduler per bound target.
    ///
    /// Must be called from within a tokio runtime. A target that matches
    /// nothing starts nothing and is not an error.
    pub fn start(&self, target: impl Into<Target>, config: CountdownConfig) -> Result<CountdownHandle> {
        let engine = TimeEngine::new(&config, self.zone)?;
        let config = Arc::new(config);
        let elements = self.bind(target.into());
        tracing::info!(targets = elements.len(), deadline = %engine.target(), "binding countdown");

        let schedulers = elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                Scheduler::start(
                    index,
                    element,
                    config.clone(),
                    engine.clone(),
                    self.clock.clone(),
                )
            })
            .collect();

        Ok(CountdownHandle { schedulers })
    }

    /// Resolve `overrides` over the defaults, then [`start`](Self::start).
    pub fn start_with(&self, target: impl Into<Target>, overrides: &Value) -> Result<CountdownHandle> {
        let config = CountdownConfig::resolve(std::slice::from_ref(overrides))?;
        self.start(target, config)
    }

    /// Selector-plugin style adapter: a selector plus an options object,
    /// passed through unchanged.
    pub fn countdownify(&self, selector: &str, options: &Value) -> Result<CountdownHandle> {
        self.start_with(selector, options)
    }
}

/// The schedulers started by one call.
pub struct CountdownHandle {
    schedulers: Vec<Scheduler>,
}

impl CountdownHandle {
    pub fn len(&self) -> usize {
        self.schedulers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedulers.is_empty()
    }

    pub fn schedulers(&self) -> &[Scheduler] {
        &self.schedulers
    }

    pub fn states(&self) -> Vec<SchedulerState> {
        self.schedulers.iter().map(Scheduler::state).collect()
    }

    /// Abort every running timer.
    pub fn abort(&self) {
        for handle in self.schedulers.iter().filter_map(Scheduler::abort_handle) {
            handle.abort();
        }
    }

    /// Wait until every scheduler's timer has finished. Count-up targets
    /// only finish when aborted.
    pub async fn wait(&mut self) {
        join_all(self.schedulers.iter_mut().map(|s| s.wait())).await;
    }
}
