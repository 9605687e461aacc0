//! Per-target tick loop.
//!
//! A [`Scheduler`] moves through `Initializing → Running → Stopped`.
//! Starting it mounts the output elements and renders once before the
//! first timer tick. It stops only when the target expires with count-up
//! disabled; the completion callback fires exactly then. With count-up
//! enabled it ticks until the host cancels it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use sc_domain::CountdownConfig;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};

use crate::clock::Clock;
use crate::element::ElementRef;
use crate::render::Renderer;
use crate::time::TimeEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Initializing,
    Running,
    Stopped,
}

impl SchedulerState {
    /// Whether `next` directly follows `self`.
    pub fn can_move_to(self, next: SchedulerState) -> bool {
        matches!(
            (self, next),
            (SchedulerState::Initializing, SchedulerState::Running)
                | (SchedulerState::Running, SchedulerState::Stopped)
        )
    }
}

/// One render target with its output elements and shared config.
/// Never shared between schedulers.
struct TargetBinding {
    index: usize,
    renderer: Renderer,
    config: Arc<CountdownConfig>,
    engine: TimeEngine,
    clock: Arc<dyn Clock>,
    state: Arc<Mutex<SchedulerState>>,
    renders: Arc<AtomicU64>,
}

impl TargetBinding {
    fn set_state(&self, next: SchedulerState) {
        let mut state = self.state.lock();
        debug_assert!(state.can_move_to(next), "invalid transition {:?} -> {next:?}", *state);
        *state = next;
    }

    /// Evaluate, render, and stop on expiry. Returns `false` once stopped.
    fn tick(&self) -> bool {
        let outcome = self.engine.evaluate(self.clock.now());
        self.renderer.render(&outcome.breakdown(), &self.config);
        let renders = self.renders.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!(target_index = self.index, renders, ?outcome, "countdown tick");

        if outcome.is_expired() {
            self.set_state(SchedulerState::Stopped);
            tracing::info!(target_index = self.index, renders, "countdown reached its target");
            self.config.on_end.call();
            return false;
        }
        true
    }
}

/// Drives one target. Dropping a `Scheduler` detaches its timer rather
/// than cancelling it; use [`abort_handle`](Self::abort_handle) to stop
/// early.
pub struct Scheduler {
    index: usize,
    state: Arc<Mutex<SchedulerState>>,
    renders: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl Scheduler {
    /// Mount output elements on `target`, render once, then tick every
    /// `config.refresh` milliseconds on the current tokio runtime.
    ///
    /// A target that is already expired stops during the first render and
    /// never spawns a timer.
    pub fn start(
        index: usize,
        target: &ElementRef,
        config: Arc<CountdownConfig>,
        engine: TimeEngine,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let state = Arc::new(Mutex::new(SchedulerState::Initializing));
        let renders = Arc::new(AtomicU64::new(0));

        let binding = TargetBinding {
            index,
            renderer: Renderer::mount(target, &config),
            config: config.clone(),
            engine,
            clock,
            state: state.clone(),
            renders: renders.clone(),
        };

        let mut scheduler = Self {
            index,
            state,
            renders,
            task: None,
        };

        binding.set_state(SchedulerState::Running);
        if !binding.tick() {
            return scheduler;
        }

        let period = refresh_period(config.refresh);
        tracing::debug!(target_index = index, period_ms = period.as_millis() as u64, "scheduler running");

        scheduler.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !binding.tick() {
                    break;
                }
            }
        }));

        scheduler
    }

    /// Position of the target in binding order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.lock()
    }

    /// Renders performed so far, including the initial one.
    pub fn renders(&self) -> u64 {
        self.renders.load(Ordering::SeqCst)
    }

    /// Host-level cancellation of the timer, if one is running.
    pub fn abort_handle(&self) -> Option<AbortHandle> {
        self.task.as_ref().map(|t| t.abort_handle())
    }

    /// Wait for the timer to finish. Returns immediately if no timer was
    /// spawned; never returns for a count-up target unless aborted. A panic
    /// raised by the completion callback resumes here.
    pub async fn wait(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        match task.await {
            Ok(()) => {}
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => {
                tracing::debug!(target_index = self.index, "countdown timer cancelled");
            }
        }
    }
}

fn refresh_period(refresh_ms: u64) -> Duration {
    if refresh_ms == 0 {
        tracing::warn!("refresh of 0 ms clamped to 1 ms");
    }
    Duration::from_millis(refresh_ms.max(1))
}
