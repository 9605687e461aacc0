//! `sc-engine`: the countdown timing and rendering engine.
//!
//! # Flow
//!
//! ```text
//! options ──resolve──▶ CountdownConfig (shared, read-only)
//!                             │
//! Target ──bind──▶ [element, element, ...]
//!                             │
//!                 one Scheduler per element
//!                             │
//!        every tick: Clock::now ─▶ TimeEngine ─▶ Renderer
//! ```
//!
//! Each tick is recomputed from absolute instants, so a late tick simply
//! shows a larger jump. Targets never share mutable state.

pub mod binding;
pub mod clock;
pub mod element;
pub mod render;
pub mod scheduler;
pub mod time;

// ── Re-exports for ergonomic imports ─────────────────────────────────

pub use binding::{Countdown, CountdownHandle, Target};
pub use clock::{AnchoredClock, Clock, LocalZone, SystemClock};
pub use element::{Element, ElementRef, ElementResolver, MemoryDocument, MemoryNode};
pub use render::{format_amount, inline_sentence, Renderer, UnitSection};
pub use scheduler::{Scheduler, SchedulerState};
pub use time::{normalize_target, TickOutcome, TimeEngine};

pub use sc_domain::{CountdownConfig, TimeBreakdown, TimeUnit, WordSet};
