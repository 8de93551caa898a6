//! Jittered periodic refresh of observable resources.
//!
//! ```text
//! schedule(entry) ──► tokio task ─┬─► tick: refresh() ─► notify observers
//!                                 │
//!                                 ├─► cancelled? ── yes ──► stop
//!                                 │
//!                                 └─► sleep(random delay in [min, max]) ─┐
//!                                      ▲                                 │
//!                                      └─────────────────────────────────┘
//! ```
//!
//! Delays are redrawn every cycle so resources never settle into lockstep.

mod jitter;
#[allow(clippy::module_inception)]
mod scheduler;

pub use jitter::*;
pub use scheduler::*;
