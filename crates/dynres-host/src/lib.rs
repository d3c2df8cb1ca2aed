//! dynres-host — host-side glue around the resolution controller.
//!
//! Everything an engine integration needs that is not the control
//! algorithm itself:
//!
//! ```text
//! UsageSampler ──► ScaleLoop ──► SharedController ──► ApplyCallback
//!   (sampler)     (loop_driver)    (one mutex over      (apply)
//!                                   dynres-core)
//!                       ▲
//!              ConfigStore (store)        simulate() (sim)
//! ```
//!
//! The sampler seam hides where readings come from; the apply callback
//! hides where actions go; the store keeps the six tunables in a flat
//! JSON file; and `simulate` replays recorded traces without clocks for
//! threshold tuning.

pub mod apply;
pub mod loop_driver;
pub mod sampler;
pub mod sim;
pub mod store;

pub use apply::{ApplyCallback, DEFAULT_SCALE_CVAR, console_directive};
pub use loop_driver::{ScaleLoop, SharedController};
pub use sampler::{
    ReplaySampler, SteadySampler, SyntheticSampler, TraceError, UsageSampler, parse_trace,
};
pub use sim::{SimEvent, SimReport, simulate};
pub use store::{ConfigStore, StoreError, StoreResult};
