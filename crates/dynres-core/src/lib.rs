//! dynres-core — the adaptive render-resolution controller.
//!
//! A discrete-time bang-bang controller with debounce counters. Each tick
//! it takes one GPU-utilization reading and may move the render resolution
//! percentage one step to keep utilization inside a target band. The two
//! directions are asymmetric by design: increases are rare and gentle,
//! decreases prompt and aggressive, so overload is answered before it
//! turns into visible stutter.
//!
//! # Control Algorithm
//!
//! ```text
//! usage <= lower_bound and resolution < 100:
//!     under_budget_ticks += 1
//!     once under_budget_ticks > increase_debounce_ticks:
//!         resolution += increase_step   (capped at 100)
//!
//! usage >= upper_bound and resolution > 20:
//!     over_budget_ticks += 1
//!     once over_budget_ticks > decrease_debounce_ticks:
//!         resolution -= decrease_step   (floored at 20)
//!
//! any tick that fails a branch condition resets that branch's counter
//! ```
//!
//! A missing or out-of-range reading is a defined no-op, not an error:
//! counters and accumulators keep their values and no action can fire.
//!
//! The controller performs no I/O, spawns nothing, and owns no lock;
//! everything host-facing (samplers, actuation, persistence, the shared
//! mutex and tick loop) lives in `dynres-host`.

pub mod action;
pub mod config;
pub mod controller;
pub mod error;

pub use action::{ActionRecord, ScaleAction, ScaleDirection};
pub use config::{BOUND_MARGIN, ControllerConfig, FieldAdjustment};
pub use controller::{
    ControllerSnapshot, DEFAULT_RESOLUTION_PERCENT, MAX_RESOLUTION_PERCENT,
    MIN_RESOLUTION_PERCENT, ResolutionController,
};
pub use error::ConfigError;
