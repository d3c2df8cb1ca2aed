//! The resolution controller — debounced band control over GPU usage.
//!
//! One [`ResolutionController::on_sample`] call per tick drives the whole
//! algorithm. The controller holds no lock and performs no I/O; hosts that
//! tick and reconfigure from different threads wrap it in a mutex (see the
//! `dynres-host` crate).

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::info;

use crate::action::{ActionRecord, ScaleAction, ScaleDirection};
use crate::config::{BOUND_MARGIN, ControllerConfig, FieldAdjustment};
use crate::error::ConfigError;

/// Hard floor for the resolution percentage. Decreases stop here no matter
/// how overloaded the GPU is; below this the image is unusable anyway.
pub const MIN_RESOLUTION_PERCENT: u8 = 20;

/// Native resolution. Increases stop here.
pub const MAX_RESOLUTION_PERCENT: u8 = 100;

/// Starting percentage when the caller does not pick one. Deliberately
/// conservative: the first seconds of a session climb from here rather
/// than stutter down from native.
pub const DEFAULT_RESOLUTION_PERCENT: u8 = 50;

/// Debounced bang-bang controller over a target utilization band.
///
/// Each tick takes one GPU-utilization reading and may move the render
/// resolution one step to pull utilization back inside
/// `[usage_lower_bound, usage_upper_bound]`. The two directions are
/// deliberately asymmetric: increases need a long run of quiet ticks and
/// move gently, decreases trigger quickly and move hard, so overload is
/// answered before it turns into visible stutter.
pub struct ResolutionController {
    config: ControllerConfig,
    resolution_percent: u8,
    ticks_under_budget: u32,
    ticks_over_budget: u32,
    time_since_increase: Duration,
    time_since_decrease: Duration,
    last_action: Option<ActionRecord>,
}

/// Read-only view of the controller for display, logging, or test
/// assertions. Taking one has no effect on controller state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerSnapshot {
    pub config: ControllerConfig,
    pub resolution_percent: u8,
    pub ticks_under_budget: u32,
    pub ticks_over_budget: u32,
    pub time_since_increase: Duration,
    pub time_since_decrease: Duration,
    pub last_action: Option<ActionRecord>,
}

impl ResolutionController {
    /// Controller with default configuration, starting at
    /// [`DEFAULT_RESOLUTION_PERCENT`].
    pub fn new() -> Self {
        Self {
            config: ControllerConfig::default(),
            resolution_percent: DEFAULT_RESOLUTION_PERCENT,
            ticks_under_budget: 0,
            ticks_over_budget: 0,
            time_since_increase: Duration::ZERO,
            time_since_decrease: Duration::ZERO,
            last_action: None,
        }
    }

    /// Controller with the given configuration, sanitized on the way in.
    pub fn with_config(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (config, _) = config.sanitize();
        let mut controller = Self::new();
        controller.config = config;
        Ok(controller)
    }

    /// Controller starting at a specific resolution percentage, clamped
    /// into `[MIN_RESOLUTION_PERCENT, MAX_RESOLUTION_PERCENT]`.
    pub fn with_resolution(config: ControllerConfig, percent: u8) -> Result<Self, ConfigError> {
        let mut controller = Self::with_config(config)?;
        controller.resolution_percent =
            percent.clamp(MIN_RESOLUTION_PERCENT, MAX_RESOLUTION_PERCENT);
        Ok(controller)
    }

    // ── Tick path ──────────────────────────────────────────────────

    /// Feed one utilization reading into the controller.
    ///
    /// `usage` is a GPU-utilization percentage; `None` (or a reading above
    /// 100) means the sensor had nothing to say this tick, which leaves
    /// every counter and accumulator untouched. `elapsed` is the wall time
    /// since the previous call and feeds telemetry only; debounce gating
    /// counts ticks, so a zero `elapsed` still advances the counters and
    /// an absurd one saturates the accumulators at [`Duration::MAX`].
    ///
    /// Returns the action applied this tick, if any. The resolution has
    /// already been updated when the action is returned; the caller's only
    /// job is to forward it to the render pipeline.
    pub fn on_sample(&mut self, usage: Option<u8>, elapsed: Duration) -> Option<ScaleAction> {
        let usage = match usage {
            Some(value) if value <= 100 => value,
            _ => return None,
        };

        self.time_since_increase = self.time_since_increase.saturating_add(elapsed);
        self.time_since_decrease = self.time_since_decrease.saturating_add(elapsed);

        let mut fired = None;

        // Headroom to spare, and room left to climb.
        if usage <= self.config.usage_lower_bound
            && self.resolution_percent < MAX_RESOLUTION_PERCENT
        {
            self.ticks_under_budget += 1;
            if self.ticks_under_budget > self.config.increase_debounce_ticks {
                fired = Some(self.apply(ScaleDirection::Increase, usage));
            }
        } else {
            self.ticks_under_budget = 0;
        }

        // Budget blown, and still above the floor. Evaluated independently
        // of the branch above; if both fire in one tick the decrease wins,
        // overload response comes first.
        if usage >= self.config.usage_upper_bound
            && self.resolution_percent > MIN_RESOLUTION_PERCENT
        {
            self.ticks_over_budget += 1;
            if self.ticks_over_budget > self.config.decrease_debounce_ticks {
                fired = Some(self.apply(ScaleDirection::Decrease, usage));
            }
        } else {
            self.ticks_over_budget = 0;
        }

        fired
    }

    fn apply(&mut self, direction: ScaleDirection, usage: u8) -> ScaleAction {
        let from = self.resolution_percent;
        let since_previous;
        match direction {
            ScaleDirection::Increase => {
                self.resolution_percent = self
                    .resolution_percent
                    .saturating_add(self.config.increase_step)
                    .min(MAX_RESOLUTION_PERCENT);
                self.ticks_under_budget = 0;
                since_previous = self.time_since_increase;
                self.time_since_increase = Duration::ZERO;
            }
            ScaleDirection::Decrease => {
                self.resolution_percent = self
                    .resolution_percent
                    .saturating_sub(self.config.decrease_step)
                    .max(MIN_RESOLUTION_PERCENT);
                self.ticks_over_budget = 0;
                since_previous = self.time_since_decrease;
                self.time_since_decrease = Duration::ZERO;
            }
        }

        info!(
            %direction,
            from,
            to = self.resolution_percent,
            usage,
            "resolution adjusted"
        );

        self.last_action = Some(ActionRecord {
            direction,
            resolution_percent: self.resolution_percent,
            observed_usage: usage,
            since_previous,
            at_epoch: epoch_secs(),
        });

        ScaleAction {
            direction,
            resolution_percent: self.resolution_percent,
        }
    }

    // ── Configuration ──────────────────────────────────────────────

    /// Replace the whole configuration.
    ///
    /// The new config is validated, then sanitized; the returned list
    /// names every field coercion changed. On error the active config is
    /// untouched. Debounce counters survive a reconfigure: a run of
    /// qualifying ticks keeps counting against the new thresholds.
    pub fn configure(
        &mut self,
        config: ControllerConfig,
    ) -> Result<Vec<FieldAdjustment>, ConfigError> {
        config.validate()?;
        let (applied, adjusted) = config.sanitize();
        self.config = applied;
        Ok(adjusted)
    }

    /// Move the lower bound. The upper bound is dragged up to keep
    /// [`BOUND_MARGIN`] between them; near the top of the range the lower
    /// bound itself caps where the band still fits under 100.
    pub fn set_usage_lower_bound(&mut self, value: u8) {
        let (applied, _) = ControllerConfig {
            usage_lower_bound: value,
            ..self.config.clone()
        }
        .sanitize();
        self.config = applied;
    }

    /// Move the upper bound. Clamped to `BOUND_MARGIN..=100`; the lower
    /// bound is dragged down to keep the margin between them.
    pub fn set_usage_upper_bound(&mut self, value: u8) {
        self.config.usage_upper_bound = value.clamp(BOUND_MARGIN, 100);
        if self.config.usage_lower_bound > self.config.usage_upper_bound - BOUND_MARGIN {
            self.config.usage_lower_bound = self.config.usage_upper_bound - BOUND_MARGIN;
        }
    }

    /// Set the increase step. Zero is rejected.
    pub fn set_increase_step(&mut self, value: u8) -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::ZeroStep {
                field: "increase_step",
            });
        }
        self.config.increase_step = value;
        Ok(())
    }

    /// Set the decrease step. Zero is rejected.
    pub fn set_decrease_step(&mut self, value: u8) -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::ZeroStep {
                field: "decrease_step",
            });
        }
        self.config.decrease_step = value;
        Ok(())
    }

    /// Set how many consecutive under-budget ticks an increase needs.
    pub fn set_increase_debounce_ticks(&mut self, value: u32) {
        self.config.increase_debounce_ticks = value;
    }

    /// Set how many consecutive over-budget ticks a decrease needs.
    pub fn set_decrease_debounce_ticks(&mut self, value: u32) {
        self.config.decrease_debounce_ticks = value;
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn resolution_percent(&self) -> u8 {
        self.resolution_percent
    }

    pub fn last_action(&self) -> Option<&ActionRecord> {
        self.last_action.as_ref()
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            config: self.config.clone(),
            resolution_percent: self.resolution_percent,
            ticks_under_budget: self.ticks_under_budget,
            ticks_over_budget: self.ticks_over_budget,
            time_since_increase: self.time_since_increase,
            time_since_decrease: self.time_since_decrease,
            last_action: self.last_action.clone(),
        }
    }
}

impl Default for ResolutionController {
    fn default() -> Self {
        Self::new()
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
