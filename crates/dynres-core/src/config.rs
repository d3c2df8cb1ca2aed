//! Controller configuration — the six tunables and their coercion rules.
//!
//! Configuration is forgiving by design: a settings surface can hand over
//! whatever the user typed, and [`ControllerConfig::sanitize`] repairs it
//! into a usable shape, reporting every field it touched. The only inputs
//! rejected outright are step sizes of zero (see
//! [`ControllerConfig::validate`]), because a zero step cannot be repaired
//! without guessing intent.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Minimum separation kept between the usage bounds. A narrower band makes
/// the controller oscillate between increase and decrease on noise alone.
pub const BOUND_MARGIN: u8 = 5;

/// Usage readings and bounds are percentages.
const MAX_PERCENT: u8 = 100;

const fn default_usage_lower_bound() -> u8 {
    82
}

const fn default_usage_upper_bound() -> u8 {
    92
}

const fn default_increase_step() -> u8 {
    1
}

const fn default_decrease_step() -> u8 {
    2
}

const fn default_increase_debounce_ticks() -> u32 {
    20
}

const fn default_decrease_debounce_ticks() -> u32 {
    10
}

/// Tunable parameters of the resolution controller.
///
/// Serialized as a flat JSON object under these exact field names; fields
/// absent from a stored object fall back to their defaults individually,
/// so configs written by older builds keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Utilization at or below which the GPU has headroom to spare.
    #[serde(default = "default_usage_lower_bound")]
    pub usage_lower_bound: u8,
    /// Utilization at or above which the frame budget is blown.
    #[serde(default = "default_usage_upper_bound")]
    pub usage_upper_bound: u8,
    /// Percentage points added per increase.
    #[serde(default = "default_increase_step")]
    pub increase_step: u8,
    /// Percentage points removed per decrease.
    #[serde(default = "default_decrease_step")]
    pub decrease_step: u8,
    /// Consecutive under-budget ticks required before an increase fires.
    #[serde(default = "default_increase_debounce_ticks")]
    pub increase_debounce_ticks: u32,
    /// Consecutive over-budget ticks required before a decrease fires.
    #[serde(default = "default_decrease_debounce_ticks")]
    pub decrease_debounce_ticks: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            usage_lower_bound: default_usage_lower_bound(),
            usage_upper_bound: default_usage_upper_bound(),
            increase_step: default_increase_step(),
            decrease_step: default_decrease_step(),
            increase_debounce_ticks: default_increase_debounce_ticks(),
            decrease_debounce_ticks: default_decrease_debounce_ticks(),
        }
    }
}

/// A single field the coercion pass changed, reported so a settings
/// surface can show the user what was actually applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldAdjustment {
    /// Serialized name of the adjusted field.
    pub field: &'static str,
    /// Value as requested.
    pub requested: u32,
    /// Value actually applied.
    pub applied: u32,
}

impl ControllerConfig {
    /// Check the invariants coercion cannot repair.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.increase_step == 0 {
            return Err(ConfigError::ZeroStep {
                field: "increase_step",
            });
        }
        if self.decrease_step == 0 {
            return Err(ConfigError::ZeroStep {
                field: "decrease_step",
            });
        }
        Ok(())
    }

    /// Clamp the configuration into a usable shape.
    ///
    /// Bounds are clamped into `0..=100`, then the upper bound is raised
    /// to sit at least [`BOUND_MARGIN`] points above the lower bound. When
    /// the lower bound is too close to 100 for that, the lower bound comes
    /// down instead and the upper bound caps at 100. Pure and idempotent:
    /// sanitizing an already-sanitized config changes nothing.
    ///
    /// Returns the repaired config together with one [`FieldAdjustment`]
    /// per field that differs from the input.
    pub fn sanitize(&self) -> (ControllerConfig, Vec<FieldAdjustment>) {
        let mut out = self.clone();

        out.usage_lower_bound = out.usage_lower_bound.min(MAX_PERCENT);
        out.usage_upper_bound = out.usage_upper_bound.min(MAX_PERCENT);

        if out.usage_upper_bound < out.usage_lower_bound + BOUND_MARGIN {
            if out.usage_lower_bound <= MAX_PERCENT - BOUND_MARGIN {
                out.usage_upper_bound = out.usage_lower_bound + BOUND_MARGIN;
            } else {
                out.usage_lower_bound = MAX_PERCENT - BOUND_MARGIN;
                out.usage_upper_bound = MAX_PERCENT;
            }
        }

        let mut adjusted = Vec::new();
        record_change(
            &mut adjusted,
            "usage_lower_bound",
            self.usage_lower_bound,
            out.usage_lower_bound,
        );
        record_change(
            &mut adjusted,
            "usage_upper_bound",
            self.usage_upper_bound,
            out.usage_upper_bound,
        );
        (out, adjusted)
    }
}

fn record_change(adjusted: &mut Vec<FieldAdjustment>, field: &'static str, from: u8, to: u8) {
    if from != to {
        adjusted.push(FieldAdjustment {
            field,
            requested: from as u32,
            applied: to as u32,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let config = ControllerConfig::default();
        assert_eq!(config.usage_lower_bound, 82);
        assert_eq!(config.usage_upper_bound, 92);
        assert_eq!(config.increase_step, 1);
        assert_eq!(config.decrease_step, 2);
        assert_eq!(config.increase_debounce_ticks, 20);
        assert_eq!(config.decrease_debounce_ticks, 10);
    }

    #[test]
    fn sanitize_leaves_valid_config_alone() {
        let config = ControllerConfig::default();
        let (applied, adjusted) = config.sanitize();
        assert_eq!(applied, config);
        assert!(adjusted.is_empty());
    }

    #[test]
    fn sanitize_raises_upper_bound_to_keep_margin() {
        // Lower bound pushed up against the upper bound: the upper bound
        // gives way, not the lower.
        let config = ControllerConfig {
            usage_lower_bound: 90,
            usage_upper_bound: 92,
            ..ControllerConfig::default()
        };
        let (applied, adjusted) = config.sanitize();
        assert_eq!(applied.usage_lower_bound, 90);
        assert_eq!(applied.usage_upper_bound, 95);
        assert_eq!(
            adjusted,
            vec![FieldAdjustment {
                field: "usage_upper_bound",
                requested: 92,
                applied: 95,
            }]
        );
    }

    #[test]
    fn sanitize_caps_at_top_of_range() {
        // Lower bound so high the margin cannot fit below 100.
        let config = ControllerConfig {
            usage_lower_bound: 98,
            usage_upper_bound: 99,
            ..ControllerConfig::default()
        };
        let (applied, adjusted) = config.sanitize();
        assert_eq!(applied.usage_lower_bound, 95);
        assert_eq!(applied.usage_upper_bound, 100);
        assert_eq!(adjusted.len(), 2);
    }

    #[test]
    fn sanitize_clamps_out_of_range_percentages() {
        let config = ControllerConfig {
            usage_lower_bound: 200,
            usage_upper_bound: 250,
            ..ControllerConfig::default()
        };
        let (applied, _) = config.sanitize();
        assert_eq!(applied.usage_lower_bound, 95);
        assert_eq!(applied.usage_upper_bound, 100);
    }

    #[test]
    fn sanitize_is_idempotent() {
        let wild = ControllerConfig {
            usage_lower_bound: 99,
            usage_upper_bound: 3,
            ..ControllerConfig::default()
        };
        let (once, _) = wild.sanitize();
        let (twice, adjusted) = once.sanitize();
        assert_eq!(once, twice);
        assert!(adjusted.is_empty());
    }

    #[test]
    fn validate_rejects_zero_steps() {
        let mut config = ControllerConfig::default();
        config.increase_step = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroStep {
                field: "increase_step"
            })
        );

        let mut config = ControllerConfig::default();
        config.decrease_step = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroStep {
                field: "decrease_step"
            })
        );
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: ControllerConfig =
            serde_json::from_str(r#"{"usage_lower_bound": 70}"#).unwrap();
        assert_eq!(config.usage_lower_bound, 70);
        assert_eq!(config.usage_upper_bound, 92);
        assert_eq!(config.decrease_debounce_ticks, 10);
    }

    #[test]
    fn unknown_json_fields_are_ignored() {
        let config: ControllerConfig =
            serde_json::from_str(r#"{"usage_upper_bound": 90, "legacy_knob": true}"#).unwrap();
        assert_eq!(config.usage_upper_bound, 90);
    }

    #[test]
    fn config_json_round_trips() {
        let config = ControllerConfig {
            usage_lower_bound: 75,
            usage_upper_bound: 88,
            increase_step: 3,
            decrease_step: 5,
            increase_debounce_ticks: 40,
            decrease_debounce_ticks: 4,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: ControllerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
