//! Scaling actions and the last-action telemetry record.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which way the resolution moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleDirection {
    Increase,
    Decrease,
}

impl ScaleDirection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
        }
    }
}

impl fmt::Display for ScaleDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single applied change, returned from the tick path for the host to
/// forward to its render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleAction {
    pub direction: ScaleDirection,
    /// The resolution percentage now in effect.
    pub resolution_percent: u8,
}

/// Context of the most recent applied change, kept for display surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub direction: ScaleDirection,
    /// Resolution percentage after the change.
    pub resolution_percent: u8,
    /// The utilization reading that triggered the change.
    pub observed_usage: u8,
    /// Accumulated sample time since the previous change in the same
    /// direction (since construction when there was none).
    pub since_previous: Duration,
    /// Unix timestamp (seconds) when the change fired.
    pub at_epoch: u64,
}

impl fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}% (usage {}%, {:.1}s after previous)",
            self.direction,
            self.resolution_percent,
            self.observed_usage,
            self.since_previous.as_secs_f64(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ScaleDirection::Increase).unwrap(),
            "\"increase\""
        );
        assert_eq!(
            serde_json::to_string(&ScaleDirection::Decrease).unwrap(),
            "\"decrease\""
        );
    }

    #[test]
    fn record_display_is_readable() {
        let record = ActionRecord {
            direction: ScaleDirection::Decrease,
            resolution_percent: 48,
            observed_usage: 95,
            since_previous: Duration::from_secs(11),
            at_epoch: 1_700_000_000,
        };
        assert_eq!(
            record.to_string(),
            "decrease to 48% (usage 95%, 11.0s after previous)"
        );
    }
}
