//! Offline replay — run a whole trace through a controller at once.
//!
//! No clocks, no tasks: ticks are loop iterations with a fixed synthetic
//! `elapsed`, so a trace replays in microseconds and the outcome is fully
//! deterministic. This is how threshold changes get evaluated against
//! recorded sessions before anyone ships them.

use std::time::Duration;

use serde::Serialize;

use dynres_core::{ResolutionController, ScaleAction, ScaleDirection};

/// One fired action and the 1-based tick it fired on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimEvent {
    pub tick: usize,
    #[serde(flatten)]
    pub action: ScaleAction,
}

/// Outcome of replaying a trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimReport {
    pub ticks: usize,
    /// Readings the controller discarded (missing or out of range).
    pub unavailable: usize,
    pub increases: usize,
    pub decreases: usize,
    pub final_resolution_percent: u8,
    pub events: Vec<SimEvent>,
}

/// Feed every sample through the controller with a fixed per-tick elapsed.
pub fn simulate(
    controller: &mut ResolutionController,
    samples: &[Option<u8>],
    tick_elapsed: Duration,
) -> SimReport {
    let mut events = Vec::new();
    let mut unavailable = 0;
    let mut increases = 0;
    let mut decreases = 0;

    for (idx, sample) in samples.iter().enumerate() {
        match sample {
            Some(value) if *value <= 100 => {}
            _ => unavailable += 1,
        }
        if let Some(action) = controller.on_sample(*sample, tick_elapsed) {
            match action.direction {
                ScaleDirection::Increase => increases += 1,
                ScaleDirection::Decrease => decreases += 1,
            }
            events.push(SimEvent {
                tick: idx + 1,
                action,
            });
        }
    }

    SimReport {
        ticks: samples.len(),
        unavailable,
        increases,
        decreases,
        final_resolution_percent: controller.resolution_percent(),
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynres_core::ControllerConfig;

    fn controller_at(percent: u8) -> ResolutionController {
        ResolutionController::with_resolution(ControllerConfig::default(), percent).unwrap()
    }

    #[test]
    fn quiet_trace_produces_one_increase_at_the_threshold() {
        let samples = vec![Some(80); 21];
        let mut controller = controller_at(50);
        let report = simulate(&mut controller, &samples, Duration::from_secs(1));

        assert_eq!(report.ticks, 21);
        assert_eq!(report.unavailable, 0);
        assert_eq!(report.increases, 1);
        assert_eq!(report.decreases, 0);
        assert_eq!(report.final_resolution_percent, 51);
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.events[0].tick, 21);
    }

    #[test]
    fn mixed_trace_counts_each_kind() {
        // 11 loaded ticks fire a decrease; a dropout pauses the next
        // streak, which then completes; the tail is quiet but too short
        // to earn an increase.
        let mut samples = vec![Some(95); 11];
        samples.extend([None, None]);
        samples.extend(vec![Some(95); 11]);
        samples.extend(vec![Some(80); 10]);

        let mut controller = controller_at(50);
        let report = simulate(&mut controller, &samples, Duration::from_secs(1));

        assert_eq!(report.ticks, 34);
        assert_eq!(report.unavailable, 2);
        assert_eq!(report.decreases, 2);
        assert_eq!(report.increases, 0);
        assert_eq!(report.final_resolution_percent, 46);
        assert_eq!(
            report.events.iter().map(|e| e.tick).collect::<Vec<_>>(),
            vec![11, 24]
        );
    }

    #[test]
    fn out_of_range_readings_count_as_unavailable() {
        let samples = vec![Some(120), Some(255), None, Some(85)];
        let mut controller = controller_at(50);
        let report = simulate(&mut controller, &samples, Duration::from_secs(1));
        assert_eq!(report.unavailable, 3);
        assert!(report.events.is_empty());
    }

    #[test]
    fn report_serializes_flat_events() {
        let samples = vec![Some(95); 11];
        let mut controller = controller_at(50);
        let report = simulate(&mut controller, &samples, Duration::from_secs(1));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["events"][0]["tick"], 11);
        assert_eq!(json["events"][0]["direction"], "decrease");
        assert_eq!(json["events"][0]["resolution_percent"], 48);
    }
}
