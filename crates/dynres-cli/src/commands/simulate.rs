//! `dynres simulate` — offline trace replay.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use dynres_core::ResolutionController;
use dynres_host::parse_trace;

pub fn simulate(
    trace: &Path,
    tick_secs: f64,
    config: Option<PathBuf>,
    start: u8,
    json: bool,
) -> anyhow::Result<()> {
    // NaN, negatives, and values past Duration::MAX all fail here.
    let tick_elapsed = Duration::try_from_secs_f64(tick_secs)
        .with_context(|| format!("invalid --tick-secs {}", tick_secs))?;

    let config = super::load_config(config.as_deref())?;
    let mut controller = ResolutionController::with_resolution(config, start)?;

    let text = std::fs::read_to_string(trace)
        .with_context(|| format!("reading trace {}", trace.display()))?;
    let samples = parse_trace(&text)?;

    let report = dynres_host::simulate(&mut controller, &samples, tick_elapsed);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for event in &report.events {
        println!(
            "tick {:>6}  {} -> {}%",
            event.tick, event.action.direction, event.action.resolution_percent
        );
    }
    if !report.events.is_empty() {
        println!();
    }
    println!("ticks: {} ({} unavailable)", report.ticks, report.unavailable);
    println!(
        "actions: {} increase, {} decrease",
        report.increases, report.decreases
    );
    println!("final resolution: {}%", report.final_resolution_percent);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("usage.trace");
        std::fs::write(&path, "95\n95\n95\n").unwrap();
        path
    }

    #[test]
    fn rejects_tick_secs_no_duration_can_hold() {
        let dir = tempfile::tempdir().unwrap();
        let trace = trace_file(&dir);
        for bad in [1.0e30, f64::INFINITY, f64::NAN, -1.0] {
            let err = simulate(&trace, bad, None, 50, false).unwrap_err();
            assert!(err.to_string().contains("--tick-secs"), "{}: {}", bad, err);
        }
    }

    #[test]
    fn largest_representable_tick_secs_replays_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let trace = trace_file(&dir);
        // Three ticks at ~1e19 s overflow the telemetry accumulators,
        // which saturate instead of aborting the replay.
        simulate(&trace, 1.0e19, None, 50, false).unwrap();
    }
}
