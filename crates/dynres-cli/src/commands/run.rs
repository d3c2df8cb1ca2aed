//! `dynres run` — live loop against a trace or synthetic load.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::watch;
use tracing::info;

use dynres_core::ResolutionController;
use dynres_host::{
    ApplyCallback, ReplaySampler, ScaleLoop, SharedController, SyntheticSampler, UsageSampler,
    console_directive,
};

/// Full period of the synthetic wave, in ticks. Long enough that both
/// debounce thresholds are met on each slope at the default config.
const SYNTHETIC_PERIOD_TICKS: u64 = 120;

pub async fn run(
    trace: Option<PathBuf>,
    synthetic: bool,
    interval_ms: u64,
    config: Option<PathBuf>,
    cvar: &str,
) -> anyhow::Result<()> {
    let config = super::load_config(config.as_deref())?;
    let shared = SharedController::new(ResolutionController::with_config(config)?);

    let sampler: Box<dyn UsageSampler> = if let Some(path) = trace {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading trace {}", path.display()))?;
        let sampler = ReplaySampler::from_trace(&text)?;
        info!(samples = sampler.remaining(), path = %path.display(), "trace loaded");
        Box::new(sampler)
    } else if synthetic {
        Box::new(SyntheticSampler::new(SYNTHETIC_PERIOD_TICKS))
    } else {
        anyhow::bail!("pass --trace <file> or --synthetic");
    };

    let cvar = cvar.to_string();
    let apply_fn: ApplyCallback = Box::new(move |action| {
        let directive = console_directive(&cvar, &action);
        Box::pin(async move {
            println!("{directive}");
            Ok(())
        })
    });

    let mut scale_loop = ScaleLoop::new(
        shared.clone(),
        sampler,
        Duration::from_millis(interval_ms),
    )
    .with_apply_fn(apply_fn);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let loop_handle = tokio::spawn(async move {
        scale_loop.run(shutdown_rx).await;
    });

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    let _ = shutdown_tx.send(true);
    let _ = loop_handle.await;

    let snapshot = shared.snapshot().await;
    info!(
        resolution = snapshot.resolution_percent,
        "final resolution"
    );
    if let Some(last) = snapshot.last_action {
        info!("last action: {last}");
    }
    Ok(())
}
