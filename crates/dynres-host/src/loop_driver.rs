//! The tick loop — samples, advances the controller, applies actions.
//!
//! Concurrency model: the controller itself is plain data; one
//! [`SharedController`] mutex at the host boundary serializes the tick
//! path against a settings surface calling `configure` or `snapshot` from
//! another task. Every entry point goes through the lock, so a sample
//! never observes a half-applied config.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, watch};
use tracing::{info, trace, warn};

use dynres_core::{
    ConfigError, ControllerConfig, ControllerSnapshot, FieldAdjustment, ResolutionController,
    ScaleAction,
};

use crate::apply::ApplyCallback;
use crate::sampler::UsageSampler;

/// Cloneable handle to the one controller instance a host runs.
#[derive(Clone)]
pub struct SharedController {
    inner: Arc<Mutex<ResolutionController>>,
}

impl SharedController {
    pub fn new(controller: ResolutionController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    /// Feed one reading through the lock. See
    /// [`ResolutionController::on_sample`].
    pub async fn on_sample(&self, usage: Option<u8>, elapsed: Duration) -> Option<ScaleAction> {
        self.inner.lock().await.on_sample(usage, elapsed)
    }

    /// Replace the configuration through the lock. See
    /// [`ResolutionController::configure`].
    pub async fn configure(
        &self,
        config: ControllerConfig,
    ) -> Result<Vec<FieldAdjustment>, ConfigError> {
        self.inner.lock().await.configure(config)
    }

    pub async fn snapshot(&self) -> ControllerSnapshot {
        self.inner.lock().await.snapshot()
    }
}

/// Drives a [`SharedController`] from a sampler at a fixed interval.
pub struct ScaleLoop {
    controller: SharedController,
    sampler: Box<dyn UsageSampler>,
    apply_fn: Option<ApplyCallback>,
    interval: Duration,
}

impl ScaleLoop {
    pub fn new(
        controller: SharedController,
        sampler: Box<dyn UsageSampler>,
        interval: Duration,
    ) -> Self {
        Self {
            controller,
            sampler,
            apply_fn: None,
            interval,
        }
    }

    /// Set the callback that forwards fired actions to the host.
    pub fn with_apply_fn(mut self, f: ApplyCallback) -> Self {
        self.apply_fn = Some(f);
        self
    }

    /// Run one tick: sample, advance the controller, forward any action.
    ///
    /// An apply failure is logged and swallowed; the controller has
    /// already committed the change, and the next action will set the
    /// host straight.
    pub async fn tick(&mut self, elapsed: Duration) -> Option<ScaleAction> {
        let usage = self.sampler.sample();
        trace!(?usage, "tick");

        let action = self.controller.on_sample(usage, elapsed).await;
        if let Some(action) = action
            && let Some(ref apply_fn) = self.apply_fn
            && let Err(e) = apply_fn(action).await
        {
            warn!(
                direction = %action.direction,
                resolution = action.resolution_percent,
                error = %e,
                "apply callback failed"
            );
        }
        action
    }

    /// Tick at the configured interval until the shutdown signal flips.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            "scale loop started"
        );

        let mut last = Instant::now();
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {
                    let now = Instant::now();
                    let elapsed = now - last;
                    last = now;
                    self.tick(elapsed).await;
                }
                _ = shutdown.changed() => {
                    info!("scale loop shutting down");
                    break;
                }
            }
        }
    }
}
