//! Actuation — forwarding controller actions to the host.
//!
//! The tick loop hands every fired [`ScaleAction`] to a callback; what
//! "applying" means is the host's business. The reference host drives a
//! game engine console, so the helper here renders the directive string
//! such a console expects.

use dynres_core::ScaleAction;

/// Callback type for applying a fired action.
///
/// The loop awaits the returned future before the next tick; a failure is
/// logged and the loop keeps going, since the controller state has already
/// moved on.
pub type ApplyCallback = Box<dyn Fn(ScaleAction) -> BoxFuture + Send + Sync>;

type BoxFuture =
    std::pin::Pin<Box<dyn std::future::Future<Output = anyhow::Result<()>> + Send>>;

/// Console variable the reference host sets for render scale.
pub const DEFAULT_SCALE_CVAR: &str = "r.ScreenPercentage";

/// Render the console directive that applies `action` through `cvar`.
pub fn console_directive(cvar: &str, action: &ScaleAction) -> String {
    format!("{} {}", cvar, action.resolution_percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynres_core::ScaleDirection;

    #[test]
    fn directive_uses_cvar_and_new_value() {
        let action = ScaleAction {
            direction: ScaleDirection::Decrease,
            resolution_percent: 48,
        };
        assert_eq!(
            console_directive(DEFAULT_SCALE_CVAR, &action),
            "r.ScreenPercentage 48"
        );
        assert_eq!(
            console_directive("r.SecondaryScreenPercentage", &action),
            "r.SecondaryScreenPercentage 48"
        );
    }
}
