//! Error types for controller configuration.

use thiserror::Error;

/// Configuration input the controller refuses to coerce.
///
/// Out-of-range bounds are repaired by clamping rather than rejected; only
/// values that would make the controller malfunction silently are errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A step size of zero would let the controller "fire" actions that
    /// never move the resolution, spinning forever at the same value.
    #[error("{field} must be at least 1")]
    ZeroStep { field: &'static str },
}
