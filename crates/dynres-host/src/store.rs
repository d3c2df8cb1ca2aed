//! JSON-backed persistence for the controller configuration.
//!
//! One flat object with the six tunable fields at a fixed path. A missing
//! file means first run and yields defaults; fields missing from a stored
//! object fall back individually, so configs written by older builds keep
//! loading. Loaded configs still go through the controller's own
//! validation and coercion when handed to `configure`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use dynres_core::ControllerConfig;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Loads and saves the controller configuration at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored configuration, or defaults when no file exists yet.
    pub fn load(&self) -> StoreResult<ControllerConfig> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored config, using defaults");
                return Ok(ControllerConfig::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Persist the configuration as pretty-printed JSON.
    pub fn save(&self, config: &ControllerConfig) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(config).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "config stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("dynres.json"));
        assert_eq!(store.load().unwrap(), ControllerConfig::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("dynres.json"));
        let config = ControllerConfig {
            usage_lower_bound: 75,
            usage_upper_bound: 88,
            decrease_debounce_ticks: 6,
            ..ControllerConfig::default()
        };
        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn partial_object_fills_defaults_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dynres.json");
        std::fs::write(&path, r#"{"increase_debounce_ticks": 40}"#).unwrap();

        let config = ConfigStore::new(&path).load().unwrap();
        assert_eq!(config.increase_debounce_ticks, 40);
        assert_eq!(config.usage_lower_bound, 82);
    }

    #[test]
    fn malformed_json_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dynres.json");
        std::fs::write(&path, "{ nope").unwrap();

        let err = ConfigStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        assert!(err.to_string().contains("dynres.json"));
    }
}
