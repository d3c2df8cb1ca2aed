use std::path::Path;

use dynres_core::ControllerConfig;
use dynres_host::ConfigStore;

pub mod check;
pub mod run;
pub mod simulate;

/// Load a config file when one was given, defaults otherwise.
pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<ControllerConfig> {
    match path {
        Some(path) => Ok(ConfigStore::new(path).load()?),
        None => Ok(ControllerConfig::default()),
    }
}
