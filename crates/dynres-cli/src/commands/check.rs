//! `dynres check-config` — validate a config file without running anything.

use std::path::Path;

use dynres_host::ConfigStore;

pub fn check(path: &Path) -> anyhow::Result<()> {
    anyhow::ensure!(path.exists(), "no config file at {}", path.display());

    let config = ConfigStore::new(path).load()?;
    config.validate()?;
    let (applied, adjusted) = config.sanitize();

    if adjusted.is_empty() {
        println!("{}: ok", path.display());
    } else {
        println!("{}: {} field(s) coerced", path.display(), adjusted.len());
        for adjustment in &adjusted {
            println!(
                "  {}: {} -> {}",
                adjustment.field, adjustment.requested, adjustment.applied
            );
        }
    }

    println!("effective config:");
    println!("{}", serde_json::to_string_pretty(&applied)?);
    Ok(())
}
