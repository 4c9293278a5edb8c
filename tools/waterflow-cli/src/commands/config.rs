//! Show or write the configuration.

use waterflow_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, write: bool) -> anyhow::Result<()> {
    if write {
        let path = AppConfig::default().save()?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    println!("# {}", config_file_path().display());
    println!("{}", serde_json::to_string_pretty(config)?);

    if let Err(e) = config.validate() {
        println!("\n[WARN] {e}");
    }
    Ok(())
}
