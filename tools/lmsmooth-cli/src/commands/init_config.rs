//! Write a default configuration file.

use std::path::PathBuf;

use lmsmooth_common::config::{config_file_path, AppConfig};

pub fn run(output: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = output.unwrap_or_else(config_file_path);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let config = AppConfig::default();
    config
        .save_to(&path)
        .map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))?;

    println!("Config written to {}", path.display());
    println!("  Method: {:?}", config.smoothing.method);
    println!(
        "  1€: min_cutoff={} beta={} derivative_cutoff={}",
        config.smoothing.one_euro.min_cutoff,
        config.smoothing.one_euro.beta,
        config.smoothing.one_euro.derivative_cutoff
    );

    Ok(())
}
