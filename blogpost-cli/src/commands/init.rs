//! Write the local configuration.

use anyhow::Result;
use std::path::Path;

use crate::config::CliConfig;

/// Run the init command.
pub async fn run(data_dir: &Path, api_url: Option<&str>) -> Result<()> {
    // Check if already configured
    if CliConfig::exists(data_dir).await {
        anyhow::bail!(
            "Already configured. Delete {} to reconfigure.",
            data_dir.join("config.json").display()
        );
    }

    let config = match api_url {
        Some(url) => CliConfig::new(url),
        None => CliConfig::default(),
    };
    config.save(data_dir).await?;

    println!("Configuration written!");
    println!();
    println!("  API:      {}", config.api_url);
    println!("  Data dir: {}", data_dir.display());
    println!();
    println!("Next steps:");
    println!("  1. Register an account: blogpost-cli register --name <name> --email <email>");
    println!("  2. Or log in: blogpost-cli login --email <email>");

    Ok(())
}
