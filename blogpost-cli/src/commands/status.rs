//! Show local configuration and session state.

use anyhow::Result;
use std::path::Path;

use blogpost_client::StateStore;

use crate::config::CliConfig;

/// Run the status command. Stays offline: everything shown here comes
/// from the local files, so it works without the server.
pub async fn run(data_dir: &Path, api_url: &str) -> Result<()> {
    println!("=== blogpost-cli status ===");
    println!();
    println!("API:      {}", api_url);
    println!("Data dir: {}", data_dir.display());
    if !CliConfig::exists(data_dir).await {
        println!("          (no config file, using defaults)");
    }
    println!();

    let store = StateStore::at(data_dir);

    match store.load_token().await {
        Ok(Some(_)) => println!("Session: token stored (run 'blogpost-cli whoami' to validate)"),
        Ok(None) => {
            println!("Session: not logged in");
            println!();
            println!("Run 'blogpost-cli login --email <email>' to log in.");
            return Ok(());
        }
        Err(e) => {
            println!("Session: stored token is unreadable ({})", e);
            println!();
            println!("Run 'blogpost-cli logout' to clear it.");
            return Ok(());
        }
    }

    match store.load_liked().await {
        Ok(Some(liked)) => {
            println!("  Liked posts: {}", liked.len());
            if let Some(owner) = liked.owner() {
                println!("  Liked as:    {}", owner);
            }
            for id in liked.ids() {
                println!("    - {}", id);
            }
        }
        Ok(None) => println!("  Liked posts: none recorded"),
        Err(e) => println!("  Liked posts: unreadable ({})", e),
    }

    Ok(())
}
