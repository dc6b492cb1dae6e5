//! # blogpost-cli
//!
//! Command-line client for the Blog-Post REST API.
//!
//! ## Commands
//!
//! - `init`: Write the local configuration
//! - `register` / `login` / `logout` / `whoami`: Session management
//! - `list` / `home`: Browse posts
//! - `add` / `edit` / `delete`: Author posts
//! - `like` / `unlike`: Like posts
//! - `comment` / `comments`: Comment on posts
//! - `status`: Show local state
//!
//! ## Example
//!
//! ```bash
//! # Point the CLI at a backend (optional, defaults to the public one)
//! blogpost-cli init --api-url https://blog.example/api
//!
//! # Log in and browse
//! blogpost-cli login --email me@example.com
//! blogpost-cli list
//!
//! # Publish and interact
//! blogpost-cli add --title "Hello" --description "First post" --img-url https://img.example/1.png
//! blogpost-cli like <post-id>
//! blogpost-cli comment <post-id> "Nice one"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{auth, comment, init, like, post, posts, status};
use config::CliConfig;

/// Command-line client for the Blog-Post REST API.
#[derive(Parser, Debug)]
#[command(name = "blogpost-cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data directory for the session token and liked posts
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// API base URL (overrides the configured one)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the local configuration
    Init {
        /// API base URL to store
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Register a new account
    Register {
        /// Display name
        #[arg(long, short)]
        name: String,

        /// Email address
        #[arg(long, short)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(long, short)]
        password: Option<String>,
    },

    /// Log in
    Login {
        /// Email address
        #[arg(long, short)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(long, short)]
        password: Option<String>,
    },

    /// Log out and forget the stored session
    Logout,

    /// Show the logged-in user's profile
    Whoami,

    /// List all posts
    List,

    /// Show a random selection of posts, like the web home page
    Home,

    /// Add a post
    Add {
        /// Post title
        #[arg(long, short)]
        title: String,

        /// Post body
        #[arg(long, short)]
        description: String,

        /// Image URL
        #[arg(long, short)]
        img_url: String,
    },

    /// Edit a post (fields left out keep their current value)
    Edit {
        /// Post id
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New body
        #[arg(long)]
        description: Option<String>,

        /// New image URL
        #[arg(long)]
        img_url: Option<String>,
    },

    /// Delete a post
    Delete {
        /// Post id
        id: String,
    },

    /// Like a post
    Like {
        /// Post id
        id: String,
    },

    /// Remove your like from a post
    Unlike {
        /// Post id
        id: String,
    },

    /// Comment on a post
    Comment {
        /// Post id
        id: String,

        /// Comment text
        text: String,
    },

    /// Show a post's comment thread
    Comments {
        /// Post id
        id: String,
    },

    /// Show local configuration and session state
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    // Determine data directory
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    tracing::debug!("data directory: {}", data_dir.display());

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir)
        .await
        .context("Failed to create data directory")?;

    // Flag beats config file, config file beats the built-in default
    let api_url = match cli.api_url {
        Some(url) => url,
        None => CliConfig::load_or_default(&data_dir).await?.api_url,
    };

    match cli.command {
        Commands::Init { api_url } => {
            init::run(&data_dir, api_url.as_deref()).await?;
        }
        Commands::Register {
            name,
            email,
            password,
        } => {
            auth::register(&data_dir, &api_url, &name, &email, password.as_deref()).await?;
        }
        Commands::Login { email, password } => {
            auth::login(&data_dir, &api_url, &email, password.as_deref()).await?;
        }
        Commands::Logout => {
            auth::logout(&data_dir, &api_url).await?;
        }
        Commands::Whoami => {
            auth::whoami(&data_dir, &api_url).await?;
        }
        Commands::List => {
            posts::list(&data_dir, &api_url).await?;
        }
        Commands::Home => {
            posts::home(&data_dir, &api_url).await?;
        }
        Commands::Add {
            title,
            description,
            img_url,
        } => {
            post::add(&data_dir, &api_url, &title, &description, &img_url).await?;
        }
        Commands::Edit {
            id,
            title,
            description,
            img_url,
        } => {
            post::edit(
                &data_dir,
                &api_url,
                &id,
                title.as_deref(),
                description.as_deref(),
                img_url.as_deref(),
            )
            .await?;
        }
        Commands::Delete { id } => {
            post::delete(&data_dir, &api_url, &id).await?;
        }
        Commands::Like { id } => {
            like::like(&data_dir, &api_url, &id).await?;
        }
        Commands::Unlike { id } => {
            like::unlike(&data_dir, &api_url, &id).await?;
        }
        Commands::Comment { id, text } => {
            comment::add(&data_dir, &api_url, &id, &text).await?;
        }
        Commands::Comments { id } => {
            comment::list(&data_dir, &api_url, &id).await?;
        }
        Commands::Status => {
            status::run(&data_dir, &api_url).await?;
        }
    }

    Ok(())
}

/// Get the default data directory for blogpost-cli.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("dev", "blogpost", "blogpost-cli")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
