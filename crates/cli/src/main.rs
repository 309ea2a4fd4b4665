//! Watchshop CLI - operator tools for the data directory.
//!
//! # Usage
//!
//! ```bash
//! # Create an admin for /admin/login
//! ws-cli admin create -u admin@example.com -p 'correct horse'
//!
//! # Create a site user, optionally with admin rights
//! ws-cli user create -u alice@example.com -p hunter2 --admin
//!
//! # Load watches from YAML, replacing the current catalog
//! ws-cli seed watches -f watches.yaml --clear
//!
//! # Verify every data file parses
//! ws-cli check
//! ```
//!
//! Every command takes `--data-dir` (or `WATCHSHOP_DATA_DIR`, default `data`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

#[derive(Parser)]
#[command(name = "ws-cli")]
#[command(author, version, about = "Watchshop operator tools")]
struct Cli {
    /// Directory holding users.json, watches.json and admins.json
    #[arg(long, env = "WATCHSHOP_DATA_DIR", default_value = "data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage admin credentials
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Manage site users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Load data from files
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Load every data file and report record counts
    Check,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Append an admin to admins.json
    Create {
        /// Admin username
        #[arg(short, long)]
        username: String,

        /// Admin password (stored as an Argon2 hash)
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Register a user in users.json
    Create {
        /// Username (also the account email)
        #[arg(short, long)]
        username: String,

        /// Password (stored as an Argon2 hash)
        #[arg(short, long)]
        password: String,

        /// Give the user access to the admin API
        #[arg(long)]
        admin: bool,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Append watches from a YAML list
    Watches {
        /// Path to the YAML file
        #[arg(short, long)]
        file: PathBuf,

        /// Remove all existing watches first
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() {
    // Pick up WATCHSHOP_DATA_DIR from .env before clap reads the environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = cli.data_dir;

    match cli.command {
        Commands::Admin { action } => match action {
            AdminAction::Create { username, password } => {
                commands::admin::create(&data_dir, &username, &SecretString::from(password))
                    .await?;
            }
        },
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                password,
                admin,
            } => {
                commands::user::create(&data_dir, &username, &SecretString::from(password), admin)
                    .await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Watches { file, clear } => {
                commands::seed::watches(&data_dir, &file, clear).await?;
            }
        },
        Commands::Check => {
            commands::check::run(&data_dir).await?;
        }
    }
    Ok(())
}
