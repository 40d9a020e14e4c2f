// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Viewin - job-report workflow service.
//!
//! This is the binary entry point for the Viewin service.

mod migrate;
mod serve;
mod shutdown;
mod token;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Viewin - job-report workflow service.
#[derive(Parser, Debug)]
#[command(name = "viewin", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API server.
    Serve,
    /// Apply database migrations and verify the schema.
    Migrate,
    /// Mint a bearer token for local development.
    Token {
        /// User id carried by the token.
        #[arg(long)]
        user_id: i64,
        /// Token lifetime in seconds.
        #[arg(long, default_value_t = 3600)]
        ttl_secs: i64,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match cli.config.as_deref() {
        Some(path) => viewin_config::load_and_validate_path(path),
        None => viewin_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            viewin_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Migrate => migrate::run_migrate(&config).await,
        Commands::Token { user_id, ttl_secs } => token::run_token(&config, user_id, ttl_secs),
    };

    if let Err(e) = result {
        eprintln!("viewin: {e}");
        std::process::exit(1);
    }
}
