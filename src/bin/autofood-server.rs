// ABOUTME: Autofood server binary entry point
// ABOUTME: Loads configuration, initializes logging, seeds demo recipes, and serves the REST API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Autofood Server Binary
//!
//! Starts the in-memory kitchen service: recipes, cooking sessions and
//! consumption tracking over JSON REST.

use std::sync::Arc;

use anyhow::Result;
use autofood_server::{config::ServerConfig, logging, resources::ServerResources, server};
use clap::Parser;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "autofood-server")]
#[command(about = "Autofood - recipes, cooking sessions and food waste tracking")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Start with an empty recipe catalog
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;
    info!("Starting Autofood server");
    info!("{}", config.summary());
    config.validate()?;

    let resources = Arc::new(ServerResources::new(config));
    if !args.no_seed {
        let seeded = resources.recipes.seed_demo_recipes()?;
        info!(recipes = seeded, "Demo recipes loaded");
    }

    if let Err(e) = server::run(resources).await {
        error!(error = %e, "Server terminated with error");
        return Err(e);
    }
    info!("Autofood server stopped");
    Ok(())
}
