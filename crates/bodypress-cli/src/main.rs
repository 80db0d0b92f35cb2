// BodyPress - Outbound Payload Compression
// Copyright (C) 2025 BodyPress Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.

//! `bodypress` command-line tool

mod commands;

use anyhow::{Context, Result};
use bodypress_config::{Config, ConfigLoader};
use bodypress_observability::{init_tracing_with_config, LogConfig, LogFormat};
use clap::{Parser, Subcommand};
use commands::*;
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bodypress")]
#[command(version, about = "Compress outbound message bodies the way a transport would")]
#[command(propagate_version = true)]
#[command(author = "BodyPress Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log format (pretty|compact|json), overrides the configuration
    #[arg(long, global = true, value_name = "FORMAT")]
    log_format: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List compression algorithm identifiers
    Algorithms(AlgorithmsCmd),

    /// Compress a body and write it out
    Compress(CompressCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loader = ConfigLoader::new();
    let config = match &cli.config {
        Some(path) => loader
            .load_with_overrides(path)
            .await
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => loader
            .load_from_env()
            .context("Invalid configuration in environment")?,
    };

    init_logging(&cli, &config)?;

    match cli.command {
        Commands::Algorithms(cmd) => cmd.execute(&config),
        Commands::Compress(cmd) => cmd.execute(&config).await,
    }
}

/// Install the tracing subscriber on stderr; stdout may carry the body
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let format_name = cli
        .log_format
        .as_deref()
        .unwrap_or(&config.observability.log_format);
    let format: LogFormat = format_name.parse()?;

    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        config.observability.log_level.as_str()
    };

    let log_config = LogConfig::new()
        .with_format(format)
        .with_level(level)
        .with_color(std::io::stderr().is_terminal());

    init_tracing_with_config(log_config).context("Failed to initialize logging")
}
