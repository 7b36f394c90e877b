// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # export-onnx
//!
//! Command-line entry point of the classifier export pipeline.
//!
//! ## Usage
//! ```bash
//! # Convert, validate and publish using the install root's models/ directory
//! export-onnx
//!
//! # Same, pinned to an opset and a reproducible smoke input
//! export-onnx --revision 17 --seed 42 --parity-tolerance 1e-4
//!
//! # Describe the classifier and any graph already exported
//! export-onnx inspect
//!
//! # Write the raw linear parameters as JSON instead of a graph
//! export-onnx params
//! ```
//!
//! Exit status is 0 on success and 1 on any failure.

mod commands;

use clap::{Parser, Subcommand};
use export_pipeline::Capabilities;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "export-onnx",
    about = "Convert a trained linear classifier to ONNX, validate it and update its descriptor",
    version,
    author
)]
struct Cli {
    /// Install root the default model paths resolve against
    /// (defaults to the executable's directory, or its parent for `bin/`).
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Path to a TOML configuration file (defaults to `<root>/export.toml`).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// ONNX opset revision to target.
    #[arg(long, global = true)]
    revision: Option<u32>,

    /// Seed for the synthetic validation input.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Compare the graph with the native model within this tolerance.
    #[arg(long, global = true)]
    parity_tolerance: Option<f32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert, validate and publish (the default).
    Export,

    /// Describe the classifier, its descriptor and any exported graph.
    Inspect {
        /// Graph to decode instead of the configured output path.
        #[arg(short, long)]
        graph: Option<PathBuf>,
    },

    /// Report which optional capabilities this build carries.
    Capabilities,

    /// Write the raw linear parameters as JSON.
    Params {
        /// Output file instead of the configured `params_path`.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    let overrides = commands::Overrides {
        revision: cli.revision,
        seed: cli.seed,
        parity_tolerance: cli.parity_tolerance,
    };

    let (root, config_path) = (cli.root, cli.config);
    let config = move || commands::resolve_config(root, config_path, &overrides);

    let result = match cli.command.unwrap_or(Commands::Export) {
        // Capabilities are probed before the configuration file is read.
        Commands::Export => commands::export::execute(Capabilities::probe(), config),
        Commands::Inspect { graph } => {
            config().and_then(|config| commands::inspect::execute(config, graph))
        }
        Commands::Capabilities => commands::capabilities::execute(),
        Commands::Params { output } => {
            config().and_then(|config| commands::params::execute(config, output))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            commands::report_failure(&e);
            ExitCode::FAILURE
        }
    }
}
