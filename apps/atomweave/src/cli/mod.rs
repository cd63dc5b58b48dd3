//! # atomweave CLI Module
//!
//! This module implements the CLI interface for atomweave.
//!
//! ## Available Commands
//!
//! - `demo` - End-to-end identity scenario
//! - `stress` - Concurrent increments against one atom
//! - `frames` - Frame-DAG teardown walk-through
//! - `types` - List the type table
//! - `config` - Show the effective configuration

mod commands;

use crate::config::load_config;
use atomweave_core::AtomError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// atomweave - in-memory hypergraph atom store
///
/// Inspection tool that drives the store through fixed scenarios.
#[derive(Parser, Debug)]
#[command(name = "atomweave")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build A, B and L=[A,B]; install, remove and recreate L
    Demo,

    /// Increment one counter from many threads and check the total
    Stress {
        /// Number of writer threads
        #[arg(short, long, default_value = "8")]
        threads: usize,

        /// Increments per thread
        #[arg(short, long, default_value = "10000")]
        increments: usize,
    },

    /// Build a diamond of frames and tear it down
    Frames,

    /// List the built-in atom types
    Types,

    /// Show the effective configuration
    Config,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), AtomError> {
    let loaded = load_config(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Demo) => cmd_demo(&loaded.space, json_mode),
        Some(Commands::Stress {
            threads,
            increments,
        }) => cmd_stress(&loaded.space, json_mode, threads, increments),
        Some(Commands::Frames) => cmd_frames(&loaded.space, json_mode),
        Some(Commands::Types) => cmd_types(json_mode),
        Some(Commands::Config) => cmd_config(&loaded, json_mode),
        None => {
            // No subcommand - show the configuration by default
            cmd_config(&loaded, json_mode)
        }
    }
}
