//! # atomweave - inspection CLI
//!
//! The binary for the atomweave in-memory hypergraph store.
//!
//! This application provides:
//! - CLI interface driving fixed store scenarios
//! - Configuration loading (TOML file + environment)
//! - Structured logging (text or JSON)
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │           apps/atomweave (THE BINARY)         │
//! │                                               │
//! │   ┌─────────────┐        ┌────────────────┐   │
//! │   │    CLI      │        │    Config      │   │
//! │   │   (clap)    │        │ (toml + env)   │   │
//! │   └──────┬──────┘        └───────┬────────┘   │
//! │          └───────────┬───────────┘            │
//! │                      ▼                        │
//! │              ┌────────────────┐               │
//! │              │ atomweave-core │               │
//! │              │  (THE LOGIC)   │               │
//! │              └────────────────┘               │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! atomweave demo
//! atomweave stress --threads 16 --increments 100000
//! atomweave --json-mode frames
//! atomweave --config atomweave.toml config
//! ```

use atomweave::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments first: --verbose picks the default filter.
    let cli = cli::Cli::parse();

    // Initialize tracing - ATOMWEAVE_LOG_FORMAT=json enables machine-parseable output.
    let log_format =
        std::env::var("ATOMWEAVE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "atomweave=debug,atomweave_core=debug"
    } else {
        "atomweave=info,atomweave_core=warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the atomweave startup banner.
fn print_banner() {
    println!(
        r#"
   atomweave v{}

   Content-addressed • Concurrent • Layered
"#,
        env!("CARGO_PKG_VERSION")
    );
}
