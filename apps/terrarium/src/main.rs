//! # Terrarium - Reptile-Keeping Shell
//!
//! The main binary for the Terrarium application shell.
//!
//! This application provides:
//! - HTTP REST API server (axum-based) over the composed shell
//! - CLI interface for inspecting features, routes and dashboards
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                   apps/terrarium (THE BINARY)                 │
//! │                                                               │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐  │
//! │  │   CLI       │    │   HTTP API  │    │  Records client  │  │
//! │  │  (clap)     │    │   (axum)    │    │    (reqwest)     │  │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬─────────┘  │
//! │         │                  │                    │            │
//! │         └──────────────────┼────────────────────┘            │
//! │                            ▼                                 │
//! │                   ┌─────────────────┐                        │
//! │                   │ terrarium-core  │                        │
//! │                   │ (THE LOGIC)     │                        │
//! │                   └─────────────────┘                        │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! terrarium server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! terrarium features
//! terrarium nav --admin
//! terrarium resolve /reptiles/7 --authenticated
//! terrarium dashboard --user 1 --offline
//! ```

use clap::Parser;
use terrarium::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // TERRARIUM_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("TERRARIUM_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "terrarium=info,terrarium_core=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Terrarium startup banner.
fn print_banner() {
    println!(
        r#"
  ╔╦╗╔═╗╦═╗╦═╗╔═╗╦═╗╦╦ ╦╔╦╗
   ║ ║╣ ╠╦╝╠╦╝╠═╣╠╦╝║║ ║║║║
   ╩ ╚═╝╩╚═╩╚═╩ ╩╩╚═╩╚═╝╩ ╩

  Reptile-Keeping Shell v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
