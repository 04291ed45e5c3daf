//! # Terrarium CLI Module
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `features` - List registered features (default)
//! - `routes` - Show the composed route table
//! - `nav` - Show the navigation menu
//! - `resolve` - Resolve a path for a viewer
//! - `dashboard` - Collect dashboard widgets for a user
//! - `preload` - Warm dashboard providers for a user

mod commands;

use crate::config::AppConfig;
use crate::error::AppError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Terrarium - reptile-keeping application shell
///
/// Composes feature modules into routes, navigation and a dashboard.
#[derive(Parser, Debug)]
#[command(name = "terrarium")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (default: ./terrarium.toml if present)
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
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// List registered features
    Features,

    /// Show the composed route table
    Routes,

    /// Show the navigation menu
    Nav {
        /// Include admin-only entries
        #[arg(short, long)]
        admin: bool,
    },

    /// Resolve a path against the route table
    Resolve {
        /// Path to resolve, e.g. /reptiles/7
        path: String,

        /// Resolve as a signed-in user
        #[arg(short, long)]
        authenticated: bool,

        /// Resolve as an administrator
        #[arg(short = 'A', long)]
        admin: bool,
    },

    /// Collect dashboard widgets for a user
    Dashboard {
        /// User ID
        #[arg(short, long)]
        user: u64,

        /// Use zeroed counters instead of the records API
        #[arg(long)]
        offline: bool,
    },

    /// Warm dashboard providers for a user
    Preload {
        /// User ID
        #[arg(short, long)]
        user: u64,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(&config, &host, port).await,
        Some(Commands::Routes) => cmd_routes(&config, json_mode),
        Some(Commands::Nav { admin }) => cmd_nav(&config, json_mode, admin),
        Some(Commands::Resolve {
            path,
            authenticated,
            admin,
        }) => cmd_resolve(&config, json_mode, &path, authenticated, admin),
        Some(Commands::Dashboard { user, offline }) => {
            cmd_dashboard(&config, json_mode, user, offline).await
        }
        Some(Commands::Preload { user }) => cmd_preload(&config, json_mode, user).await,
        Some(Commands::Features) | None => cmd_features(&config, json_mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["terrarium"]).expect("parse");
        assert!(cli.command.is_none());
        assert!(!cli.json_mode);
    }

    #[test]
    fn resolve_takes_positional_path() {
        let cli = Cli::try_parse_from(["terrarium", "resolve", "/reptiles/3", "--authenticated"])
            .expect("parse");
        match cli.command {
            Some(Commands::Resolve {
                path,
                authenticated,
                admin,
            }) => {
                assert_eq!(path, "/reptiles/3");
                assert!(authenticated);
                assert!(!admin);
            }
            other => unreachable!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn dashboard_requires_user() {
        assert!(Cli::try_parse_from(["terrarium", "dashboard"]).is_err());
        let cli = Cli::try_parse_from(["terrarium", "--json-mode", "dashboard", "-u", "4"])
            .expect("parse");
        assert!(cli.json_mode);
        assert!(matches!(
            cli.command,
            Some(Commands::Dashboard {
                user: 4,
                offline: false
            })
        ));
    }
}
