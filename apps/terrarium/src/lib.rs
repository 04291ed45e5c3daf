//! # Terrarium Application Library
//!
//! The pieces of the `terrarium` binary, exposed for integration tests
//! and embedding.
//!
//! - [`config`]: TOML configuration with environment overrides
//! - [`client`]: records API client
//! - [`providers`]: concrete dashboard capability providers
//! - [`shell`]: bootstrapped registry, dashboard and route table
//! - [`api`]: HTTP REST API (axum)
//! - [`cli`]: command-line interface (clap)

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod providers;
pub mod shell;

pub use error::AppError;
