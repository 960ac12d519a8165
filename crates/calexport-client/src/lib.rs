//! CLI, configuration, export document writer and CSV projection
//!
//! This crate provides the `calexport` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod project;
pub mod secret;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
pub use export::{ExportSummary, write_document};
pub use project::{ProjectionSummary, project};
