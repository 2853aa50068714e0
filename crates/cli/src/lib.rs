//! # auto-table CLI
//!
//! Command-line adapters for auto-table.
//!
//! This crate finds the record description files, merges the
//! configuration layers and runs the generator for the binary.
//!
//! ## Commands
//!
//! - `generate` - Write the migration files
//! - `plan` - Print the emission order without writing anything
//! - `show <table>` - Print every statement rendered for one table
//!

pub mod args;
pub mod commands;
pub mod config;
pub mod input;

pub use args::{Cli, Command, CommonArgs};
pub use commands::{run, run_in};
pub use config::{CONFIG_FILE_NAME, CliConfig, Overrides, Settings};
pub use input::{discover_schema_files, load_records, resolve_source};

// Re-export dependencies for use in main.rs
pub use autotable_codegen;
pub use autotable_core;
pub use autotable_ir;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");
