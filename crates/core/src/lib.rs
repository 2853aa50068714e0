//! # auto-table core
//!
//! Core types, traits, and error handling for auto-table.
//!
//! This crate provides the foundational building blocks used throughout
//! the workspace, including:
//!
//! - **Types**: the semantic type descriptor `TypeRef` and `DatabaseType`
//! - **Traits**: `Validatable` and the `ColumnTypeMapper` seam between the
//!   IR and the SQL dialects
//! - **Errors**: Unified error handling with `EngineError` and `EngineResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{EngineError, EngineResult, ResultExt};
pub use traits::{ColumnTypeMapper, Validatable};
pub use types::{DatabaseType, INTEGER_KINDS, TypeRef};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
