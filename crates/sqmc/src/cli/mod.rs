//! CLI functionality for the sqmc tool
//!
//! This module contains all CLI-related functionality including:
//! - Translation to SQL and to the relational AST
//! - Mapping validation
//! - Output formatting

#[cfg(feature = "cli")]
pub mod output;
#[cfg(feature = "cli")]
pub mod translate;
#[cfg(feature = "cli")]
pub mod validate;
