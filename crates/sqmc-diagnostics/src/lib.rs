//! sqmc diagnostics and error handling
//!
//! This crate provides the error handling infrastructure shared by the
//! translation and rendering crates: structured error codes, the
//! [`SqmError`] taxonomy and diagnostic reporting.

mod error;
mod error_code;

pub use error::*;
pub use error_code::*;

/// Result type for sqmc operations
pub type Result<T> = std::result::Result<T, SqmError>;
