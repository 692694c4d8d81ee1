//! Relational SQL AST, translation and rendering
//!
//! This crate provides:
//! - The relational AST produced from a semantic query tree
//! - `SelectStatementInterpreter`, lowering SQM select statements into a `SelectQuery`
//! - `SqlTreeWalker`, rendering a `SelectQuery` into SQL text, ordered
//!   parameter binders and ordered result returns
//! - The persister seam resolving attributes to column bindings

pub mod ast;
pub mod convert;
pub mod exec;
pub mod persister;

pub use ast::*;
pub use convert::*;
pub use exec::*;
pub use persister::*;
