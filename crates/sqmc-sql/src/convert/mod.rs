//! SQM to relational AST conversion

mod alias;
mod from_clause_index;
mod interpreter;

pub use alias::*;
pub use from_clause_index::*;
pub use interpreter::*;
