//! sqmc type system
//!
//! This crate defines the types shared by every translation layer:
//! - Basic (single column) types and composite (embedded) types
//! - ORM types as seen by expressions, with their JDBC column span
//! - Literal values carried from the semantic tree to the SQL renderer
//! - Join types and their SQL keywords
//! - The dialect seam used for literal-to-SQL conversion

pub mod dialect;
pub mod join_type;
pub mod orm_type;
pub mod system_types;
pub mod value;

pub use dialect::*;
pub use join_type::*;
pub use orm_type::*;
pub use system_types::*;
pub use value::*;
