//! sqmc mapping model
//!
//! This crate provides:
//! - Entity, attribute and collection mapping metadata
//! - The `Metamodel` lookup trait and an in-memory `MappingRegistry`
//! - The parameter-bindings contract consulted for parameter types
//! - Query options and the follow-on callback threaded through translation

pub mod bindings;
pub mod mapping;
pub mod options;
pub mod registry;

pub use bindings::*;
pub use mapping::*;
pub use options::*;
pub use registry::*;
