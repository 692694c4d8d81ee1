//! Semantic Query Model (SQM)
//!
//! This crate defines the already-parsed, semantically-resolved query tree
//! that the translator lowers into a relational AST. Every from-element
//! (root or join) carries a unique [`FromElementId`] assigned upstream, and
//! expressions refer to from-elements by that id.

mod expression;
mod from;
mod literal;
mod operator;
mod predicate;
mod query;
mod statement;

pub use expression::*;
pub use from::*;
pub use literal::*;
pub use operator::*;
pub use predicate::*;
pub use query::*;
pub use statement::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type alias for boxed expressions
pub type BoxExpr = Box<SqmExpression>;

/// Type alias for boxed predicates
pub type BoxPredicate = Box<SqmPredicate>;

/// Unique identity of a from-element within one statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FromElementId(pub u32);

impl fmt::Display for FromElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
