//! Relational SQL AST
//!
//! Produced by the interpreter, consumed by the tree walker. Nodes are
//! immutable once built and own their children.

mod expression;
mod from;
mod predicate;
mod select;

pub use expression::*;
pub use from::*;
pub use predicate::*;
pub use select::*;

use serde::Serialize;
use sqmc_ast::SortOrder;

/// A complete select: one root query spec plus ordering
#[derive(Debug, Clone, Serialize)]
pub struct SelectQuery {
    pub query_spec: QuerySpec,
    pub sort_specifications: Vec<SortSpecification>,
}

impl SelectQuery {
    pub fn new(query_spec: QuerySpec) -> Self {
        Self {
            query_spec,
            sort_specifications: Vec::new(),
        }
    }
}

/// One query level
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuerySpec {
    pub from_clause: FromClause,
    pub select_clause: SelectClause,
    pub where_clause_restrictions: Option<Predicate>,
}

/// `expr [collate c] asc|desc`
#[derive(Debug, Clone, Serialize)]
pub struct SortSpecification {
    pub sort_expression: Expression,
    pub collation: Option<String>,
    pub sort_order: SortOrder,
}
