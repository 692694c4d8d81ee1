//! Query specification, select clause, where clause and order-by

use serde::{Deserialize, Serialize};

use crate::{SqmExpression, SqmFromClause, SqmPredicate};

/// One query level: from, select and where
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmQuerySpec {
    pub from_clause: SqmFromClause,
    #[serde(default)]
    pub select_clause: Option<SqmSelectClause>,
    #[serde(default)]
    pub where_clause: Option<SqmWhereClause>,
}

impl SqmQuerySpec {
    pub fn new(from_clause: SqmFromClause) -> Self {
        Self {
            from_clause,
            select_clause: None,
            where_clause: None,
        }
    }

    pub fn with_select(mut self, select_clause: SqmSelectClause) -> Self {
        self.select_clause = Some(select_clause);
        self
    }

    pub fn with_where(mut self, predicate: SqmPredicate) -> Self {
        self.where_clause = Some(SqmWhereClause {
            predicate: Some(predicate),
        });
        self
    }
}

/// The select list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SqmSelectClause {
    #[serde(default)]
    pub distinct: bool,
    pub selections: Vec<SqmSelection>,
}

impl SqmSelectClause {
    pub fn new(selections: Vec<SqmSelection>) -> Self {
        Self {
            distinct: false,
            selections,
        }
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }
}

/// A selected expression with its optional result variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmSelection {
    pub expression: SqmExpression,
    #[serde(default)]
    pub alias: Option<String>,
}

impl SqmSelection {
    pub fn new(expression: SqmExpression) -> Self {
        Self {
            expression,
            alias: None,
        }
    }

    pub fn aliased(expression: SqmExpression, alias: impl Into<String>) -> Self {
        Self {
            expression,
            alias: Some(alias.into()),
        }
    }
}

/// The where clause; a missing predicate means no restriction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SqmWhereClause {
    #[serde(default)]
    pub predicate: Option<SqmPredicate>,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub const fn sql_text(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// The order-by clause
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderByClause {
    pub sort_specifications: Vec<SqmSortSpecification>,
}

/// One sort key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmSortSpecification {
    pub expression: SqmExpression,
    #[serde(default)]
    pub collation: Option<String>,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl SqmSortSpecification {
    pub fn new(expression: SqmExpression, sort_order: SortOrder) -> Self {
        Self {
            expression,
            collation: None,
            sort_order,
        }
    }
}
