//! Top-level statements

use serde::{Deserialize, Serialize};

use crate::{OrderByClause, SqmQuerySpec, SqmWhereClause};

/// Any SQM statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Statement {
    Select(SelectStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    InsertSelect(InsertSelectStatement),
}

impl Statement {
    /// Statement kind, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
            Self::InsertSelect(_) => "insert-select",
        }
    }
}

/// A select statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectStatement {
    pub query_spec: SqmQuerySpec,
    #[serde(default)]
    pub order_by: Option<OrderByClause>,
}

impl SelectStatement {
    pub fn new(query_spec: SqmQuerySpec) -> Self {
        Self {
            query_spec,
            order_by: None,
        }
    }

    pub fn with_order_by(mut self, order_by: OrderByClause) -> Self {
        self.order_by = Some(order_by);
        self
    }
}

/// An update statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatement {
    pub entity_name: String,
    #[serde(default)]
    pub where_clause: Option<SqmWhereClause>,
}

/// A delete statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteStatement {
    pub entity_name: String,
    #[serde(default)]
    pub where_clause: Option<SqmWhereClause>,
}

/// An insert-select statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertSelectStatement {
    pub entity_name: String,
    pub select: SqmQuerySpec,
}
