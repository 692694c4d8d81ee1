//! From clause: table spaces, table groups and column bindings

use serde::Serialize;
use sqmc_ast::FromElementId;
use sqmc_types::{BasicType, JoinType};
use std::fmt;

use crate::ast::Predicate;

/// Comma-separated table spaces
#[derive(Debug, Clone, Default, Serialize)]
pub struct FromClause {
    pub table_spaces: Vec<TableSpace>,
}

/// A root table group and the groups joined to it, in source order
#[derive(Debug, Clone, Serialize)]
pub struct TableSpace {
    pub root_table_group: TableGroup,
    pub joined_table_groups: Vec<TableGroupJoin>,
}

impl TableSpace {
    pub fn new(root_table_group: TableGroup) -> Self {
        Self {
            root_table_group,
            joined_table_groups: Vec::new(),
        }
    }
}

/// What a table group was built for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TableGroupSource {
    Entity {
        entity_name: String,
    },
    Collection {
        role: String,
        element_entity: Option<String>,
    },
}

/// The relational footprint of one entity or collection
#[derive(Debug, Clone, Serialize)]
pub struct TableGroup {
    pub uid: FromElementId,
    pub source: TableGroupSource,
    pub root_table_binding: TableBinding,
    /// Secondary tables and many-to-many element tables
    pub table_joins: Vec<TableJoin>,
}

impl TableGroup {
    /// Alias of the root table
    pub fn root_alias(&self) -> &str {
        &self.root_table_binding.identification_variable
    }

    /// Alias under which `table` participates in this group
    pub fn alias_for_table(&self, table: &str) -> Option<&str> {
        if self.root_table_binding.table == table {
            return Some(self.root_alias());
        }
        self.table_joins
            .iter()
            .find(|join| join.joined_table_binding.table == table)
            .map(|join| join.joined_table_binding.identification_variable.as_str())
    }
}

/// `table as alias`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableBinding {
    pub table: String,
    pub identification_variable: String,
}

/// A table joined inside a table group
#[derive(Debug, Clone, Serialize)]
pub struct TableJoin {
    pub join_type: JoinType,
    pub joined_table_binding: TableBinding,
    pub join_predicate: Option<Predicate>,
}

/// A table group joined into a table space
#[derive(Debug, Clone, Serialize)]
pub struct TableGroupJoin {
    pub join_type: JoinType,
    pub joined_group: TableGroup,
    pub predicate: Option<Predicate>,
}

/// `alias.column`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ColumnBinding {
    pub identification_variable: String,
    pub column: String,
    pub sql_type: BasicType,
}

impl ColumnBinding {
    pub fn new(
        identification_variable: impl Into<String>,
        column: impl Into<String>,
        sql_type: BasicType,
    ) -> Self {
        Self {
            identification_variable: identification_variable.into(),
            column: column.into(),
            sql_type,
        }
    }
}

impl fmt::Display for ColumnBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.identification_variable, self.column)
    }
}
