//! From-clause nodes: spaces, roots and joins

use serde::{Deserialize, Serialize};
use sqmc_types::JoinType;

use crate::{FromElementId, SqmPredicate};

/// The from clause: comma-separated element spaces
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SqmFromClause {
    pub spaces: Vec<FromElementSpace>,
}

impl SqmFromClause {
    pub fn new(spaces: Vec<FromElementSpace>) -> Self {
        Self { spaces }
    }
}

/// A root entity plus the joins hanging off it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FromElementSpace {
    pub root: SqmRoot,
    #[serde(default)]
    pub joins: Vec<SqmJoin>,
}

impl FromElementSpace {
    pub fn new(root: SqmRoot) -> Self {
        Self {
            root,
            joins: Vec::new(),
        }
    }

    /// Append a join
    pub fn join(mut self, join: impl Into<SqmJoin>) -> Self {
        self.joins.push(join.into());
        self
    }
}

/// A root entity reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmRoot {
    pub uid: FromElementId,
    #[serde(default)]
    pub alias: Option<String>,
    pub entity_name: String,
}

impl SqmRoot {
    pub fn new(uid: u32, entity_name: impl Into<String>) -> Self {
        Self {
            uid: FromElementId(uid),
            alias: None,
            entity_name: entity_name.into(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// A join within a from-element space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SqmJoin {
    /// Join through an attribute of an earlier from-element
    Attribute(SqmAttributeJoin),
    /// Unconditional cross join to an entity
    Cross(SqmCrossJoin),
    /// Ad-hoc join to an unrelated entity
    Entity(SqmEntityJoin),
}

impl SqmJoin {
    pub fn uid(&self) -> FromElementId {
        match self {
            Self::Attribute(join) => join.uid,
            Self::Cross(join) => join.uid,
            Self::Entity(join) => join.uid,
        }
    }
}

/// `join c.customers cust`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmAttributeJoin {
    pub uid: FromElementId,
    #[serde(default)]
    pub alias: Option<String>,
    /// The from-element owning the attribute
    pub lhs: FromElementId,
    pub attribute: String,
    #[serde(default)]
    pub join_type: JoinType,
    /// Explicit (downcast) target entity, overriding the mapped target
    #[serde(default)]
    pub target_entity: Option<String>,
    #[serde(default)]
    pub on_clause: Option<SqmPredicate>,
}

impl SqmAttributeJoin {
    pub fn new(uid: u32, lhs: FromElementId, attribute: impl Into<String>) -> Self {
        Self {
            uid: FromElementId(uid),
            alias: None,
            lhs,
            attribute: attribute.into(),
            join_type: JoinType::Inner,
            target_entity: None,
            on_clause: None,
        }
    }

    pub fn with_join_type(mut self, join_type: JoinType) -> Self {
        self.join_type = join_type;
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_on_clause(mut self, predicate: SqmPredicate) -> Self {
        self.on_clause = Some(predicate);
        self
    }
}

impl From<SqmAttributeJoin> for SqmJoin {
    fn from(join: SqmAttributeJoin) -> Self {
        Self::Attribute(join)
    }
}

/// `cross join Employee e`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmCrossJoin {
    pub uid: FromElementId,
    #[serde(default)]
    pub alias: Option<String>,
    pub entity_name: String,
}

impl SqmCrossJoin {
    pub fn new(uid: u32, entity_name: impl Into<String>) -> Self {
        Self {
            uid: FromElementId(uid),
            alias: None,
            entity_name: entity_name.into(),
        }
    }
}

impl From<SqmCrossJoin> for SqmJoin {
    fn from(join: SqmCrossJoin) -> Self {
        Self::Cross(join)
    }
}

/// `join Employee e on ...`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmEntityJoin {
    pub uid: FromElementId,
    #[serde(default)]
    pub alias: Option<String>,
    pub entity_name: String,
    #[serde(default)]
    pub join_type: JoinType,
    #[serde(default)]
    pub on_clause: Option<SqmPredicate>,
}

impl From<SqmEntityJoin> for SqmJoin {
    fn from(join: SqmEntityJoin) -> Self {
        Self::Entity(join)
    }
}
