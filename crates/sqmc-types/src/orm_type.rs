//! ORM-level types: what an expression evaluates to, and how many columns it spans

use crate::BasicType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named component of a composite (embedded) type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositeComponent {
    pub name: String,
    pub sql_type: BasicType,
}

/// A multi-column value type, such as an embedded address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositeType {
    pub name: String,
    pub components: Vec<CompositeComponent>,
}

impl CompositeType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
        }
    }

    /// Append a component
    pub fn with_component(mut self, name: impl Into<String>, sql_type: BasicType) -> Self {
        self.components.push(CompositeComponent {
            name: name.into(),
            sql_type,
        });
        self
    }

    /// Find a component by name, returning its index and type
    pub fn component(&self, name: &str) -> Option<(usize, &CompositeComponent)> {
        self.components
            .iter()
            .enumerate()
            .find(|(_, c)| c.name == name)
    }

    /// Number of JDBC columns
    pub fn column_span(&self) -> usize {
        self.components.len()
    }
}

/// An entity used as a value: it spans its identifier columns
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityValuedType {
    pub entity_name: String,
    pub identifier: Vec<BasicType>,
}

/// The type of a query expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrmType {
    Basic(BasicType),
    Composite(CompositeType),
    Entity(EntityValuedType),
}

impl OrmType {
    /// Number of JDBC columns a value of this type occupies
    pub fn column_span(&self) -> usize {
        match self {
            Self::Basic(_) => 1,
            Self::Composite(composite) => composite.column_span(),
            Self::Entity(entity) => entity.identifier.len(),
        }
    }

    /// Display name, used in diagnostics
    pub fn name(&self) -> &str {
        match self {
            Self::Basic(basic) => basic.name(),
            Self::Composite(composite) => &composite.name,
            Self::Entity(entity) => &entity.entity_name,
        }
    }

    /// The basic type, when this type is single-column
    pub fn as_basic(&self) -> Option<BasicType> {
        match self {
            Self::Basic(basic) => Some(*basic),
            _ => None,
        }
    }

    /// Basic types of every spanned column, in column order
    pub fn column_types(&self) -> Vec<BasicType> {
        match self {
            Self::Basic(basic) => vec![*basic],
            Self::Composite(composite) => composite.components.iter().map(|c| c.sql_type).collect(),
            Self::Entity(entity) => entity.identifier.clone(),
        }
    }
}

impl From<BasicType> for OrmType {
    fn from(basic: BasicType) -> Self {
        Self::Basic(basic)
    }
}

impl fmt::Display for OrmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> CompositeType {
        CompositeType::new("Address")
            .with_component("street", BasicType::String)
            .with_component("city", BasicType::String)
            .with_component("zip", BasicType::String)
    }

    #[test]
    fn test_column_span() {
        assert_eq!(OrmType::Basic(BasicType::Long).column_span(), 1);
        assert_eq!(OrmType::Composite(address()).column_span(), 3);

        let entity = OrmType::Entity(EntityValuedType {
            entity_name: "Company".to_string(),
            identifier: vec![BasicType::Long, BasicType::String],
        });
        assert_eq!(entity.column_span(), 2);
        assert_eq!(entity.name(), "Company");
    }

    #[test]
    fn test_component_lookup() {
        let address = address();
        let (index, component) = address.component("city").unwrap();
        assert_eq!(index, 1);
        assert_eq!(component.sql_type, BasicType::String);
        assert!(address.component("country").is_none());
    }

    #[test]
    fn test_serde_external_tagging() {
        let json = serde_json::to_string(&OrmType::Basic(BasicType::Integer)).unwrap();
        assert_eq!(json, r#"{"Basic":"Integer"}"#);
        let back: OrmType = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_basic(), Some(BasicType::Integer));
    }
}
