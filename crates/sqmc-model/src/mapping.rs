//! Mapping metadata describing how entities and collections map onto tables

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sqmc_diagnostics::{Result, SqmError, SQM0300, SQM0301, SQM0302};
use sqmc_types::{BasicType, CompositeType, EntityValuedType, OrmType};

/// A mapped column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub name: String,
    /// Owning table; `None` means the entity's root table
    #[serde(default)]
    pub table: Option<String>,
    pub sql_type: BasicType,
}

impl ColumnMapping {
    pub fn new(name: impl Into<String>, sql_type: BasicType) -> Self {
        Self {
            name: name.into(),
            table: None,
            sql_type,
        }
    }

    pub fn in_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }
}

/// The identifier of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierMapping {
    /// Attribute name used to reference the identifier in queries
    pub name: String,
    pub columns: Vec<ColumnMapping>,
}

impl IdentifierMapping {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnMapping>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Single-column identifier
    pub fn simple(name: impl Into<String>, column: impl Into<String>, sql_type: BasicType) -> Self {
        Self::new(name, vec![ColumnMapping::new(column, sql_type)])
    }
}

/// What kind of attribute this is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeClassification {
    /// Single basic-valued column
    Basic(BasicType),
    /// Embedded value spanning one column per component
    Embedded(CompositeType),
    /// To-one association through a foreign key
    ManyToOne {
        target_entity: String,
        /// Join on this target attribute instead of the target identifier
        #[serde(default)]
        unique_key_property: Option<String>,
    },
    OneToOne {
        target_entity: String,
        #[serde(default)]
        unique_key_property: Option<String>,
    },
    /// Collection-valued attribute
    Plural { role: String },
}

/// A mapped attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMapping {
    /// Filled from the key of the owning map when omitted
    #[serde(default)]
    pub name: String,
    pub classification: AttributeClassification,
    #[serde(default)]
    pub columns: Vec<ColumnMapping>,
}

impl AttributeMapping {
    pub fn basic(name: impl Into<String>, column: impl Into<String>, sql_type: BasicType) -> Self {
        Self {
            name: name.into(),
            classification: AttributeClassification::Basic(sql_type),
            columns: vec![ColumnMapping::new(column, sql_type)],
        }
    }

    /// Embedded attribute; `columns` follow the component order
    pub fn embedded(name: impl Into<String>, composite: CompositeType, columns: &[&str]) -> Self {
        let columns = composite
            .components
            .iter()
            .zip(columns)
            .map(|(component, column)| ColumnMapping::new(*column, component.sql_type))
            .collect();
        Self {
            name: name.into(),
            classification: AttributeClassification::Embedded(composite),
            columns,
        }
    }

    pub fn many_to_one(
        name: impl Into<String>,
        target_entity: impl Into<String>,
        columns: Vec<ColumnMapping>,
    ) -> Self {
        Self {
            name: name.into(),
            classification: AttributeClassification::ManyToOne {
                target_entity: target_entity.into(),
                unique_key_property: None,
            },
            columns,
        }
    }

    pub fn plural(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            classification: AttributeClassification::Plural { role: role.into() },
            columns: Vec::new(),
        }
    }

    /// Join on `property` of the target instead of its identifier
    pub fn with_unique_key(mut self, property: impl Into<String>) -> Self {
        if let AttributeClassification::ManyToOne {
            unique_key_property,
            ..
        }
        | AttributeClassification::OneToOne {
            unique_key_property,
            ..
        } = &mut self.classification
        {
            *unique_key_property = Some(property.into());
        }
        self
    }

    /// Target entity for to-one associations
    pub fn association_target(&self) -> Option<&str> {
        match &self.classification {
            AttributeClassification::ManyToOne { target_entity, .. }
            | AttributeClassification::OneToOne { target_entity, .. } => Some(target_entity),
            _ => None,
        }
    }

    pub fn is_plural(&self) -> bool {
        matches!(self.classification, AttributeClassification::Plural { .. })
    }
}

/// A secondary table joined to the entity's root table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryTableMapping {
    pub table: String,
    /// Columns equated with the identifier columns, in order
    pub key_columns: Vec<String>,
    /// Optional rows join with left outer, mandatory rows with inner
    #[serde(default)]
    pub optional: bool,
}

/// A mapped entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMapping {
    pub name: String,
    pub table: String,
    pub identifier: IdentifierMapping,
    #[serde(default)]
    pub secondary_tables: Vec<SecondaryTableMapping>,
    #[serde(default)]
    pub attributes: IndexMap<String, AttributeMapping>,
}

impl EntityMapping {
    pub fn new(name: impl Into<String>, table: impl Into<String>, identifier: IdentifierMapping) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            identifier,
            secondary_tables: Vec::new(),
            attributes: IndexMap::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: AttributeMapping) -> Self {
        self.attributes.insert(attribute.name.clone(), attribute);
        self
    }

    pub fn with_secondary_table(mut self, secondary: SecondaryTableMapping) -> Self {
        self.secondary_tables.push(secondary);
        self
    }

    /// Get an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&AttributeMapping> {
        self.attributes.get(name)
    }

    pub fn require_attribute(&self, name: &str) -> Result<&AttributeMapping> {
        self.attribute(name).ok_or_else(|| {
            SqmError::mapping(
                SQM0301,
                format!("Entity {} has no attribute named {}", self.name, name),
            )
        })
    }

    /// Whether `name` refers to the identifier
    pub fn is_identifier(&self, name: &str) -> bool {
        self.identifier.name == name
    }

    /// Types of the identifier columns, in order
    pub fn identifier_types(&self) -> Vec<BasicType> {
        self.identifier.columns.iter().map(|c| c.sql_type).collect()
    }

    /// The type of this entity used as a value
    pub fn entity_valued_type(&self) -> OrmType {
        OrmType::Entity(EntityValuedType {
            entity_name: self.name.clone(),
            identifier: self.identifier_types(),
        })
    }

    /// Resolve the table a column lives in
    pub fn table_of<'a>(&'a self, column: &'a ColumnMapping) -> &'a str {
        column.table.as_deref().unwrap_or(&self.table)
    }

    /// Columns of a property usable as a join key: the identifier, or a
    /// single-table attribute
    pub fn key_columns_of(&self, property: &str) -> Option<&[ColumnMapping]> {
        if self.is_identifier(property) {
            return Some(&self.identifier.columns);
        }
        self.attribute(property).map(|a| a.columns.as_slice())
    }
}

/// Element side of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionElement {
    /// Basic values stored in the collection table
    Basic { column: String, sql_type: BasicType },
    /// Entity elements; `columns` reference the element identifier from the
    /// collection table and are unused when the collection table is the
    /// element's own table
    Entity {
        entity_name: String,
        #[serde(default)]
        columns: Vec<String>,
    },
}

/// A mapped collection (plural attribute)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMapping {
    /// Fully qualified role, `Owner.attribute`
    pub role: String,
    pub owner_entity: String,
    pub table: String,
    /// Foreign key columns referencing the owner identifier, in order
    pub key_columns: Vec<String>,
    pub element: CollectionElement,
}

impl CollectionMapping {
    pub fn element_entity(&self) -> Option<&str> {
        match &self.element {
            CollectionElement::Entity { entity_name, .. } => Some(entity_name),
            CollectionElement::Basic { .. } => None,
        }
    }
}

/// Lookup of mapping metadata
pub trait Metamodel {
    fn entity(&self, name: &str) -> Option<&EntityMapping>;

    fn collection(&self, role: &str) -> Option<&CollectionMapping>;

    fn require_entity(&self, name: &str) -> Result<&EntityMapping> {
        self.entity(name)
            .ok_or_else(|| SqmError::mapping(SQM0300, format!("Unknown entity {}", name)))
    }

    fn require_collection(&self, role: &str) -> Result<&CollectionMapping> {
        self.collection(role)
            .ok_or_else(|| SqmError::mapping(SQM0302, format!("Unknown collection role {}", role)))
    }
}
