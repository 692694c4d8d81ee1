//! In-memory metamodel, loadable from JSON mapping documents

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sqmc_diagnostics::{
    Result, SqmError, SQM0300, SQM0301, SQM0302, SQM0303, SQM0400,
};
use std::path::Path;

use crate::mapping::{
    AttributeClassification, CollectionElement, CollectionMapping, EntityMapping, Metamodel,
};

/// On-disk layout of a mapping document
#[derive(Debug, Default, Serialize, Deserialize)]
struct MappingDocument {
    #[serde(default)]
    entities: Vec<EntityMapping>,
    #[serde(default)]
    collections: Vec<CollectionMapping>,
}

/// Metamodel backed by insertion-ordered maps
#[derive(Debug, Clone, Default)]
pub struct MappingRegistry {
    entities: IndexMap<String, EntityMapping>,
    collections: IndexMap<String, CollectionMapping>,
}

impl MappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity
    pub fn with_entity(mut self, entity: EntityMapping) -> Self {
        self.entities.insert(entity.name.clone(), entity);
        self
    }

    /// Register a collection
    pub fn with_collection(mut self, collection: CollectionMapping) -> Self {
        self.collections.insert(collection.role.clone(), collection);
        self
    }

    /// Load a mapping document from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let document: MappingDocument = serde_json::from_str(json).map_err(|e| {
            SqmError::mapping(SQM0303, format!("Invalid mapping document: {}", e))
        })?;

        let mut registry = Self::new();
        for mut entity in document.entities {
            for (key, attribute) in entity.attributes.iter_mut() {
                if attribute.name.is_empty() {
                    attribute.name = key.clone();
                }
            }
            registry = registry.with_entity(entity);
        }
        for collection in document.collections {
            registry = registry.with_collection(collection);
        }

        log::debug!(
            "loaded mapping document: {} entities, {} collections",
            registry.entities.len(),
            registry.collections.len()
        );
        Ok(registry)
    }

    /// Load a mapping document from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SqmError::system(SQM0400, format!("Cannot read {}", path.display()))
                .with_context(e.to_string())
        })?;
        Self::from_json(&json)
    }

    /// Serialize back into the document layout
    pub fn to_json(&self) -> Result<String> {
        let document = MappingDocument {
            entities: self.entities.values().cloned().collect(),
            collections: self.collections.values().cloned().collect(),
        };
        serde_json::to_string_pretty(&document)
            .map_err(|e| SqmError::mapping(SQM0303, e.to_string()))
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityMapping> {
        self.entities.values()
    }

    pub fn collections(&self) -> impl Iterator<Item = &CollectionMapping> {
        self.collections.values()
    }

    /// Check cross-references between mappings. Returns every problem found.
    pub fn validate(&self) -> Vec<SqmError> {
        let mut errors = Vec::new();

        for entity in self.entities.values() {
            if entity.identifier.columns.is_empty() {
                errors.push(SqmError::mapping(
                    SQM0303,
                    format!("Entity {} has no identifier columns", entity.name),
                ));
            }
            let id_span = entity.identifier.columns.len();

            for secondary in &entity.secondary_tables {
                if secondary.key_columns.len() != id_span {
                    errors.push(SqmError::mapping(
                        SQM0303,
                        format!(
                            "Secondary table {} of {} has {} key columns, identifier has {}",
                            secondary.table,
                            entity.name,
                            secondary.key_columns.len(),
                            id_span
                        ),
                    ));
                }
            }

            for attribute in entity.attributes.values() {
                let owner = format!("{}.{}", entity.name, attribute.name);
                match &attribute.classification {
                    AttributeClassification::Basic(_) => {
                        if attribute.columns.len() != 1 {
                            errors.push(SqmError::mapping(
                                SQM0303,
                                format!("Basic attribute {} must map exactly one column", owner),
                            ));
                        }
                    }
                    AttributeClassification::Embedded(composite) => {
                        if attribute.columns.len() != composite.column_span() {
                            errors.push(SqmError::mapping(
                                SQM0303,
                                format!(
                                    "Embedded attribute {} maps {} columns for {} components",
                                    owner,
                                    attribute.columns.len(),
                                    composite.column_span()
                                ),
                            ));
                        }
                    }
                    AttributeClassification::ManyToOne {
                        target_entity,
                        unique_key_property,
                    }
                    | AttributeClassification::OneToOne {
                        target_entity,
                        unique_key_property,
                    } => {
                        let Some(target) = self.entities.get(target_entity) else {
                            errors.push(SqmError::mapping(
                                SQM0300,
                                format!("Association {} targets unknown entity {}", owner, target_entity),
                            ));
                            continue;
                        };
                        let key_span = match unique_key_property {
                            Some(property) => match target.key_columns_of(property) {
                                Some(columns) => columns.len(),
                                None => {
                                    errors.push(SqmError::mapping(
                                        SQM0301,
                                        format!(
                                            "Association {} references unknown property {}.{}",
                                            owner, target_entity, property
                                        ),
                                    ));
                                    continue;
                                }
                            },
                            None => target.identifier.columns.len(),
                        };
                        if attribute.columns.len() != key_span {
                            errors.push(SqmError::mapping(
                                SQM0303,
                                format!(
                                    "Association {} maps {} columns, target key has {}",
                                    owner,
                                    attribute.columns.len(),
                                    key_span
                                ),
                            ));
                        }
                    }
                    AttributeClassification::Plural { role } => {
                        if !self.collections.contains_key(role) {
                            errors.push(SqmError::mapping(
                                SQM0302,
                                format!("Plural attribute {} has unknown role {}", owner, role),
                            ));
                        }
                    }
                }
            }
        }

        for collection in self.collections.values() {
            match self.entities.get(&collection.owner_entity) {
                Some(owner) => {
                    if owner.identifier.columns.len() != collection.key_columns.len() {
                        errors.push(SqmError::mapping(
                            SQM0303,
                            format!(
                                "Collection {} has {} key columns, owner identifier has {}",
                                collection.role,
                                collection.key_columns.len(),
                                owner.identifier.columns.len()
                            ),
                        ));
                    }
                }
                None => errors.push(SqmError::mapping(
                    SQM0300,
                    format!(
                        "Collection {} is owned by unknown entity {}",
                        collection.role, collection.owner_entity
                    ),
                )),
            }

            if let CollectionElement::Entity { entity_name, .. } = &collection.element {
                if !self.entities.contains_key(entity_name) {
                    errors.push(SqmError::mapping(
                        SQM0300,
                        format!(
                            "Collection {} has unknown element entity {}",
                            collection.role, entity_name
                        ),
                    ));
                }
            }
        }

        errors
    }
}

impl Metamodel for MappingRegistry {
    fn entity(&self, name: &str) -> Option<&EntityMapping> {
        self.entities.get(name)
    }

    fn collection(&self, role: &str) -> Option<&CollectionMapping> {
        self.collections.get(role)
    }
}
