//! Persister seam: builds table groups and resolves attributes to columns

use smallvec::smallvec;
use sqmc_ast::FromElementId;
use sqmc_diagnostics::{Result, SqmError, SQM0003, SQM0005, SQM0301, SQM0303};
use sqmc_model::{
    AttributeClassification, CollectionElement, CollectionMapping, ColumnMapping, EntityMapping,
    Metamodel,
};
use sqmc_types::{CompositeType, EntityValuedType, JoinType, OrmType};

use crate::ast::{
    AttributeReference, ColumnBinding, ColumnBindings, EntityReference, Expression, Junction,
    Predicate, TableBinding, TableGroup, TableGroupSource, TableJoin,
};
use crate::convert::{FromClauseIndex, SqlAliasBase, SqlAliasBaseManager};

/// Pseudo-attribute naming the value of a basic-valued collection
pub const ELEMENTS_ATTRIBUTE: &str = "elements";

/// Something that can contribute a table group to a from clause
pub trait TableGroupProducer {
    /// Build the group for `uid` and cross-reference it in the current scope
    fn build_table_group(
        &self,
        uid: FromElementId,
        alias_manager: &mut SqlAliasBaseManager,
        index: &mut FromClauseIndex,
    ) -> Result<TableGroup>;
}

/// Pairwise `lhs_i = rhs_i` over two ordered column lists
pub fn equate_columns(
    lhs: Vec<ColumnBinding>,
    rhs: Vec<ColumnBinding>,
    what: &str,
) -> Result<Junction> {
    if lhs.len() != rhs.len() {
        return Err(SqmError::assertion(
            SQM0003,
            format!(
                "{} joins {} columns to {} columns",
                what,
                lhs.len(),
                rhs.len()
            ),
        ));
    }
    let mut junction = Junction::conjunction();
    for (l, r) in lhs.into_iter().zip(rhs) {
        junction.add(Predicate::equal(
            Expression::ColumnReference(l),
            Expression::ColumnReference(r),
        ));
    }
    Ok(junction)
}

/// Joins from the primary table of `entity` (aliased `primary_alias`) to each
/// of its secondary tables, in mapping order
fn secondary_table_joins(
    entity: &EntityMapping,
    primary_alias: &str,
    alias_base: &mut SqlAliasBase,
) -> Result<Vec<TableJoin>> {
    let mut table_joins = Vec::with_capacity(entity.secondary_tables.len());
    for secondary in &entity.secondary_tables {
        let joined_table_binding = TableBinding {
            table: secondary.table.clone(),
            identification_variable: alias_base.generate_alias(),
        };
        let lhs = entity
            .identifier
            .columns
            .iter()
            .map(|column| ColumnBinding::new(primary_alias, &column.name, column.sql_type))
            .collect();
        let rhs = secondary
            .key_columns
            .iter()
            .zip(&entity.identifier.columns)
            .map(|(key, id)| {
                ColumnBinding::new(&joined_table_binding.identification_variable, key, id.sql_type)
            })
            .collect();
        let predicate = equate_columns(lhs, rhs, &format!("secondary table {}", secondary.table))?;
        let join_type = if secondary.optional {
            JoinType::Left
        } else {
            JoinType::Inner
        };
        table_joins.push(TableJoin {
            join_type,
            joined_table_binding,
            join_predicate: Some(Predicate::Junction(predicate)),
        });
    }
    Ok(table_joins)
}

fn table_not_in_group(table: &str, group: &TableGroup) -> SqmError {
    SqmError::assertion(
        SQM0005,
        format!(
            "table {} is not part of table group {}",
            table,
            group.root_alias()
        ),
    )
}

/// Entity-level persister
#[derive(Debug, Clone, Copy)]
pub struct EntityPersister<'a> {
    mapping: &'a EntityMapping,
}

impl<'a> EntityPersister<'a> {
    pub fn new(mapping: &'a EntityMapping) -> Self {
        Self { mapping }
    }

    pub fn for_entity(metamodel: &'a dyn Metamodel, entity_name: &str) -> Result<Self> {
        metamodel.require_entity(entity_name).map(Self::new)
    }

    pub fn mapping(&self) -> &'a EntityMapping {
        self.mapping
    }

    fn column_binding(&self, group: &TableGroup, column: &ColumnMapping) -> Result<ColumnBinding> {
        let table = self.mapping.table_of(column);
        let alias = group
            .alias_for_table(table)
            .ok_or_else(|| table_not_in_group(table, group))?;
        Ok(ColumnBinding::new(alias, &column.name, column.sql_type))
    }

    pub fn identifier_column_bindings(&self, group: &TableGroup) -> Result<Vec<ColumnBinding>> {
        self.mapping
            .identifier
            .columns
            .iter()
            .map(|column| self.column_binding(group, column))
            .collect()
    }

    /// Columns of `attribute` (or of the identifier) within `group`
    pub fn resolve_bindings(&self, group: &TableGroup, attribute: &str) -> Result<ColumnBindings> {
        if self.mapping.is_identifier(attribute) {
            return self
                .mapping
                .identifier
                .columns
                .iter()
                .map(|column| self.column_binding(group, column))
                .collect();
        }
        let mapping = self.mapping.require_attribute(attribute)?;
        if mapping.is_plural() {
            return Err(SqmError::assertion(
                SQM0005,
                format!(
                    "plural attribute {}.{} cannot be used as a value; join it instead",
                    self.mapping.name, attribute
                ),
            ));
        }
        mapping
            .columns
            .iter()
            .map(|column| self.column_binding(group, column))
            .collect()
    }

    /// The type of `attribute` (or of the identifier)
    pub fn attribute_type(&self, attribute: &str) -> Result<OrmType> {
        if self.mapping.is_identifier(attribute) {
            let columns = &self.mapping.identifier.columns;
            return Ok(match columns.as_slice() {
                [single] => OrmType::Basic(single.sql_type),
                many => OrmType::Composite(many.iter().fold(
                    CompositeType::new(format!("{}.{}", self.mapping.name, attribute)),
                    |composite, column| composite.with_component(&column.name, column.sql_type),
                )),
            });
        }
        let mapping = self.mapping.require_attribute(attribute)?;
        match &mapping.classification {
            AttributeClassification::Basic(basic) => Ok(OrmType::Basic(*basic)),
            AttributeClassification::Embedded(composite) => Ok(OrmType::Composite(composite.clone())),
            AttributeClassification::ManyToOne { target_entity, .. }
            | AttributeClassification::OneToOne { target_entity, .. } => {
                Ok(OrmType::Entity(EntityValuedType {
                    entity_name: target_entity.clone(),
                    identifier: mapping.columns.iter().map(|c| c.sql_type).collect(),
                }))
            }
            AttributeClassification::Plural { role } => Err(SqmError::assertion(
                SQM0005,
                format!("plural attribute {} has no value type", role),
            )),
        }
    }

    /// Resolve `attribute`; with `embedded_path`, it names a component of
    /// that embedded attribute instead
    pub fn resolve_attribute(
        &self,
        group: &TableGroup,
        embedded_path: Option<&str>,
        attribute: &str,
    ) -> Result<(ColumnBindings, OrmType)> {
        let Some(path) = embedded_path else {
            return Ok((
                self.resolve_bindings(group, attribute)?,
                self.attribute_type(attribute)?,
            ));
        };

        let embedded = self.mapping.require_attribute(path)?;
        let AttributeClassification::Embedded(composite) = &embedded.classification else {
            return Err(SqmError::assertion(
                SQM0005,
                format!("{}.{} is not an embedded attribute", self.mapping.name, path),
            ));
        };
        let (position, component) = composite.component(attribute).ok_or_else(|| {
            SqmError::mapping(
                SQM0301,
                format!("Embeddable {} has no attribute named {}", composite.name, attribute),
            )
        })?;
        let column = embedded.columns.get(position).ok_or_else(|| {
            SqmError::mapping(
                SQM0303,
                format!("No column mapped for {}.{}.{}", self.mapping.name, path, attribute),
            )
        })?;
        Ok((
            smallvec![self.column_binding(group, column)?],
            OrmType::Basic(component.sql_type),
        ))
    }

    /// The entity as a value: identifier plus every non-plural attribute column
    pub fn entity_reference(&self, group: &TableGroup) -> Result<EntityReference> {
        let mut attribute_bindings = Vec::new();
        for attribute in self.mapping.attributes.values() {
            if attribute.is_plural() {
                continue;
            }
            for column in &attribute.columns {
                attribute_bindings.push(self.column_binding(group, column)?);
            }
        }
        Ok(EntityReference {
            entity_name: self.mapping.name.clone(),
            identifier_bindings: self.identifier_column_bindings(group)?,
            attribute_bindings,
            expression_type: self.mapping.entity_valued_type(),
        })
    }
}

impl TableGroupProducer for EntityPersister<'_> {
    fn build_table_group(
        &self,
        uid: FromElementId,
        alias_manager: &mut SqlAliasBaseManager,
        index: &mut FromClauseIndex,
    ) -> Result<TableGroup> {
        let mut alias_base = alias_manager.create_alias_base(&self.mapping.name);
        let root_table_binding = TableBinding {
            table: self.mapping.table.clone(),
            identification_variable: alias_base.generate_alias(),
        };

        let table_joins = secondary_table_joins(
            self.mapping,
            &root_table_binding.identification_variable,
            &mut alias_base,
        )?;

        let group = TableGroup {
            uid,
            source: TableGroupSource::Entity {
                entity_name: self.mapping.name.clone(),
            },
            root_table_binding,
            table_joins,
        };
        log::trace!(
            "built table group {} for entity {} (alias base {})",
            uid,
            self.mapping.name,
            alias_base.base()
        );
        index.cross_reference(uid, group.clone())?;
        Ok(group)
    }
}

/// Collection-level persister
#[derive(Debug, Clone, Copy)]
pub struct CollectionPersister<'a> {
    mapping: &'a CollectionMapping,
    owner: &'a EntityMapping,
    element: Option<&'a EntityMapping>,
}

impl<'a> CollectionPersister<'a> {
    pub fn new(metamodel: &'a dyn Metamodel, mapping: &'a CollectionMapping) -> Result<Self> {
        let owner = metamodel.require_entity(&mapping.owner_entity)?;
        let element = match &mapping.element {
            CollectionElement::Entity { entity_name, .. } => {
                Some(metamodel.require_entity(entity_name)?)
            }
            CollectionElement::Basic { .. } => None,
        };
        Ok(Self {
            mapping,
            owner,
            element,
        })
    }

    pub fn for_role(metamodel: &'a dyn Metamodel, role: &str) -> Result<Self> {
        Self::new(metamodel, metamodel.require_collection(role)?)
    }

    pub fn mapping(&self) -> &'a CollectionMapping {
        self.mapping
    }

    /// Persister of the element entity, if elements are entities
    pub fn element_persister(&self) -> Option<EntityPersister<'a>> {
        self.element.map(EntityPersister::new)
    }

    /// Foreign key columns referencing the owner, in owner identifier order
    pub fn key_column_bindings(&self, group: &TableGroup) -> Result<Vec<ColumnBinding>> {
        let owner_columns = &self.owner.identifier.columns;
        if owner_columns.len() != self.mapping.key_columns.len() {
            return Err(SqmError::assertion(
                SQM0003,
                format!(
                    "collection {} has {} key columns, owner has {} identifier columns",
                    self.mapping.role,
                    self.mapping.key_columns.len(),
                    owner_columns.len()
                ),
            ));
        }
        Ok(self
            .mapping
            .key_columns
            .iter()
            .zip(owner_columns)
            .map(|(key, id)| ColumnBinding::new(group.root_alias(), key, id.sql_type))
            .collect())
    }

    fn element_binding(&self, group: &TableGroup) -> Result<AttributeReference> {
        match &self.mapping.element {
            CollectionElement::Basic { column, sql_type } => Ok(AttributeReference {
                attribute_name: ELEMENTS_ATTRIBUTE.to_string(),
                bindings: smallvec![ColumnBinding::new(group.root_alias(), column, *sql_type)],
                attribute_type: OrmType::Basic(*sql_type),
            }),
            CollectionElement::Entity { entity_name, .. } => Err(SqmError::assertion(
                SQM0005,
                format!("collection {} has entity elements of type {}", self.mapping.role, entity_name),
            )),
        }
    }

    pub fn resolve_attribute(
        &self,
        group: &TableGroup,
        embedded_path: Option<&str>,
        attribute: &str,
    ) -> Result<(ColumnBindings, OrmType)> {
        if let Some(element) = self.element_persister() {
            return element.resolve_attribute(group, embedded_path, attribute);
        }
        if attribute == ELEMENTS_ATTRIBUTE && embedded_path.is_none() {
            let reference = self.element_binding(group)?;
            return Ok((reference.bindings, reference.attribute_type));
        }
        Err(SqmError::mapping(
            SQM0301,
            format!(
                "Collection {} of basic values has no attribute named {}",
                self.mapping.role, attribute
            ),
        ))
    }

    pub fn identifier_column_bindings(&self, group: &TableGroup) -> Result<Vec<ColumnBinding>> {
        match self.element_persister() {
            Some(element) => element.identifier_column_bindings(group),
            None => Err(SqmError::assertion(
                SQM0005,
                format!("basic collection {} has no element identifier", self.mapping.role),
            )),
        }
    }

    /// The joined collection element used as a value
    pub fn element_reference(&self, group: &TableGroup) -> Result<Expression> {
        match self.element_persister() {
            Some(element) => element.entity_reference(group).map(Expression::EntityReference),
            None => self.element_binding(group).map(Expression::AttributeReference),
        }
    }
}

impl TableGroupProducer for CollectionPersister<'_> {
    fn build_table_group(
        &self,
        uid: FromElementId,
        alias_manager: &mut SqlAliasBaseManager,
        index: &mut FromClauseIndex,
    ) -> Result<TableGroup> {
        let mut alias_base = alias_manager.create_alias_base(&self.mapping.role);
        let root_table_binding = TableBinding {
            table: self.mapping.table.clone(),
            identification_variable: alias_base.generate_alias(),
        };

        let mut table_joins = Vec::new();
        if let (Some(element), CollectionElement::Entity { columns, .. }) =
            (self.element, &self.mapping.element)
        {
            let mut element_alias = root_table_binding.identification_variable.clone();
            if element.table != self.mapping.table {
                if columns.len() != element.identifier.columns.len() {
                    return Err(SqmError::assertion(
                        SQM0003,
                        format!(
                            "collection {} maps {} element columns, {} has {} identifier columns",
                            self.mapping.role,
                            columns.len(),
                            element.name,
                            element.identifier.columns.len()
                        ),
                    ));
                }
                let joined_table_binding = TableBinding {
                    table: element.table.clone(),
                    identification_variable: alias_base.generate_alias(),
                };
                let lhs = columns
                    .iter()
                    .zip(&element.identifier.columns)
                    .map(|(column, id)| {
                        ColumnBinding::new(&root_table_binding.identification_variable, column, id.sql_type)
                    })
                    .collect();
                let rhs = element
                    .identifier
                    .columns
                    .iter()
                    .map(|id| {
                        ColumnBinding::new(&joined_table_binding.identification_variable, &id.name, id.sql_type)
                    })
                    .collect();
                let predicate = equate_columns(lhs, rhs, &format!("collection {}", self.mapping.role))?;
                element_alias = joined_table_binding.identification_variable.clone();
                table_joins.push(TableJoin {
                    join_type: JoinType::Inner,
                    joined_table_binding,
                    join_predicate: Some(Predicate::Junction(predicate)),
                });
            }
            table_joins.extend(secondary_table_joins(element, &element_alias, &mut alias_base)?);
        }

        let group = TableGroup {
            uid,
            source: TableGroupSource::Collection {
                role: self.mapping.role.clone(),
                element_entity: self.element.map(|e| e.name.clone()),
            },
            root_table_binding,
            table_joins,
        };
        log::trace!(
            "built table group {} for collection {} (alias base {})",
            uid,
            self.mapping.role,
            alias_base.base()
        );
        index.cross_reference(uid, group.clone())?;
        Ok(group)
    }
}

/// The persister responsible for an already built table group
#[derive(Debug, Clone, Copy)]
pub enum Persister<'a> {
    Entity(EntityPersister<'a>),
    Collection(CollectionPersister<'a>),
}

impl<'a> Persister<'a> {
    pub fn for_table_group(group: &TableGroup, metamodel: &'a dyn Metamodel) -> Result<Self> {
        match &group.source {
            TableGroupSource::Entity { entity_name } => {
                EntityPersister::for_entity(metamodel, entity_name).map(Self::Entity)
            }
            TableGroupSource::Collection { role, .. } => {
                CollectionPersister::for_role(metamodel, role).map(Self::Collection)
            }
        }
    }

    /// Entity whose attributes can be joined from this group
    pub fn entity_mapping(&self) -> Option<&'a EntityMapping> {
        match self {
            Self::Entity(persister) => Some(persister.mapping()),
            Self::Collection(persister) => persister.element_persister().map(|p| p.mapping()),
        }
    }

    pub fn resolve_attribute(
        &self,
        group: &TableGroup,
        embedded_path: Option<&str>,
        attribute: &str,
    ) -> Result<(ColumnBindings, OrmType)> {
        match self {
            Self::Entity(persister) => persister.resolve_attribute(group, embedded_path, attribute),
            Self::Collection(persister) => {
                persister.resolve_attribute(group, embedded_path, attribute)
            }
        }
    }

    pub fn identifier_column_bindings(&self, group: &TableGroup) -> Result<Vec<ColumnBinding>> {
        match self {
            Self::Entity(persister) => persister.identifier_column_bindings(group),
            Self::Collection(persister) => persister.identifier_column_bindings(group),
        }
    }

    /// The from-element itself used as a value
    pub fn from_element_reference(&self, group: &TableGroup) -> Result<Expression> {
        match self {
            Self::Entity(persister) => persister.entity_reference(group).map(Expression::EntityReference),
            Self::Collection(persister) => persister.element_reference(group),
        }
    }
}
