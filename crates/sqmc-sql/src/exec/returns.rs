//! Result returns: how each top-level selection is read back

use serde::Serialize;
use sqmc_types::{BasicType, CompositeType, OrmType};

use crate::ast::{DynamicInstantiationTarget, Expression, Selection};

/// What a reader produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ReaderKind {
    Basic(BasicType),
    Composite(CompositeType),
    Entity {
        entity_name: String,
    },
    DynamicInstantiation {
        target: DynamicInstantiationTarget,
        arguments: Vec<ReturnReader>,
    },
    /// Type could not be determined statically
    Unknown,
}

/// Reads `column_count` columns starting at the 1-based `start_position`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnReader {
    pub start_position: usize,
    pub column_count: usize,
    pub kind: ReaderKind,
}

impl ReturnReader {
    /// Reader for an expression rendered in the root select clause
    pub fn for_expression(expression: &Expression, start_position: usize) -> Self {
        match expression {
            Expression::EntityReference(reference) => Self {
                start_position,
                column_count: reference.all_bindings().count(),
                kind: ReaderKind::Entity {
                    entity_name: reference.entity_name.clone(),
                },
            },
            Expression::AttributeReference(reference) => Self {
                start_position,
                column_count: reference.bindings.len(),
                kind: ReaderKind::from_type(Some(&reference.attribute_type)),
            },
            Expression::DynamicInstantiation(instantiation) => {
                let mut position = start_position;
                let arguments: Vec<_> = instantiation
                    .arguments
                    .iter()
                    .map(|argument| {
                        let reader = Self::for_expression(&argument.expression, position);
                        position += reader.column_count;
                        reader
                    })
                    .collect();
                Self {
                    start_position,
                    column_count: position - start_position,
                    kind: ReaderKind::DynamicInstantiation {
                        target: instantiation.target.clone(),
                        arguments,
                    },
                }
            }
            other => {
                let expression_type = other.expression_type();
                Self {
                    start_position,
                    column_count: expression_type.as_ref().map_or(1, OrmType::column_span),
                    kind: ReaderKind::from_type(expression_type.as_ref()),
                }
            }
        }
    }

    /// Position just past the last column read
    pub fn end_position(&self) -> usize {
        self.start_position + self.column_count
    }
}

impl ReaderKind {
    fn from_type(expression_type: Option<&OrmType>) -> Self {
        match expression_type {
            Some(OrmType::Basic(basic)) => Self::Basic(*basic),
            Some(OrmType::Composite(composite)) => Self::Composite(composite.clone()),
            Some(OrmType::Entity(entity)) => Self::Entity {
                entity_name: entity.entity_name.clone(),
            },
            None => Self::Unknown,
        }
    }
}

/// One top-level selection of the rendered query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Return {
    pub result_variable: Option<String>,
    pub reader: ReturnReader,
}

impl Return {
    pub fn for_selection(selection: &Selection, start_position: usize) -> Self {
        Self {
            result_variable: selection.result_variable.clone(),
            reader: ReturnReader::for_expression(&selection.expression, start_position),
        }
    }
}
