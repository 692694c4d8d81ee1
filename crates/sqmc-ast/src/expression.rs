//! Expression nodes for SQM

use serde::{Deserialize, Serialize};
use sqmc_types::OrmType;

use crate::{
    BinaryArithmeticOperator, BoxExpr, FromElementId, SqmLiteral, SqmPredicate, UnaryOperator,
};

/// All SQM expression kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SqmExpression {
    // === References ===
    /// `c.name`
    AttributeReference(SqmAttributeReference),
    /// `c` used as a value
    FromElementReference(FromElementId),

    // === Values ===
    Literal(SqmLiteral),
    /// `:name`
    NamedParameter(SqmNamedParameter),
    /// `?1`
    PositionalParameter(SqmPositionalParameter),

    // === Operators ===
    UnaryOperation(SqmUnaryOperation),
    BinaryArithmetic(SqmBinaryArithmetic),

    // === Aggregates ===
    Avg(SqmAggregate),
    Min(SqmAggregate),
    Max(SqmAggregate),
    Sum(SqmAggregate),
    Count(SqmAggregate),
    /// `count(*)`
    CountStar(SqmCountStar),

    // === Conditionals ===
    CaseSimple(SqmCaseSimple),
    CaseSearched(SqmCaseSearched),
    Coalesce(SqmCoalesce),
    Nullif(SqmNullif),

    // === Functions ===
    Concat(SqmConcat),
    /// Function not known to the query language, passed through by name
    Function(SqmFunction),

    /// `new Dto(...)`, `new list(...)`, `new map(...)`
    DynamicInstantiation(SqmDynamicInstantiation),
}

impl SqmExpression {
    /// Reference to `attribute` of from-element `lhs`
    pub fn attribute(lhs: FromElementId, attribute: impl Into<String>) -> Self {
        Self::AttributeReference(SqmAttributeReference {
            lhs,
            attribute: attribute.into(),
        })
    }

    /// Named parameter without an anticipated type
    pub fn named_parameter(name: impl Into<String>) -> Self {
        Self::NamedParameter(SqmNamedParameter {
            name: name.into(),
            anticipated_type: None,
        })
    }

    /// Positional parameter without an anticipated type
    pub fn positional_parameter(position: u32) -> Self {
        Self::PositionalParameter(SqmPositionalParameter {
            position,
            anticipated_type: None,
        })
    }

    pub fn literal(literal: SqmLiteral) -> Self {
        Self::Literal(literal)
    }

    pub fn arithmetic(operator: BinaryArithmeticOperator, lhs: SqmExpression, rhs: SqmExpression) -> Self {
        Self::BinaryArithmetic(SqmBinaryArithmetic {
            operator,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            expression_type: None,
        })
    }
}

impl From<SqmLiteral> for SqmExpression {
    fn from(literal: SqmLiteral) -> Self {
        Self::Literal(literal)
    }
}

/// Attribute of a from-element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmAttributeReference {
    pub lhs: FromElementId,
    pub attribute: String,
}

/// Named parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmNamedParameter {
    pub name: String,
    /// Type inferred from the parameter's usage
    #[serde(default)]
    pub anticipated_type: Option<OrmType>,
}

/// Positional (JDBC-style) parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmPositionalParameter {
    pub position: u32,
    #[serde(default)]
    pub anticipated_type: Option<OrmType>,
}

/// Prefix `+` / `-`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmUnaryOperation {
    pub operator: UnaryOperator,
    pub operand: BoxExpr,
}

/// Binary arithmetic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmBinaryArithmetic {
    pub operator: BinaryArithmeticOperator,
    pub lhs: BoxExpr,
    pub rhs: BoxExpr,
    #[serde(default)]
    pub expression_type: Option<OrmType>,
}

/// avg / min / max / sum / count over one argument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmAggregate {
    pub argument: BoxExpr,
    #[serde(default)]
    pub distinct: bool,
    #[serde(default)]
    pub expression_type: Option<OrmType>,
}

impl SqmAggregate {
    pub fn new(argument: SqmExpression) -> Self {
        Self {
            argument: Box::new(argument),
            distinct: false,
            expression_type: None,
        }
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }
}

/// `count(*)`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SqmCountStar {
    #[serde(default)]
    pub distinct: bool,
}

/// `case fixture when value then result ... else otherwise end`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmCaseSimple {
    pub fixture: BoxExpr,
    pub when_fragments: Vec<SqmSimpleWhen>,
    pub otherwise: BoxExpr,
    #[serde(default)]
    pub expression_type: Option<OrmType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmSimpleWhen {
    pub value: SqmExpression,
    pub result: SqmExpression,
}

/// `case when predicate then result ... else otherwise end`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmCaseSearched {
    pub when_fragments: Vec<SqmSearchedWhen>,
    pub otherwise: BoxExpr,
    #[serde(default)]
    pub expression_type: Option<OrmType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmSearchedWhen {
    pub predicate: SqmPredicate,
    pub result: SqmExpression,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmCoalesce {
    pub values: Vec<SqmExpression>,
    #[serde(default)]
    pub expression_type: Option<OrmType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmNullif {
    pub first: BoxExpr,
    pub second: BoxExpr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmConcat {
    pub lhs: BoxExpr,
    pub rhs: BoxExpr,
}

/// Non-standard function call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<SqmExpression>,
    #[serde(default)]
    pub expression_type: Option<OrmType>,
}

/// What a dynamic instantiation builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstantiationTargetNature {
    List,
    Map,
    Class,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqmInstantiationTarget {
    pub nature: InstantiationTargetNature,
    /// Class name, required when `nature` is `Class`
    #[serde(default)]
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmDynamicInstantiation {
    pub target: SqmInstantiationTarget,
    pub arguments: Vec<SqmDynamicInstantiationArgument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmDynamicInstantiationArgument {
    pub expression: SqmExpression,
    #[serde(default)]
    pub alias: Option<String>,
}
