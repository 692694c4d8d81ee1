//! Relational expressions

use serde::Serialize;
use smallvec::SmallVec;
use sqmc_ast::UnaryOperator;
use sqmc_types::{BasicType, LiteralValue, OrmType};

use crate::ast::{ColumnBinding, Predicate};

/// Column bindings of one attribute; most attributes span a single column
pub type ColumnBindings = SmallVec<[ColumnBinding; 1]>;

/// All relational expression kinds
#[derive(Debug, Clone, Serialize)]
pub enum Expression {
    /// A single column
    ColumnReference(ColumnBinding),
    /// An attribute resolved to one or more columns
    AttributeReference(AttributeReference),
    /// An entity used as a value
    EntityReference(EntityReference),
    Literal(QueryLiteral),
    NamedParameter(NamedParameter),
    PositionalParameter(PositionalParameter),
    UnaryOperation(UnaryOperation),
    BinaryArithmetic(BinaryArithmetic),
    Aggregate(AggregateFunction),
    CountStar(CountStarFunction),
    CaseSearched(CaseSearchedExpression),
    CaseSimple(CaseSimpleExpression),
    Coalesce(CoalesceFunction),
    Nullif(NullifFunction),
    Concat(ConcatFunction),
    NonStandardFunction(NonStandardFunction),
    DynamicInstantiation(DynamicInstantiation),
}

impl Expression {
    /// The type this expression evaluates to, when known
    pub fn expression_type(&self) -> Option<OrmType> {
        match self {
            Self::ColumnReference(binding) => Some(OrmType::Basic(binding.sql_type)),
            Self::AttributeReference(reference) => Some(reference.attribute_type.clone()),
            Self::EntityReference(reference) => Some(reference.expression_type.clone()),
            Self::Literal(literal) => literal.literal_type.clone(),
            Self::NamedParameter(parameter) => Some(parameter.parameter_type.clone()),
            Self::PositionalParameter(parameter) => Some(parameter.parameter_type.clone()),
            Self::UnaryOperation(operation) => operation.operand.expression_type(),
            Self::BinaryArithmetic(arithmetic) => arithmetic.expression_type.clone(),
            Self::Aggregate(aggregate) => aggregate.expression_type.clone(),
            Self::CountStar(_) => Some(OrmType::Basic(BasicType::Long)),
            Self::CaseSearched(case) => case.expression_type.clone(),
            Self::CaseSimple(case) => case.expression_type.clone(),
            Self::Coalesce(coalesce) => coalesce.expression_type.clone(),
            Self::Nullif(nullif) => nullif.first.expression_type(),
            Self::Concat(_) => Some(OrmType::Basic(BasicType::String)),
            Self::NonStandardFunction(function) => function.expression_type.clone(),
            Self::DynamicInstantiation(_) => None,
        }
    }
}

/// Attribute reference resolved against a table group
#[derive(Debug, Clone, Serialize)]
pub struct AttributeReference {
    pub attribute_name: String,
    pub bindings: ColumnBindings,
    pub attribute_type: OrmType,
}

/// Entity reference: identifier columns plus every other single-table column
#[derive(Debug, Clone, Serialize)]
pub struct EntityReference {
    pub entity_name: String,
    pub identifier_bindings: Vec<ColumnBinding>,
    pub attribute_bindings: Vec<ColumnBinding>,
    pub expression_type: OrmType,
}

impl EntityReference {
    /// Every column, identifier first
    pub fn all_bindings(&self) -> impl Iterator<Item = &ColumnBinding> {
        self.identifier_bindings
            .iter()
            .chain(self.attribute_bindings.iter())
    }
}

/// Literal value with its resolved type; `None` only for untyped null
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryLiteral {
    pub value: LiteralValue,
    pub literal_type: Option<OrmType>,
}

impl QueryLiteral {
    pub fn column_span(&self) -> usize {
        self.literal_type.as_ref().map_or(1, OrmType::column_span)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedParameter {
    pub name: String,
    pub parameter_type: OrmType,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionalParameter {
    pub position: u32,
    pub parameter_type: OrmType,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnaryOperation {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
}

/// Infix arithmetic operators; modulo is lowered to `mod(..)` instead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Quot,
}

impl ArithmeticOperator {
    /// Operator text including its surrounding whitespace
    pub const fn sql_text(&self) -> &'static str {
        match self {
            Self::Add => " + ",
            Self::Subtract => " - ",
            Self::Multiply => " * ",
            Self::Divide | Self::Quot => " / ",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BinaryArithmetic {
    pub operator: ArithmeticOperator,
    pub lhs: Box<Expression>,
    pub rhs: Box<Expression>,
    pub expression_type: Option<OrmType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AggregateKind {
    Avg,
    Min,
    Max,
    Sum,
    Count,
}

impl AggregateKind {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Avg => "avg",
            Self::Min => "min",
            Self::Max => "max",
            Self::Sum => "sum",
            Self::Count => "count",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateFunction {
    pub kind: AggregateKind,
    pub argument: Box<Expression>,
    pub distinct: bool,
    pub expression_type: Option<OrmType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountStarFunction {
    pub distinct: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchedWhenFragment {
    pub predicate: Predicate,
    pub result: Expression,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseSearchedExpression {
    pub when_fragments: Vec<SearchedWhenFragment>,
    pub otherwise: Box<Expression>,
    pub expression_type: Option<OrmType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimpleWhenFragment {
    pub value: Expression,
    pub result: Expression,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseSimpleExpression {
    pub fixture: Box<Expression>,
    pub when_fragments: Vec<SimpleWhenFragment>,
    pub otherwise: Box<Expression>,
    pub expression_type: Option<OrmType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoalesceFunction {
    pub values: Vec<Expression>,
    pub expression_type: Option<OrmType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NullifFunction {
    pub first: Box<Expression>,
    pub second: Box<Expression>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConcatFunction {
    pub lhs: Box<Expression>,
    pub rhs: Box<Expression>,
}

/// Function passed through by name
#[derive(Debug, Clone, Serialize)]
pub struct NonStandardFunction {
    pub name: String,
    pub arguments: Vec<Expression>,
    pub expression_type: Option<OrmType>,
}

/// What a dynamic instantiation assembles downstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DynamicInstantiationTarget {
    List,
    Map,
    Class(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct DynamicInstantiationArgument {
    pub expression: Expression,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DynamicInstantiation {
    pub target: DynamicInstantiationTarget,
    pub arguments: Vec<DynamicInstantiationArgument>,
}
