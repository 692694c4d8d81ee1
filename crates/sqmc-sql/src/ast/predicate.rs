//! Relational predicates

use serde::Serialize;

use crate::ast::{Expression, QuerySpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum JunctionNature {
    Conjunction,
    Disjunction,
}

impl JunctionNature {
    pub const fn separator(&self) -> &'static str {
        match self {
            Self::Conjunction => " and ",
            Self::Disjunction => " or ",
        }
    }
}

/// Comparison operators, one-to-one with the semantic tree's
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    GreaterThanOrEqual,
    GreaterThan,
    LessThanOrEqual,
    LessThan,
}

/// All relational predicate kinds
#[derive(Debug, Clone, Serialize)]
pub enum Predicate {
    Junction(Junction),
    Negated(NegatedPredicate),
    Grouped(GroupedPredicate),
    Relational(RelationalPredicate),
    Between(BetweenPredicate),
    Like(LikePredicate),
    NullCheck(NullnessPredicate),
    InList(InListPredicate),
    InSubQuery(InSubQueryPredicate),
    Filter(FilterPredicate),
}

impl Predicate {
    /// A predicate with nothing to render
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Junction(junction) => junction.is_empty(),
            Self::Grouped(grouped) => grouped.predicate.is_empty(),
            _ => false,
        }
    }

    pub fn equal(lhs: Expression, rhs: Expression) -> Self {
        Self::Relational(RelationalPredicate {
            operator: ComparisonOperator::Equal,
            lhs,
            rhs,
        })
    }
}

/// AND / OR over any number of children
#[derive(Debug, Clone, Serialize)]
pub struct Junction {
    pub nature: JunctionNature,
    pub predicates: Vec<Predicate>,
}

impl Junction {
    pub fn new(nature: JunctionNature) -> Self {
        Self {
            nature,
            predicates: Vec::new(),
        }
    }

    pub fn conjunction() -> Self {
        Self::new(JunctionNature::Conjunction)
    }

    /// Append `predicate`, splicing in the children of a same-nature junction
    pub fn add(&mut self, predicate: Predicate) {
        match predicate {
            Predicate::Junction(junction) if junction.nature == self.nature => {
                self.predicates.extend(junction.predicates);
            }
            other => self.predicates.push(other),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.iter().all(Predicate::is_empty)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NegatedPredicate {
    pub predicate: Box<Predicate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupedPredicate {
    pub predicate: Box<Predicate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationalPredicate {
    pub operator: ComparisonOperator,
    pub lhs: Expression,
    pub rhs: Expression,
}

#[derive(Debug, Clone, Serialize)]
pub struct BetweenPredicate {
    pub expression: Expression,
    pub lower_bound: Expression,
    pub upper_bound: Expression,
    pub negated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LikePredicate {
    pub match_expression: Expression,
    pub pattern: Expression,
    pub escape_character: Option<Expression>,
    pub negated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NullnessPredicate {
    pub expression: Expression,
    pub negated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InListPredicate {
    pub test_expression: Expression,
    pub list_expressions: Vec<Expression>,
    pub negated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InSubQueryPredicate {
    pub test_expression: Expression,
    pub sub_query: Box<QuerySpec>,
    pub negated: bool,
}

/// Mapping filter reference; has no SQL rendering yet
#[derive(Debug, Clone, Serialize)]
pub struct FilterPredicate {
    pub name: String,
    pub condition: Option<String>,
}
