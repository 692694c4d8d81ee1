//! Predicate nodes for SQM

use serde::{Deserialize, Serialize};

use crate::{BoxExpr, BoxPredicate, RelationalOperator, SqmExpression, SqmQuerySpec};

/// All SQM predicate kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SqmPredicate {
    And(SqmJunction),
    Or(SqmJunction),
    Negated(SqmNegatedPredicate),
    /// Explicitly parenthesised predicate
    Grouped(SqmGroupedPredicate),
    Relational(SqmRelationalPredicate),
    Between(SqmBetweenPredicate),
    Like(SqmLikePredicate),
    IsNull(SqmNullnessPredicate),
    InList(SqmInListPredicate),
    InSubQuery(SqmInSubQueryPredicate),
    /// Named mapping filter
    Filter(SqmFilterPredicate),
}

impl SqmPredicate {
    pub fn and(lhs: SqmPredicate, rhs: SqmPredicate) -> Self {
        Self::And(SqmJunction::new(lhs, rhs))
    }

    pub fn or(lhs: SqmPredicate, rhs: SqmPredicate) -> Self {
        Self::Or(SqmJunction::new(lhs, rhs))
    }

    pub fn relational(operator: RelationalOperator, lhs: SqmExpression, rhs: SqmExpression) -> Self {
        Self::Relational(SqmRelationalPredicate {
            operator,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn is_null(expression: SqmExpression, negated: bool) -> Self {
        Self::IsNull(SqmNullnessPredicate {
            expression: Box::new(expression),
            negated,
        })
    }

    pub fn in_list(test_expression: SqmExpression, list_expressions: Vec<SqmExpression>) -> Self {
        Self::InList(SqmInListPredicate {
            test_expression: Box::new(test_expression),
            list_expressions,
            negated: false,
        })
    }
}

/// Binary AND / OR
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmJunction {
    pub lhs: BoxPredicate,
    pub rhs: BoxPredicate,
}

impl SqmJunction {
    pub fn new(lhs: SqmPredicate, rhs: SqmPredicate) -> Self {
        Self {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmNegatedPredicate {
    pub predicate: BoxPredicate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmGroupedPredicate {
    pub predicate: BoxPredicate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmRelationalPredicate {
    pub operator: RelationalOperator,
    pub lhs: BoxExpr,
    pub rhs: BoxExpr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmBetweenPredicate {
    pub expression: BoxExpr,
    pub lower_bound: BoxExpr,
    pub upper_bound: BoxExpr,
    #[serde(default)]
    pub negated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmLikePredicate {
    pub match_expression: BoxExpr,
    pub pattern: BoxExpr,
    #[serde(default)]
    pub escape: Option<BoxExpr>,
    #[serde(default)]
    pub negated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmNullnessPredicate {
    pub expression: BoxExpr,
    #[serde(default)]
    pub negated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmInListPredicate {
    pub test_expression: BoxExpr,
    /// May be empty
    pub list_expressions: Vec<SqmExpression>,
    #[serde(default)]
    pub negated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmInSubQueryPredicate {
    pub test_expression: BoxExpr,
    pub sub_query: Box<SqmQuerySpec>,
    #[serde(default)]
    pub negated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqmFilterPredicate {
    pub name: String,
    #[serde(default)]
    pub condition: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FromElementId, SqmLiteral};

    #[test]
    fn test_predicate_json_shape() {
        let predicate = SqmPredicate::relational(
            RelationalOperator::NotEqual,
            SqmExpression::attribute(FromElementId(1), "id"),
            SqmExpression::named_parameter("excludeId"),
        );
        let json = serde_json::to_value(&predicate).unwrap();
        assert_eq!(json["Relational"]["operator"], "NotEqual");
        assert_eq!(json["Relational"]["lhs"]["AttributeReference"]["lhs"], 1);
        assert_eq!(json["Relational"]["rhs"]["NamedParameter"]["name"], "excludeId");
    }

    #[test]
    fn test_defaults_on_deserialize() {
        let json = r#"{"InList":{"test_expression":{"Literal":{"kind":"Integer","value":{"type":"Integer","value":1}}},"list_expressions":[]}}"#;
        let predicate: SqmPredicate = serde_json::from_str(json).unwrap();
        match predicate {
            SqmPredicate::InList(in_list) => {
                assert!(!in_list.negated);
                assert!(in_list.list_expressions.is_empty());
                assert!(matches!(*in_list.test_expression, SqmExpression::Literal(ref l) if *l == SqmLiteral::integer(1)));
            }
            other => panic!("unexpected predicate {:?}", other),
        }
    }
}
