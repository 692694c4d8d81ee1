//! Literal nodes for SQM

use serde::{Deserialize, Serialize};
use sqmc_types::{LiteralValue, OrmType};

/// How a literal was written in the source query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralKind {
    String,
    Character,
    Double,
    Integer,
    BigInteger,
    BigDecimal,
    Float,
    Long,
    True,
    False,
    Null,
    /// Reference to an enum constant
    ConstantEnum,
    /// Reference to a static constant field, already evaluated upstream
    ConstantField,
}

/// A literal in the semantic tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqmLiteral {
    pub kind: LiteralKind,
    pub value: LiteralValue,
    /// Type inferred upstream, if any
    #[serde(default)]
    pub expression_type: Option<OrmType>,
}

impl SqmLiteral {
    pub fn new(kind: LiteralKind, value: LiteralValue) -> Self {
        Self {
            kind,
            value,
            expression_type: None,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(LiteralKind::String, LiteralValue::String(value.into()))
    }

    pub fn integer(value: i32) -> Self {
        Self::new(LiteralKind::Integer, LiteralValue::Integer(value))
    }

    pub fn long(value: i64) -> Self {
        Self::new(LiteralKind::Long, LiteralValue::Long(value))
    }

    pub fn boolean(value: bool) -> Self {
        let kind = if value {
            LiteralKind::True
        } else {
            LiteralKind::False
        };
        Self::new(kind, LiteralValue::Boolean(value))
    }

    pub fn null() -> Self {
        Self::new(LiteralKind::Null, LiteralValue::Null)
    }

    pub fn with_type(mut self, expression_type: OrmType) -> Self {
        self.expression_type = Some(expression_type);
        self
    }
}
