//! Literal values carried by query literals and literal parameter binders

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::BasicType;

/// A literal value from the semantic tree.
///
/// Literal kinds distinguished upstream (constant fields, `true`/`false`
/// keywords) all collapse into one of these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum LiteralValue {
    /// SQL null
    Null,
    Boolean(bool),
    String(String),
    Character(char),
    /// 32-bit signed integer
    Integer(i32),
    /// 64-bit signed integer
    Long(i64),
    /// Arbitrary size integer (bounded to 128 bits)
    BigInteger(i128),
    Float(f32),
    Double(f64),
    /// Arbitrary precision decimal
    BigDecimal(Decimal),
    /// Enum constant, rendered by constant name
    Enum { enum_type: String, constant: String },
}

impl LiteralValue {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The type a value of this kind has when nothing else is known.
    ///
    /// Null has no natural type.
    pub fn natural_type(&self) -> Option<BasicType> {
        match self {
            Self::Null => None,
            Self::Boolean(_) => Some(BasicType::Boolean),
            Self::String(_) | Self::Enum { .. } => Some(BasicType::String),
            Self::Character(_) => Some(BasicType::Character),
            Self::Integer(_) => Some(BasicType::Integer),
            Self::Long(_) => Some(BasicType::Long),
            Self::BigInteger(_) => Some(BasicType::BigInteger),
            Self::Float(_) => Some(BasicType::Float),
            Self::Double(_) => Some(BasicType::Double),
            Self::BigDecimal(_) => Some(BasicType::BigDecimal),
        }
    }

    /// Create a string value
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::String(s) => write!(f, "{}", s),
            Self::Character(c) => write!(f, "{}", c),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Long(l) => write!(f, "{}", l),
            Self::BigInteger(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Double(x) => write!(f, "{}", x),
            Self::BigDecimal(d) => write!(f, "{}", d),
            Self::Enum {
                enum_type,
                constant,
            } => write!(f, "{}.{}", enum_type, constant),
        }
    }
}
