//! Basic (single column) SQL types

use serde::{Deserialize, Serialize};
use std::fmt;

/// A type occupying exactly one JDBC column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BasicType {
    /// Variable length character data
    String,
    /// Single character
    Character,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
    /// Arbitrary size integer
    BigInteger,
    /// Single precision floating point
    Float,
    /// Double precision floating point
    Double,
    /// Arbitrary precision decimal
    BigDecimal,
    /// Boolean
    Boolean,
    /// Calendar date
    Date,
    /// Date and time
    Timestamp,
    /// Raw bytes
    Binary,
}

impl BasicType {
    /// Get the simple name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Character => "Character",
            Self::Integer => "Integer",
            Self::Long => "Long",
            Self::BigInteger => "BigInteger",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::BigDecimal => "BigDecimal",
            Self::Boolean => "Boolean",
            Self::Date => "Date",
            Self::Timestamp => "Timestamp",
            Self::Binary => "Binary",
        }
    }

    /// Check if this type is numeric
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Integer
                | Self::Long
                | Self::BigInteger
                | Self::Float
                | Self::Double
                | Self::BigDecimal
        )
    }

    /// Check if this type holds character data
    pub const fn is_textual(&self) -> bool {
        matches!(self, Self::String | Self::Character)
    }

    /// Rank used for numeric promotion, wider types rank higher
    const fn numeric_rank(&self) -> u8 {
        match self {
            Self::Integer => 1,
            Self::Long => 2,
            Self::BigInteger => 3,
            Self::Float => 4,
            Self::Double => 5,
            Self::BigDecimal => 6,
            _ => 0,
        }
    }

    /// Result type of a binary arithmetic operation over `self` and `other`.
    ///
    /// Returns `None` when either side is not numeric.
    pub fn promote(self, other: BasicType) -> Option<BasicType> {
        if !self.is_numeric() || !other.is_numeric() {
            return None;
        }
        if self.numeric_rank() >= other.numeric_rank() {
            Some(self)
        } else {
            Some(other)
        }
    }
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
