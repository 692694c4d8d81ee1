//! Operators appearing in the semantic tree

use serde::{Deserialize, Serialize};

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Plus,
    Minus,
}

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// Integer quotient
    Quot,
    Modulo,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationalOperator {
    Equal,
    NotEqual,
    GreaterThanOrEqual,
    GreaterThan,
    LessThanOrEqual,
    LessThan,
}

impl RelationalOperator {
    /// Get the operator symbol
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::GreaterThanOrEqual => ">=",
            Self::GreaterThan => ">",
            Self::LessThanOrEqual => "<=",
            Self::LessThan => "<",
        }
    }
}
