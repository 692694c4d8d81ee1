//! Dialect seam for rendering literal values as SQL text

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{BasicType, LiteralValue, OrmType};

/// Reason a literal could not be rendered inline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralRenderError {
    #[error("type {0} spans more than one column")]
    MultiColumn(String),
    #[error("value is not compatible with type {0}")]
    Incompatible(String),
    #[error("{0}")]
    Unsupported(String),
}

/// A SQL dialect, consulted only for inline literal rendering
pub trait Dialect {
    fn name(&self) -> &str;

    /// Render `value` as SQL text, typed as `literal_type` when known
    fn literal_to_sql(
        &self,
        value: &LiteralValue,
        literal_type: Option<&OrmType>,
    ) -> Result<String, LiteralRenderError>;
}

/// How boolean literals are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BooleanRendering {
    /// `true` / `false`
    #[default]
    Keyword,
    /// `1` / `0`
    Numeric,
}

/// ANSI-flavoured dialect with a few configurable knobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardDialect {
    pub name: String,
    pub boolean_rendering: BooleanRendering,
    pub supports_big_integer_literals: bool,
}

impl Default for StandardDialect {
    fn default() -> Self {
        Self {
            name: "ansi".to_string(),
            boolean_rendering: BooleanRendering::Keyword,
            supports_big_integer_literals: true,
        }
    }
}

impl StandardDialect {
    fn check_compatible(
        &self,
        value: &LiteralValue,
        basic: BasicType,
    ) -> Result<(), LiteralRenderError> {
        let compatible = match value {
            LiteralValue::Null => true,
            LiteralValue::Boolean(_) => matches!(basic, BasicType::Boolean),
            LiteralValue::String(_) | LiteralValue::Character(_) | LiteralValue::Enum { .. } => {
                basic.is_textual()
            }
            _ => basic.is_numeric(),
        };
        if compatible {
            Ok(())
        } else {
            Err(LiteralRenderError::Incompatible(basic.name().to_string()))
        }
    }
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

impl Dialect for StandardDialect {
    fn name(&self) -> &str {
        &self.name
    }

    fn literal_to_sql(
        &self,
        value: &LiteralValue,
        literal_type: Option<&OrmType>,
    ) -> Result<String, LiteralRenderError> {
        match literal_type {
            Some(OrmType::Basic(basic)) => self.check_compatible(value, *basic)?,
            Some(other) => return Err(LiteralRenderError::MultiColumn(other.name().to_string())),
            None => {}
        }

        let sql = match value {
            LiteralValue::Null => "null".to_string(),
            LiteralValue::Boolean(b) => match self.boolean_rendering {
                BooleanRendering::Keyword => b.to_string(),
                BooleanRendering::Numeric => if *b { "1" } else { "0" }.to_string(),
            },
            LiteralValue::String(s) => quote(s),
            LiteralValue::Character(c) => quote(&c.to_string()),
            LiteralValue::Integer(i) => i.to_string(),
            LiteralValue::Long(l) => l.to_string(),
            LiteralValue::BigInteger(i) => {
                if !self.supports_big_integer_literals && i64::try_from(*i).is_err() {
                    return Err(LiteralRenderError::Unsupported(format!(
                        "dialect {} cannot express integer literal {}",
                        self.name, i
                    )));
                }
                i.to_string()
            }
            LiteralValue::Float(x) => {
                if !x.is_finite() {
                    return Err(LiteralRenderError::Unsupported(format!(
                        "non-finite float {}",
                        x
                    )));
                }
                format!("{:?}", x)
            }
            LiteralValue::Double(x) => {
                if !x.is_finite() {
                    return Err(LiteralRenderError::Unsupported(format!(
                        "non-finite double {}",
                        x
                    )));
                }
                format!("{:?}", x)
            }
            LiteralValue::BigDecimal(d) => d.to_string(),
            LiteralValue::Enum { constant, .. } => quote(constant),
        };
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompositeType;
    use rstest::rstest;

    #[rstest]
    #[case(LiteralValue::string("hello"), "'hello'")]
    #[case(LiteralValue::string("O'Brien"), "'O''Brien'")]
    #[case(LiteralValue::Character('x'), "'x'")]
    #[case(LiteralValue::Integer(42), "42")]
    #[case(LiteralValue::Long(-3), "-3")]
    #[case(LiteralValue::Double(1.5), "1.5")]
    #[case(LiteralValue::Float(2.0), "2.0")]
    #[case(LiteralValue::Boolean(true), "true")]
    #[case(LiteralValue::Null, "null")]
    fn test_standard_literals(#[case] value: LiteralValue, #[case] expected: &str) {
        let dialect = StandardDialect::default();
        assert_eq!(dialect.literal_to_sql(&value, None).unwrap(), expected);
    }

    #[test]
    fn test_numeric_booleans() {
        let dialect = StandardDialect {
            boolean_rendering: BooleanRendering::Numeric,
            ..Default::default()
        };
        let sql = dialect
            .literal_to_sql(&LiteralValue::Boolean(false), None)
            .unwrap();
        assert_eq!(sql, "0");
    }

    #[test]
    fn test_enum_renders_constant_name() {
        let value = LiteralValue::Enum {
            enum_type: "Status".to_string(),
            constant: "ACTIVE".to_string(),
        };
        let dialect = StandardDialect::default();
        assert_eq!(dialect.literal_to_sql(&value, None).unwrap(), "'ACTIVE'");
    }

    #[test]
    fn test_rejections() {
        let dialect = StandardDialect {
            supports_big_integer_literals: false,
            ..Default::default()
        };
        let big = LiteralValue::BigInteger(i128::from(i64::MAX) + 1);
        assert!(matches!(
            dialect.literal_to_sql(&big, None),
            Err(LiteralRenderError::Unsupported(_))
        ));
        assert!(dialect
            .literal_to_sql(&LiteralValue::BigInteger(12), None)
            .is_ok());

        let composite = OrmType::Composite(
            CompositeType::new("Address").with_component("city", BasicType::String),
        );
        assert!(matches!(
            dialect.literal_to_sql(&LiteralValue::string("x"), Some(&composite)),
            Err(LiteralRenderError::MultiColumn(_))
        ));

        let integer = OrmType::Basic(BasicType::Integer);
        assert_eq!(
            dialect.literal_to_sql(&LiteralValue::string("x"), Some(&integer)),
            Err(LiteralRenderError::Incompatible("Integer".to_string()))
        );

        assert!(dialect
            .literal_to_sql(&LiteralValue::Double(f64::NAN), None)
            .is_err());
    }
}
