//! Parameter binders

use serde::Serialize;
use sqmc_types::{LiteralValue, OrmType};

/// One bindable value, in placeholder order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParameterBinder {
    Named {
        name: String,
        bind_type: OrmType,
    },
    Positional {
        position: u32,
        bind_type: OrmType,
    },
    /// A literal bound instead of inlined
    Literal {
        value: LiteralValue,
        literal_type: Option<OrmType>,
    },
}

impl ParameterBinder {
    pub fn bind_type(&self) -> Option<&OrmType> {
        match self {
            Self::Named { bind_type, .. } | Self::Positional { bind_type, .. } => Some(bind_type),
            Self::Literal { literal_type, .. } => literal_type.as_ref(),
        }
    }

    /// Number of `?` placeholders this binder fills
    pub fn column_span(&self) -> usize {
        self.bind_type().map_or(1, OrmType::column_span)
    }
}
