//! Rendering of relational select queries into executable SQL

mod binder;
mod options;
mod returns;
mod walker;

pub use binder::*;
pub use options::*;
pub use returns::*;
pub use walker::*;

use serde::Serialize;

/// SQL text plus everything needed to bind and read it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JdbcSelect {
    pub sql: String,
    pub parameter_binders: Vec<ParameterBinder>,
    pub returns: Vec<Return>,
}

impl JdbcSelect {
    /// Number of `?` placeholders outside quoted literals
    pub fn placeholder_count(&self) -> usize {
        let mut quoted = false;
        let mut count = 0;
        for c in self.sql.chars() {
            match c {
                '\'' => quoted = !quoted,
                '?' if !quoted => count += 1,
                _ => {}
            }
        }
        count
    }

    /// Placeholders expected from the binders
    pub fn bound_column_count(&self) -> usize {
        self.parameter_binders
            .iter()
            .map(ParameterBinder::column_span)
            .sum()
    }
}
