use serde::Serialize;

use crate::ast::Expression;

/// The select list
#[derive(Debug, Clone, Default, Serialize)]
pub struct SelectClause {
    pub distinct: bool,
    pub selections: Vec<Selection>,
}

/// A selected expression and its result variable
#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    pub expression: Expression,
    pub result_variable: Option<String>,
}
