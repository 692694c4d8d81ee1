//! Rendering options

use serde::{Deserialize, Serialize};

/// Options controlling SQL text generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Text of the not-equal comparison operator, `<>` or `!=`
    pub not_equal_operator: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            not_equal_operator: "<>".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn with_not_equal_operator(mut self, operator: impl Into<String>) -> Self {
        self.not_equal_operator = operator.into();
        self
    }
}
