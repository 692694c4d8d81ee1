//! Parameter bindings: optional explicit types for query parameters

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sqmc_diagnostics::{Result, SqmError, SQM0401};
use sqmc_types::{LiteralValue, OrmType};

/// An explicit binding for one parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterBinding {
    /// Type the caller bound the parameter with, overriding inference
    #[serde(default)]
    pub bind_type: Option<OrmType>,
    #[serde(default)]
    pub value: Option<LiteralValue>,
}

impl ParameterBinding {
    pub fn typed(bind_type: OrmType) -> Self {
        Self {
            bind_type: Some(bind_type),
            value: None,
        }
    }

    pub fn with_value(mut self, value: LiteralValue) -> Self {
        self.value = Some(value);
        self
    }
}

/// Lookup of parameter bindings by name or position
pub trait ParameterBindings {
    fn binding_by_name(&self, name: &str) -> Option<&ParameterBinding>;

    fn binding_by_position(&self, position: u32) -> Option<&ParameterBinding>;
}

/// Bindings collected for one query execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryParameterBindings {
    #[serde(default)]
    pub named: IndexMap<String, ParameterBinding>,
    #[serde(default)]
    pub positional: IndexMap<u32, ParameterBinding>,
}

impl QueryParameterBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_named(mut self, name: impl Into<String>, binding: ParameterBinding) -> Self {
        self.named.insert(name.into(), binding);
        self
    }

    pub fn bind_positional(mut self, position: u32, binding: ParameterBinding) -> Self {
        self.positional.insert(position, binding);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            SqmError::system(SQM0401, "Invalid parameter bindings").with_context(e.to_string())
        })
    }
}

impl ParameterBindings for QueryParameterBindings {
    fn binding_by_name(&self, name: &str) -> Option<&ParameterBinding> {
        self.named.get(name)
    }

    fn binding_by_position(&self, position: u32) -> Option<&ParameterBinding> {
        self.positional.get(&position)
    }
}

/// No bindings at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoParameterBindings;

impl ParameterBindings for NoParameterBindings {
    fn binding_by_name(&self, _name: &str) -> Option<&ParameterBinding> {
        None
    }

    fn binding_by_position(&self, _position: u32) -> Option<&ParameterBinding> {
        None
    }
}
