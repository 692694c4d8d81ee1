//! SQM to SQL translation
//!
//! This crate ties the pipeline together:
//! - a semantic query model ([`ast`]) resolved against mapping metadata ([`model`])
//! - translation into a relational AST and rendering into SQL ([`sql`])
//! - the SQL text, ordered parameter binders and result returns ([`JdbcSelect`])
//!
//! # Example
//!
//! ```ignore
//! use sqmc::{compile, SqmcConfig};
//! use sqmc::model::{MappingRegistry, NoParameterBindings};
//!
//! let metamodel = MappingRegistry::from_json_file("mapping.json")?;
//! let config = SqmcConfig::default();
//! let select = compile(&statement, &metamodel, &NoParameterBindings, &config.dialect, &config)?;
//! println!("{}", select.sql);
//! ```

mod config;

// Re-export all public APIs from internal crates
pub use sqmc_ast as ast;
pub use sqmc_diagnostics as diagnostics;
pub use sqmc_model as model;
pub use sqmc_sql as sql;
pub use sqmc_types as types;

// Convenience re-exports
pub use config::SqmcConfig;
pub use sqmc_ast::Statement;
pub use sqmc_diagnostics::{Result, SqmError};
pub use sqmc_sql::{JdbcSelect, SelectQuery};

use sqmc_model::{Metamodel, ParameterBindings};
use sqmc_sql::{SelectStatementInterpreter, TranslationContext};
use sqmc_types::Dialect;

/// Translate `statement` into the relational AST
pub fn translate(
    statement: &Statement,
    metamodel: &dyn Metamodel,
    bindings: &dyn ParameterBindings,
    config: &SqmcConfig,
) -> Result<SelectQuery> {
    let ctx = TranslationContext::new(metamodel)
        .with_parameter_bindings(bindings)
        .with_query_options(&config.query_options);
    SelectStatementInterpreter::new(ctx).interpret_statement(statement)
}

/// Translate and render `statement` for `dialect`.
///
/// The dialect is passed separately from `config` so callers can plug in
/// their own [`Dialect`]; pass `&config.dialect` for the configured one.
pub fn compile(
    statement: &Statement,
    metamodel: &dyn Metamodel,
    bindings: &dyn ParameterBindings,
    dialect: &dyn Dialect,
    config: &SqmcConfig,
) -> Result<JdbcSelect> {
    let select = translate(statement, metamodel, bindings, config)?;
    sqmc_sql::render(&select, dialect, &config.render)
}

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
