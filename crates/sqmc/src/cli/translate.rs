//! Translate and ast command implementations

use super::output::{self, OutputFormat};
use crate::SqmcConfig;
use anyhow::{Context, Result};
use sqmc_ast::Statement;
use sqmc_model::{MappingRegistry, QueryParameterBindings};
use std::fs;
use std::path::{Path, PathBuf};

/// Input files shared by the translate and ast commands
#[derive(Debug, Clone)]
pub struct InputFiles {
    pub model: PathBuf,
    pub query: PathBuf,
    pub bindings: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Configuration for translate command
pub struct TranslateConfig {
    pub inputs: InputFiles,
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

/// Configuration for ast command
pub struct AstConfig {
    pub inputs: InputFiles,
    pub output_file: Option<PathBuf>,
}

/// Everything loaded from the input files
pub struct Inputs {
    pub metamodel: MappingRegistry,
    pub statement: Statement,
    pub bindings: QueryParameterBindings,
    pub config: SqmcConfig,
}

impl InputFiles {
    pub fn load(&self) -> Result<Inputs> {
        let metamodel = MappingRegistry::from_json_file(&self.model)?;
        let statement = load_statement(&self.query)?;

        let bindings = match &self.bindings {
            Some(path) => {
                let json = fs::read_to_string(path).with_context(|| {
                    format!("Failed to read bindings file: {}", path.display())
                })?;
                QueryParameterBindings::from_json(&json)?
            }
            None => QueryParameterBindings::new(),
        };

        let config = match &self.config {
            Some(path) => SqmcConfig::from_file(path)?,
            None => SqmcConfig::default(),
        };

        Ok(Inputs {
            metamodel,
            statement,
            bindings,
            config,
        })
    }
}

fn load_statement(path: &Path) -> Result<Statement> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read query file: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse query file: {}", path.display()))
}

/// Compile a statement to SQL
pub fn translate(config: TranslateConfig) -> Result<()> {
    let inputs = config.inputs.load()?;
    let select = crate::compile(
        &inputs.statement,
        &inputs.metamodel,
        &inputs.bindings,
        &inputs.config.dialect,
        &inputs.config,
    )?;

    let content = match config.format {
        OutputFormat::Text => output::format_select(&select),
        OutputFormat::Json => output::format_json(&select, true)?,
    };
    output::write_output(&content, config.output_file.as_deref())
}

/// Print the relational AST of a statement as JSON
pub fn ast(config: AstConfig) -> Result<()> {
    let inputs = config.inputs.load()?;
    let select = crate::translate(
        &inputs.statement,
        &inputs.metamodel,
        &inputs.bindings,
        &inputs.config,
    )?;
    let content = output::format_json(&select, true)?;
    output::write_output(&content, config.output_file.as_deref())
}
