//! Output formatting utilities

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use sqmc_diagnostics::SqmError;
use sqmc_sql::{DynamicInstantiationTarget, JdbcSelect, ParameterBinder, ReaderKind};
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// SQL followed by binder and return listings
    #[default]
    Text,
    Json,
}

/// Set up color output based on user preference
pub fn setup_colors(mode: &str) {
    match mode.to_lowercase().as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::set_override(io::stdout().is_terminal()),
    }
}

/// Format an error for display, as a coded diagnostic when it is one
pub fn format_error(error: &anyhow::Error) -> String {
    match error.downcast_ref::<SqmError>() {
        Some(sqm) => sqm.to_diagnostic().to_colored_string(),
        None => format!("{} {:#}", "Error:".red().bold(), error),
    }
}

/// Format a success message for display
pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

/// Write output to a file or stdout
pub fn write_output(content: &str, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write to output file: {}", path.display()))?;
        eprintln!(
            "{}",
            format_success(&format!("Output written to {}", path.display()))
        );
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Serialize any value as JSON
pub fn format_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).context("Failed to serialize JSON")
    } else {
        serde_json::to_string(value).context("Failed to serialize JSON")
    }
}

/// Human readable rendering of a compiled select
pub fn format_select(select: &JdbcSelect) -> String {
    let mut out = String::new();
    out.push_str(&select.sql);
    out.push('\n');

    out.push_str(&format!("\n{}\n", "binders:".bold()));
    if select.parameter_binders.is_empty() {
        out.push_str("  (none)\n");
    }
    for (i, binder) in select.parameter_binders.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, describe_binder(binder)));
    }

    out.push_str(&format!("\n{}\n", "returns:".bold()));
    for (i, select_return) in select.returns.iter().enumerate() {
        let reader = &select_return.reader;
        let mut line = format!(
            "  {}. columns {}..{} {}",
            i + 1,
            reader.start_position,
            reader.end_position() - 1,
            describe_reader(&reader.kind)
        );
        if let Some(variable) = &select_return.result_variable {
            line.push_str(&format!(" as {}", variable.cyan()));
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn describe_binder(binder: &ParameterBinder) -> String {
    match binder {
        ParameterBinder::Named { name, bind_type } => format!(":{} ({})", name, bind_type),
        ParameterBinder::Positional {
            position,
            bind_type,
        } => format!("?{} ({})", position, bind_type),
        ParameterBinder::Literal {
            value,
            literal_type,
        } => match literal_type {
            Some(literal_type) => format!("literal {} ({})", value, literal_type),
            None => format!("literal {}", value),
        },
    }
}

fn describe_reader(kind: &ReaderKind) -> String {
    match kind {
        ReaderKind::Basic(basic) => basic.to_string(),
        ReaderKind::Composite(composite) => composite.name.clone(),
        ReaderKind::Entity { entity_name } => format!("entity {}", entity_name),
        ReaderKind::DynamicInstantiation { target, arguments } => {
            let target = match target {
                DynamicInstantiationTarget::List => "list",
                DynamicInstantiationTarget::Map => "map",
                DynamicInstantiationTarget::Class(class_name) => class_name.as_str(),
            };
            let arguments: Vec<_> = arguments
                .iter()
                .map(|argument| describe_reader(&argument.kind))
                .collect();
            format!("new {}({})", target, arguments.join(", "))
        }
        ReaderKind::Unknown => "unknown".to_string(),
    }
}
