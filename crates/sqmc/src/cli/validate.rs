//! Validate command implementation

use super::output;
use anyhow::Result;
use colored::Colorize;
use sqmc_model::MappingRegistry;
use std::path::{Path, PathBuf};

/// Configuration for validate command
pub struct ValidateConfig {
    pub files: Vec<PathBuf>,
}

/// Validation outcome of one mapping file
pub struct ValidationReport {
    pub file: PathBuf,
    pub problems: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Load and cross-check one mapping document
pub fn validate_file(file: &Path) -> ValidationReport {
    log::debug!("validating {}", file.display());
    let problems = match MappingRegistry::from_json_file(file) {
        Ok(registry) => registry
            .validate()
            .iter()
            .map(|problem| problem.to_diagnostic().to_colored_string())
            .collect(),
        Err(e) => vec![e.to_diagnostic().to_colored_string()],
    };
    ValidationReport {
        file: file.to_path_buf(),
        problems,
    }
}

/// Validate mapping files, failing when any file has problems
pub fn validate(config: ValidateConfig) -> Result<()> {
    if config.files.is_empty() {
        anyhow::bail!("No mapping files specified for validation");
    }

    let reports: Vec<_> = config
        .files
        .iter()
        .map(|file| validate_file(file))
        .collect();
    for report in &reports {
        print_report(report);
    }

    println!();
    let total: usize = reports.iter().map(|report| report.problems.len()).sum();
    if total == 0 {
        println!(
            "{}",
            output::format_success(&format!(
                "All {} mapping file(s) are valid",
                reports.len()
            ))
        );
        Ok(())
    } else {
        anyhow::bail!("Found {} mapping problem(s)", total)
    }
}

fn print_report(report: &ValidationReport) {
    let status = if report.is_valid() {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("{} {}", status, report.file.display().to_string().cyan());
    for problem in &report.problems {
        println!("  {}", problem);
    }
}
