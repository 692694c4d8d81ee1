//! sqmc command-line interface

use clap::{Args, Parser, Subcommand};
use sqmc::cli::output::{self, OutputFormat};
use sqmc::cli::{translate, validate};
use std::path::PathBuf;

/// SQM to SQL translation tool
#[derive(Parser)]
#[command(name = "sqmc")]
#[command(author, version, about = "Translate semantic query models into SQL", long_about = None)]
struct Cli {
    /// Verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Mapping document (JSON)
    #[arg(short, long)]
    model: PathBuf,

    /// Statement to translate (JSON)
    #[arg(short, long)]
    query: PathBuf,

    /// Parameter bindings (JSON)
    #[arg(short, long)]
    bindings: Option<PathBuf>,

    /// Configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl From<InputArgs> for translate::InputFiles {
    fn from(args: InputArgs) -> Self {
        Self {
            model: args.model,
            query: args.query,
            bindings: args.bindings,
            config: args.config,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a statement to SQL with its binders and returns
    Translate {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the relational AST of a statement
    Ast {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Validate mapping documents
    Validate {
        /// Mapping documents to validate (repeatable)
        #[arg(short, long, required = true)]
        model: Vec<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    output::setup_colors(&cli.color);
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Translate { inputs, format } => translate::translate(translate::TranslateConfig {
            inputs: inputs.into(),
            format,
            output_file: cli.output,
        }),
        Commands::Ast { inputs } => translate::ast(translate::AstConfig {
            inputs: inputs.into(),
            output_file: cli.output,
        }),
        Commands::Validate { model } => {
            validate::validate(validate::ValidateConfig { files: model })
        }
    };

    if let Err(e) = result {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_takes_model_flags() {
        let cli = Cli::try_parse_from([
            "sqmc",
            "validate",
            "--model",
            "a.json",
            "-m",
            "b.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Validate { model } => {
                assert_eq!(model, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
            }
            _ => panic!("expected validate command"),
        }
    }

    #[test]
    fn test_validate_requires_a_model() {
        assert!(Cli::try_parse_from(["sqmc", "validate"]).is_err());
        assert!(Cli::try_parse_from(["sqmc", "validate", "mapping.json"]).is_err());
    }
}
