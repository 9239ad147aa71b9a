//! open-schemas
//!
//! List, emit and validate the LLM provider schema catalogs.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use open_schemas::{
    catalog::Provider,
    config::Settings,
    emit::{write_catalogs, Target},
    error::SchemaError,
    logging::{init_tracing, LogFormat},
};

/// Typed schema contracts for LLM provider APIs.
#[derive(Parser, Debug)]
#[command(name = "open-schemas")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level or filter directive (overrides OPEN_SCHEMAS_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format (overrides OPEN_SCHEMAS_LOG_FORMAT)
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the definition names of one or all providers
    List {
        #[arg(short, long, value_enum)]
        provider: Option<Provider>,
    },

    /// Write JSON Schema / OpenAPI documents
    Emit {
        /// Providers to emit (default: all)
        #[arg(short, long = "provider", value_enum)]
        providers: Vec<Provider>,

        /// Output formats (overrides OPEN_SCHEMAS_TARGETS)
        #[arg(short, long = "target", value_enum)]
        targets: Vec<Target>,

        /// Output directory (overrides OPEN_SCHEMAS_OUT_DIR)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Write single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Validate a JSON payload against a named definition
    Validate {
        #[arg(short, long, value_enum)]
        provider: Provider,

        /// Definition name, e.g. CreateMessageRequest
        #[arg(short, long)]
        schema: String,

        /// Payload file; reads stdin when absent or `-`
        file: Option<PathBuf>,

        /// Print the payload with defaults filled in instead of `valid`
        #[arg(long)]
        apply_defaults: bool,
    },
}

/// Exit code for a payload that does not conform. Other failures exit with 2.
const EXIT_INVALID: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "open-schemas failed");
            eprintln!("Error: {err:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let mut settings = Settings::load()?;
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(log_format) = args.log_format {
        settings.log_format = log_format;
    }

    init_tracing(&settings.log_level, settings.log_format);
    tracing::debug!(version = %settings.app_version, "Starting open-schemas");

    match args.command {
        Command::List { provider } => {
            list(provider);
            Ok(ExitCode::SUCCESS)
        }
        Command::Emit {
            providers,
            targets,
            out,
            compact,
        } => {
            let providers = if providers.is_empty() {
                Provider::ALL.to_vec()
            } else {
                providers
            };
            let targets = if targets.is_empty() {
                settings.targets.clone()
            } else {
                targets
            };
            let out_dir = out.unwrap_or_else(|| settings.out_dir.clone());
            let written = write_catalogs(&providers, &targets, &out_dir, settings.pretty && !compact)
                .with_context(|| format!("Failed to emit schemas to {}", out_dir.display()))?;
            for path in &written {
                println!("{}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate {
            provider,
            schema,
            file,
            apply_defaults,
        } => validate(provider, &schema, file, apply_defaults),
    }
}

fn list(provider: Option<Provider>) {
    match provider {
        Some(provider) => {
            for name in provider.catalog().names() {
                println!("{name}");
            }
        }
        None => {
            for provider in Provider::ALL {
                for name in provider.catalog().names() {
                    println!("{provider}.{name}");
                }
            }
        }
    }
}

fn read_payload(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

fn validate(
    provider: Provider,
    schema: &str,
    file: Option<PathBuf>,
    apply_defaults: bool,
) -> Result<ExitCode> {
    let catalog = provider.catalog();
    let payload: serde_json::Value =
        serde_json::from_str(&read_payload(file)?).context("Payload is not valid JSON")?;

    match catalog.validate(schema, &payload) {
        Ok(()) => {
            if apply_defaults {
                let filled = catalog.apply_defaults(schema, payload)?;
                println!("{}", serde_json::to_string_pretty(&filled)?);
            } else {
                println!("valid");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(SchemaError::Invalid(report)) => {
            tracing::info!(
                provider = %provider,
                schema,
                violations = report.len(),
                "Payload does not conform"
            );
            for violation in report.iter() {
                println!("{violation}");
            }
            Ok(ExitCode::from(EXIT_INVALID))
        }
        Err(err) => Err(err.into()),
    }
}
