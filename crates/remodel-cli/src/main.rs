//! Remodel Command-Line Tool
//!
//! Loads, checks, inspects, re-formats and version-bumps schema documents.

mod commands;
mod formatter;

use clap::{Parser, Subcommand};
use formatter::OutputFormat;
use remodel_core::SchemaConfig;
use std::path::PathBuf;

/// Remodel Command-Line Tool
#[derive(Parser, Debug)]
#[command(name = "remodel")]
#[command(version, about = "Inspect and maintain Remodel schema documents")]
pub struct Args {
    /// Version given to the first model of a new schema
    #[arg(long, global = true)]
    pub initial_version: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a document and report what it contains
    Check {
        /// Schema document
        file: PathBuf,
    },
    /// List entities, attributes and relationships
    Show {
        /// Schema document
        file: PathBuf,

        /// Output format
        #[arg(long, default_value = "table", value_enum)]
        format: OutputFormat,
    },
    /// Rewrite a document in canonical form
    Fmt {
        /// Schema document
        file: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Append a copy of the current model with the next version
    Bump {
        /// Schema document
        file: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl From<&Args> for SchemaConfig {
    fn from(args: &Args) -> Self {
        let config = SchemaConfig::default();
        match &args.initial_version {
            Some(version) => config.initial_model_version(version.clone()),
            None => config,
        }
    }
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("remodel=info")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = SchemaConfig::from(args);

    let output = match &args.command {
        Command::Check { file } => commands::check(file, config)?,
        Command::Show { file, format } => {
            let formatter = formatter::create_formatter(*format);
            commands::show(file, config, &*formatter)?
        }
        Command::Fmt { file, output } => commands::fmt(file, output.as_deref(), config)?,
        Command::Bump { file, output } => commands::bump(file, output.as_deref(), config)?,
    };

    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
