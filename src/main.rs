//! Trial Log Parser CLI
//!
//! Command-line interface for converting simulation logs into CSV tables.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use trial_log_parser::{
    aggregate,
    analytics::{print_summary, CsvSink, OutputName},
    config::ParserConfig,
    utils::expand_inputs,
    Schema,
};

#[derive(Parser)]
#[command(name = "trial-parse")]
#[command(version = "0.1.0")]
#[command(about = "Convert drone simulation logs into CSV tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse logs and write the aggregated table as CSV
    Parse {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output file name inside the output directory
        #[arg(short, long, conflicts_with = "name_from_input")]
        output: Option<String>,

        /// Name the output after the first input's scenario
        #[arg(long)]
        name_from_input: bool,

        /// Output directory for CSV tables
        #[arg(short = 'd', long)]
        output_dir: Option<String>,
    },

    /// Parse logs and print a per-scenario summary without writing a file
    Summary {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Print the available schemas and their columns
    Info,
}

#[derive(Args)]
struct InputArgs {
    /// Log files, a space-joined list, or a single `_1_` batch template
    #[arg(required = true)]
    files: Vec<String>,

    /// Output schema
    #[arg(short, long, value_enum)]
    schema: Option<Schema>,

    /// JSON config file supplying defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl InputArgs {
    fn config(&self) -> Result<ParserConfig> {
        let Some(path) = &self.config else {
            return Ok(self.schema.map(ParserConfig::for_schema).unwrap_or_default());
        };
        let mut config = ParserConfig::load(path)?;
        if let Some(schema) = self.schema {
            config.schema = schema;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; RUST_LOG overrides --verbose
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    match cli.command {
        Commands::Parse {
            inputs,
            output,
            name_from_input,
            output_dir,
        } => {
            let mut config = inputs.config()?;
            if let Some(name) = output {
                config.output_name = OutputName::Explicit(name);
            } else if name_from_input {
                config.output_name = OutputName::FromInput;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            run_parse(&inputs.files, &config)?;
        }

        Commands::Summary { inputs } => {
            let config = inputs.config()?;
            run_summary(&inputs.files, &config)?;
        }

        Commands::Info => {
            print_info();
        }
    }

    Ok(())
}

fn run_parse(files: &[String], config: &ParserConfig) -> Result<()> {
    let paths = expand_inputs(files, config.batch_width)?;

    info!("Configuration:");
    info!("  Schema:      {}", config.schema);
    info!("  Inputs:      {}", paths.len());
    let sink = CsvSink::new(&config.output_dir);
    info!("  Output dir:  {}", sink.output_dir().display());

    let table = aggregate(&paths, config.schema)?;

    let path = sink.save(&table, &config.output_name)?;

    println!();
    println!("📁 {} rows from {} trials saved to: {}", table.len(), table.trials, path.display());
    println!();

    Ok(())
}

fn run_summary(files: &[String], config: &ParserConfig) -> Result<()> {
    let paths = expand_inputs(files, config.batch_width)?;
    let table = aggregate(&paths, config.schema)?;

    print_summary(&table);

    Ok(())
}

fn print_info() {
    println!();
    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║       Trial Log Parser - Info                            ║");
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();
    println!("SCHEMAS:");
    for schema in Schema::ALL {
        let marker = if schema == Schema::default() { " (default)" } else { "" };
        println!("  {}{}", schema, marker);
        println!("    {}", schema.columns().join(", "));
    }
    println!();
    println!("USAGE:");
    println!("  trial-parse parse logs/Rescue_1_20221019.log   # Parse a 4-log batch");
    println!("  trial-parse parse a.log b.log -o combined      # Parse into logs/combined.csv");
    println!("  trial-parse summary logs/Recon.log -s turns    # Print a summary only");
    println!();
}
