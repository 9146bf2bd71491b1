//! quantaflow CLI: build, validate, and explain pipeline plans.

use clap::{Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use quantaflow_builder::{parse_yaml_pipeline, DataQuantaBuilder};
use quantaflow_core::config::ClientConfig;
use quantaflow_core::operator::OperatorConfig;
use quantaflow_message::{EncodedUdf, PlanMessage, SymbolicUdfEncoder};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "qf")]
#[command(about = "quantaflow: build engine-ready plan messages from pipeline descriptions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a pipeline and emit the wire message as JSON
    Build {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,

        /// Write the message here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a pipeline YAML file (parse, build, serialize)
    Validate {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },

    /// Show the operator chain for a pipeline
    Explain {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quantaflow=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            pipeline,
            output,
            pretty,
        } => {
            if let Err(e) = build(&pipeline, output.as_deref(), pretty) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Validate { pipeline } => {
            if let Err(e) = validate(&pipeline) {
                eprintln!("Validation failed: {}", e);
                std::process::exit(1);
            }
            println!("✓ Pipeline is valid");
        }
        Commands::Explain { pipeline } => {
            if let Err(e) = explain(&pipeline) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn build_message(pipeline_path: &Path) -> Result<PlanMessage, Box<dyn std::error::Error>> {
    let yaml = fs::read_to_string(pipeline_path)?;
    let builder = DataQuantaBuilder::new();
    let sink = parse_yaml_pipeline(&yaml, &builder)?;

    let config = ClientConfig::from_env();
    let encoder = SymbolicUdfEncoder::from_config(&config);
    let message = sink.to_message(&encoder)?;
    Ok(message)
}

fn build(
    pipeline_path: &Path,
    output: Option<&Path>,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let message = build_message(pipeline_path)?;
    info!(
        hash = %message.plan_hash()?,
        operators = message.operators.len(),
        "plan built"
    );

    let encoded = if pretty {
        message.to_pretty_string()?.into_bytes()
    } else {
        message.to_bytes()?
    };

    match output {
        Some(path) => fs::write(path, encoded)?,
        None => {
            let mut out = std::io::stdout();
            out.write_all(&encoded)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn validate(pipeline_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let message = build_message(pipeline_path)?;
    // Round-trip the bytes so a schema regression fails loudly here rather
    // than on the engine side.
    let bytes = message.to_bytes()?;
    PlanMessage::from_bytes(&bytes)?;
    Ok(())
}

fn explain(pipeline_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let message = build_message(pipeline_path)?;
    println!(
        "plan v{}: {} operator(s), {} source(s), {} sink(s), hash {}",
        message.version,
        message.operators.len(),
        message.sources.len(),
        message.sinks.len(),
        message.plan_hash()?
    );
    for record in &message.operators {
        let detail = match &record.config {
            OperatorConfig::Source { path } => format!("path={path}"),
            OperatorConfig::Sink {
                path,
                line_terminator,
            } => format!("path={path} line_terminator={line_terminator:?}"),
            OperatorConfig::Transform => match &record.udf {
                Some(EncodedUdf::Symbolic { name }) => format!("udf={name}"),
                Some(EncodedUdf::Bytecode { payload }) => {
                    format!("udf=<{} bytes of bytecode>", payload.len())
                }
                None => "udf=<none>".to_string(),
            },
        };
        println!("  [{:>3}] {:<6} {}", record.id.get(), record.kind.as_str(), detail);
    }
    Ok(())
}
