mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Cycle-safe, schema-driven object graph serializer.
#[derive(Parser)]
#[command(
    name = "graphtext",
    version,
    about = "Cycle-safe, schema-driven object graph serializer"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log serializer activity to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serialize a resource graph to JSON text
    Serialize {
        /// Path to the model document
        #[arg(long)]
        model: PathBuf,
        /// Path to the graph document
        #[arg(long)]
        graph: PathBuf,
        /// Root resource as namespace.Type#id (default: the document's root)
        #[arg(long)]
        root: Option<String>,
        /// Path to a graphtext.toml with a [serialize] table
        #[arg(long)]
        config: Option<PathBuf>,
        /// Inline materialized resources found under relationship properties
        #[arg(long)]
        permit_resources: bool,
        /// Write materialized resources under relationship properties as references
        #[arg(long)]
        convert_resources: bool,
        /// Reproduce the legacy separator omission in arrays of back-references
        #[arg(long)]
        legacy_separators: bool,
        /// Maximum number of nested inlined objects
        #[arg(long)]
        max_depth: Option<usize>,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// List the types declared in a model document
    Types {
        /// Path to the model document
        #[arg(long)]
        model: PathBuf,
    },

    /// Validate a model or graph document against its JSON Schema
    Validate {
        /// Path to the document
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Serialize {
            model,
            graph,
            root,
            config,
            permit_resources,
            convert_resources,
            legacy_separators,
            max_depth,
            pretty,
        } => {
            commands::serialize::cmd_serialize(commands::serialize::SerializeArgs {
                model: &model,
                graph: &graph,
                root: root.as_deref(),
                config: config.as_deref(),
                overrides: config::OptionOverrides {
                    permit_resources,
                    convert_resources,
                    legacy_separators,
                    max_depth,
                },
                pretty,
                output: cli.output,
                quiet: cli.quiet,
            });
        }
        Commands::Types { model } => {
            commands::types::cmd_types(&model, cli.output, cli.quiet);
        }
        Commands::Validate { file } => {
            commands::validate::cmd_validate(&file, cli.output, cli.quiet);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("error: {}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
