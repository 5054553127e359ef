//! tagnet CLI - keyword tagging and tag co-occurrence graphs.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tagnet")]
#[command(author, version, about = "tagnet - Tag co-occurrence graphs from listings and posts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default tagnet.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,

        /// Also write the built-in dictionary as dictionary.json
        #[arg(long)]
        with_dictionary: bool,
    },

    /// Tag a single text
    Tag {
        /// Text to tag
        text: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Corpus statistics
    Stats {
        /// JSON file or directory of raw records (default: built-in sample)
        input: Option<String>,

        /// Category for the weight ranking
        #[arg(short, long, default_value = "color")]
        category: String,

        /// Number of entries per ranking
        #[arg(short, long, default_value = "5")]
        top: usize,
    },

    /// Build and lay out the tag graph for one or more targets
    Analyze {
        /// JSON file or directory of raw records (default: built-in sample)
        input: Option<String>,

        /// Target filter: a marker name, `all`, `platform:<name>`,
        /// `source:<listing|post>` or `text:<kw>|<kw>` (repeatable)
        #[arg(short, long = "target", required = true)]
        targets: Vec<String>,
    },

    /// Co-occurrence matrix between two categories
    Matrix {
        /// JSON file or directory of raw records (default: built-in sample)
        input: Option<String>,

        /// Target filter (see `analyze`)
        #[arg(short, long, default_value = "all")]
        target: String,

        /// Row category (default from config)
        #[arg(long)]
        rows: Option<String>,

        /// Column category (default from config)
        #[arg(long)]
        cols: Option<String>,

        /// Tags per axis (default: graph top_k)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Export a target's graph as JSON
    Export {
        /// JSON file or directory of raw records (default: built-in sample)
        input: Option<String>,

        /// Target filter (see `analyze`)
        #[arg(short, long)]
        target: String,

        /// Output file path
        #[arg(short, long)]
        output: String,

        /// Export format: `edges` (edge list with stats) or `scene`
        #[arg(short, long, default_value = "edges")]
        format: String,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path, with_dictionary } => commands::init::run(path, with_dictionary),
        Commands::Tag { text, json } => commands::tag::run(&text, json),
        Commands::Stats { input, category, top } => {
            commands::stats::run(input.as_deref(), &category, top)
        }
        Commands::Analyze { input, targets } => {
            commands::analyze::run(input.as_deref(), &targets, cli.verbose)
        }
        Commands::Matrix {
            input,
            target,
            rows,
            cols,
            top_k,
        } => commands::matrix::run(input.as_deref(), &target, rows, cols, top_k),
        Commands::Export {
            input,
            target,
            output,
            format,
        } => commands::export::run(input.as_deref(), &target, &output, &format),
    }
}
