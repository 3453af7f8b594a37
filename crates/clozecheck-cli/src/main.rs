//! The user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "clozecheck",
    version,
    about = "Cloze question scoring oracle and answer fuzzer"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one answer set against an item
    Score {
        /// Path to the .toml item file
        #[arg(long)]
        item: PathBuf,

        /// Gap answer as GAP=VALUE; GAP is a 1-based gap number or an export name
        #[arg(long = "answer", value_name = "GAP=VALUE")]
        answers: Vec<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate random answer sets and their expected scores
    Generate {
        /// Path to a .toml item file or directory
        #[arg(long)]
        item: PathBuf,

        /// Answer sets per item
        #[arg(long, default_value = "10")]
        count: usize,

        /// Seed for a reproducible session
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory
        #[arg(long, default_value = "./clozecheck-results")]
        output: PathBuf,

        /// Output format: json, html, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Readjust an item's scoring over several rounds
    Readjust {
        /// Path to the .toml item file
        #[arg(long)]
        item: PathBuf,

        /// Readjustment rounds
        #[arg(long, default_value = "5")]
        rounds: usize,

        /// Seed for a reproducible session
        #[arg(long)]
        seed: Option<u64>,

        /// Write the readjusted item to this file
        #[arg(long)]
        write: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two session reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Exit code 1 if any round differs
        #[arg(long)]
        fail_on_mismatch: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate item TOML files
    Validate {
        /// Path to an item file or directory
        #[arg(long)]
        item: PathBuf,
    },

    /// Create starter config and example item
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("clozecheck=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            item,
            answers,
            config,
        } => commands::score::execute(item, answers, config),
        Commands::Generate {
            item,
            count,
            seed,
            output,
            format,
            config,
        } => commands::generate::execute(item, count, seed, output, format, config),
        Commands::Readjust {
            item,
            rounds,
            seed,
            write,
            config,
        } => commands::readjust::execute(item, rounds, seed, write, config),
        Commands::Compare {
            baseline,
            current,
            fail_on_mismatch,
            format,
        } => commands::compare::execute(baseline, current, fail_on_mismatch, format),
        Commands::Validate { item } => commands::validate::execute(item),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
