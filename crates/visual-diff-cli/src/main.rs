//! visual-diff CLI - screenshot regression comparator

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use visual_diff::config::{DEFAULT_THRESHOLD, MAX_FILES_SHOWN};

mod commands;

/// Exit status when the comparison found differences or removed files.
const EXIT_FAILED: u8 = 1;

/// Exit status when the run itself could not complete.
const EXIT_ERROR: u8 = 2;

/// Compare two screenshot directories and produce HTML and Markdown reports.
#[derive(Parser)]
#[command(name = "visual-diff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare baseline and candidate screenshots and write reports
    Compare {
        /// Directory with reference screenshots
        baseline: PathBuf,

        /// Directory with screenshots under evaluation
        candidate: PathBuf,

        /// Output directory for index.html, report.md and images/
        #[arg(short, long, env = "VISUAL_DIFF_OUTPUT", default_value = "results")]
        output: PathBuf,

        /// Per-pixel color tolerance (0.0-1.0)
        #[arg(long, env = "VISUAL_DIFF_THRESHOLD", default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,

        /// Maximum entries listed per Markdown section
        #[arg(long, env = "VISUAL_DIFF_MAX_FILES", default_value_t = MAX_FILES_SHOWN)]
        max_files: usize,

        /// Worker threads (defaults to available parallelism)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how files pair up without decoding them
    Scan {
        /// Directory with reference screenshots
        baseline: PathBuf,

        /// Directory with screenshots under evaluation
        candidate: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Commands::Compare { baseline, candidate, output, threshold, max_files, jobs, json } => {
            let args = commands::compare::CompareArgs {
                baseline,
                candidate,
                output,
                threshold,
                max_files,
                jobs,
                json,
            };
            commands::compare::run(args)
        }
        Commands::Scan { baseline, candidate, json } => {
            commands::scan::run(&baseline, &candidate, json).map(|()| true)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_FAILED),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
