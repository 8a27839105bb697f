use clap::{Parser, Subcommand};
use numeral_coder::analysis::analyzer::ErrorAnalyzer;
use numeral_coder::analysis::table::Table;
use numeral_coder::config::{load_config_from_file, Config};
use numeral_coder::output_io::save_results;
use numeral_coder::scoring::{PairCheck, WordResult};
use numeral_coder::{Cell, ErrorCounts, NumeralCoder};
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "numeral-coder", about = "Code errors in verbal recall of multi-digit numbers")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Code every row of one or more CSV tables
    MarkErrors {
        /// Directory for the output tables; nothing is saved without it
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// File name prefix of the output tables
        #[arg(long, default_value = "data_coded")]
        prefix: String,

        /// Input CSV files, one per subject or worksheet
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Score a single target/response pair and print the result as JSON
    Score { target: String, response: String },
}

#[derive(Serialize)]
struct ScoreReport {
    counts: ErrorCounts,
    p_missing_words: f64,
    p_missing_digits: Option<f64>,
    p_missing_classes: f64,
    p_missing_morphemes: f64,
    words: Vec<WordResult>,
    pairs: Vec<PairCheck>,
    warnings: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => load_config_from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::MarkErrors {
            out_dir,
            prefix,
            inputs,
        } => {
            let analyzer = ErrorAnalyzer::new(config)?;
            let tables = inputs
                .iter()
                .map(|path| Table::from_csv_path(path))
                .collect::<Result<Vec<_>, _>>()?;

            let result = analyzer.run(&tables)?;

            match out_dir {
                Some(dir) => {
                    let paths = save_results(&result, &dir, &prefix)?;
                    info!("results saved to {}", paths.coded.display());
                }
                None => warn!("results were not saved (no --out-dir given)"),
            }
            Ok(())
        }
        Command::Score { target, response } => {
            let coder = NumeralCoder::from_config(&config.coder)?;
            let trial = coder.code_trial(&Cell::from_field(&target), &Cell::from_field(&response))?;
            let report = ScoreReport {
                counts: trial.counts,
                p_missing_words: trial.counts.p_missing_words(),
                p_missing_digits: trial.counts.p_missing_digits(),
                p_missing_classes: trial.counts.p_missing_classes(),
                p_missing_morphemes: trial.counts.p_missing_morphemes(),
                words: trial.word_results(),
                pairs: trial.adjacent_pairs(),
                warnings: trial.warnings.iter().map(|w| w.to_string()).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}
