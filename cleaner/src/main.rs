use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use prep_core::mapper::InvalidPolicy;
use prep_core::pipeline::{clean_games, clean_movies, CleanOptions, CleanReport};
use prep_core::DEFAULT_CAPACITY;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "cleaner")]
#[command(about = "Normalize raw movie and game records into {id, name, summary, tags}", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a movie dump; summaries are built from each movie's keywords
    Movies {
        #[command(flatten)]
        io: IoArgs,
        /// Maximum number of unique words per summary
        #[arg(long, default_value_t = DEFAULT_CAPACITY)]
        capacity: usize,
        /// Log this many of the longest summary word counts
        #[arg(long, default_value_t = 10)]
        stats_top: usize,
    },
    /// Clean a games dump; summaries are copied as is
    Games {
        #[command(flatten)]
        io: IoArgs,
    },
}

#[derive(Args)]
struct IoArgs {
    /// Input JSON or JSONL file
    #[arg(long)]
    input: PathBuf,
    /// Output JSON file
    #[arg(long)]
    output: PathBuf,
    /// Only process the first N records
    #[arg(long)]
    limit: Option<usize>,
    /// What to do with a record that cannot be mapped
    #[arg(long, value_enum, default_value_t = OnInvalid::Abort)]
    on_invalid: OnInvalid,
}

#[derive(Copy, Clone, Eq, PartialEq, ValueEnum, Debug)]
enum OnInvalid {
    Abort,
    Skip,
}

impl From<OnInvalid> for InvalidPolicy {
    fn from(v: OnInvalid) -> Self {
        match v {
            OnInvalid::Abort => InvalidPolicy::Abort,
            OnInvalid::Skip => InvalidPolicy::Skip,
        }
    }
}

impl IoArgs {
    fn options(&self, capacity: usize) -> CleanOptions {
        CleanOptions { capacity, limit: self.limit, policy: self.on_invalid.into() }
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(log_filter(std::env::var("RUST_LOG").ok())).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Movies { io, capacity, stats_top } => {
            let report = clean_movies(&io.input, &io.output, &io.options(capacity))
                .with_context(|| format!("cleaning movies from {}", io.input.display()))?;
            log_report(&io, &report);
            tracing::info!(longest = ?report.stats.largest(stats_top), "summary lengths");
        }
        Commands::Games { io } => {
            let report = clean_games(&io.input, &io.output, &io.options(DEFAULT_CAPACITY))
                .with_context(|| format!("cleaning games from {}", io.input.display()))?;
            log_report(&io, &report);
        }
    }
    Ok(())
}

/// `RUST_LOG` directives, or `info` so run totals and summary lengths always show.
fn log_filter(directives: Option<String>) -> EnvFilter {
    match directives.filter(|d| !d.trim().is_empty()) {
        Some(d) => EnvFilter::new(d),
        None => EnvFilter::new("info"),
    }
}

fn log_report(io: &IoArgs, report: &CleanReport) {
    tracing::info!(
        output = %io.output.display(),
        written = report.written,
        skipped = report.skipped,
        "clean complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).to_string(), "info");
        assert_eq!(log_filter(Some("  ".into())).to_string(), "info");
        assert_eq!(log_filter(Some("debug".into())).to_string(), "debug");
    }
}
