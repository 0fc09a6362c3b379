//! logmerge - merge pubsub log files into one ordered, deduplicated log

use anyhow::Result;
use clap::{CommandFactory, Parser};
use logmerge_core::{StoreConfig, ZoneSetting};
use std::path::PathBuf;

mod commands;
mod output;
mod session;

use commands::merge::{self, MergeOptions};

const NOTES: &str = "\
The consolidated log will be saved on the first file.
If the first file is not blank, it will be read before being overwritten.
Note: all unformatted records will be saved at the top of the consolidated log file.";

#[derive(Parser)]
#[command(name = "logmerge")]
#[command(author, version, about, long_about = None)]
#[command(after_help = NOTES)]
struct Cli {
    /// Pubsub log files to merge
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Write the consolidated log here instead of over the first file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Time zone for merged records: `local` or an abbreviation such as UTC
    #[arg(short, long, default_value = "local")]
    zone: ZoneSetting,

    /// Records buffered between the replay worker and the writer
    #[arg(long, default_value_t = 10)]
    stream_capacity: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.files.is_empty() {
        println!("Please include at least one pubsub log file.");
        Cli::command().print_help()?;
        return Ok(());
    }

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let mut options = MergeOptions::new(cli.files);
    options.output = cli.output;
    options.zone = cli.zone;
    options.store = StoreConfig::default().with_stream_capacity(cli.stream_capacity);

    let summary = merge::execute(options)?;
    tracing::info!(
        "Merged {} lines into {} records ({} duplicates, {} unformatted lines)",
        summary.lines_read,
        summary.records_written,
        summary.duplicates,
        summary.unformatted
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from([
            "logmerge",
            "-z",
            "utc",
            "--stream-capacity",
            "4",
            "a.log",
            "b.log",
        ])
        .unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("a.log"), PathBuf::from("b.log")]);
        assert_eq!(cli.zone, ZoneSetting::Named("UTC".into()));
        assert_eq!(cli.stream_capacity, 4);
        assert!(cli.output.is_none());

        assert!(Cli::try_parse_from(["logmerge", "-z", "atlantis", "a.log"]).is_err());
    }
}
