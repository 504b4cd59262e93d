use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a synthetic line sample against a synthetic labeled set
    Classify {
        /// Number of labeled samples in the working cluster
        #[arg(long, default_value_t = 6)]
        working: usize,
        /// Number of labeled samples in the not-working cluster
        #[arg(long, default_value_t = 4)]
        not_working: usize,
        /// Number of voting neighbors
        #[arg(short, long, default_value_t = 5)]
        k: usize,
        /// Which cluster average to use as the query
        #[arg(long, value_enum, default_value_t = QueryStatus::Working)]
        query: QueryStatus,
        /// Weight of the two line currents
        #[arg(long, default_value_t = 20.0)]
        line_weight: f64,
        /// Weight of the two node voltages
        #[arg(long, default_value_t = 4.0)]
        node_weight: f64,
        /// Weight of the other currents at each node
        #[arg(long, default_value_t = 1.0)]
        other_weight: f64,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },
    /// Sample a sinusoid and estimate its phasor back from the samples
    Estimate {
        /// RMS magnitude of the sampled signal
        #[arg(long)]
        rms: f64,
        /// Phase angle in degrees
        #[arg(long, allow_hyphen_values = true)]
        angle: f64,
        /// Signal frequency in Hz
        #[arg(long, default_value_t = 60.0)]
        frequency: f64,
        /// Sampling rate in Hz
        #[arg(long, default_value_t = 32_000.0)]
        sample_rate: f64,
        /// Sampling window in seconds
        #[arg(long, default_value_t = 1.0)]
        duration: f64,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum QueryStatus {
    Working,
    NotWorking,
}

impl QueryStatus {
    pub fn is_working(self) -> bool {
        self == QueryStatus::Working
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        build_cli_command().debug_assert();
    }

    #[test]
    fn parses_classify_defaults() {
        let cli = Cli::try_parse_from(["linestat", "classify"]).unwrap();
        match cli.command {
            Commands::Classify {
                working,
                not_working,
                k,
                query,
                format,
                ..
            } => {
                assert_eq!((working, not_working, k), (6, 4, 5));
                assert_eq!(query, QueryStatus::Working);
                assert_eq!(format, OutputFormat::Plain);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_negative_angle() {
        let cli =
            Cli::try_parse_from(["linestat", "estimate", "--rms", "10", "--angle", "-120"]).unwrap();
        assert!(matches!(cli.command, Commands::Estimate { angle, .. } if angle == -120.0));
    }
}
