use anyhow::Result;
use clap::Parser;
use clap_complete::generate;
use linestat_cli::{build_cli_command, Cli, Commands};
use std::fs;
use std::io;
use std::path::Path;
use tracing_subscriber::FmtSubscriber;

mod commands;

fn generate_completions(shell: clap_complete::Shell, out: Option<&Path>) -> Result<()> {
    let mut cmd = build_cli_command();
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut file = fs::File::create(path)?;
            generate(shell, &mut cmd, "linestat", &mut file);
        }
        None => generate(shell, &mut cmd, "linestat", &mut io::stdout()),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match &cli.command {
        Commands::Classify {
            working,
            not_working,
            k,
            query,
            line_weight,
            node_weight,
            other_weight,
            format,
        } => commands::classify::handle(&commands::classify::ClassifyArgs {
            working: *working,
            not_working: *not_working,
            k: *k,
            query: *query,
            line_weight: *line_weight,
            node_weight: *node_weight,
            other_weight: *other_weight,
            format: *format,
        }),
        Commands::Estimate {
            rms,
            angle,
            frequency,
            sample_rate,
            duration,
            format,
        } => commands::estimate::handle(&commands::estimate::EstimateArgs {
            rms: *rms,
            angle: *angle,
            frequency: *frequency,
            sample_rate: *sample_rate,
            duration: *duration,
            format: *format,
        }),
        Commands::Completions { shell, out } => generate_completions(*shell, out.as_deref()),
    }
}
