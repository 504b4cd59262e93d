//! `linestat estimate`: check the waveform phasor estimator on a clean sinusoid.

use std::io;

use anyhow::{bail, Result};
use linestat_cli::OutputFormat;
use linestat_core::{estimate_phasor, sample_sinusoid, Degrees, Hertz, Phasor, Seconds};
use serde::Serialize;
use tracing::{info, warn};

/// Largest waveform the command will synthesize.
const MAX_SAMPLES: f64 = 10_000_000.0;

pub struct EstimateArgs {
    pub rms: f64,
    pub angle: f64,
    pub frequency: f64,
    pub sample_rate: f64,
    pub duration: f64,
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct EstimateReport {
    samples: usize,
    expected: Phasor,
    estimated: Phasor,
    rms_error_pct: f64,
    angle_error_deg: f64,
}

pub fn handle(args: &EstimateArgs) -> Result<()> {
    if !(args.frequency > 0.0 && args.sample_rate > 0.0 && args.duration > 0.0) {
        bail!("frequency, sample rate and duration must be positive");
    }
    let requested = (args.sample_rate * args.duration).floor();
    if requested > MAX_SAMPLES {
        bail!(
            "{requested} samples requested, at most {MAX_SAMPLES} are supported; \
             lower --sample-rate or --duration"
        );
    }
    if args.sample_rate < 2.0 * args.frequency {
        warn!(
            sample_rate = args.sample_rate,
            frequency = args.frequency,
            "sampling below the Nyquist rate; the estimate is meaningless"
        );
    }

    let expected = Phasor::new(args.rms, Degrees(args.angle));
    let samples = sample_sinusoid(
        expected,
        Hertz(args.frequency),
        Hertz(args.sample_rate),
        Seconds(args.duration),
    );
    info!(samples = samples.len(), "estimating {expected}");
    let estimated = estimate_phasor(&samples)?;

    let rms_error_pct = if expected.rms() == 0.0 {
        0.0
    } else {
        (estimated.rms() - expected.rms()).abs() / expected.rms() * 100.0
    };
    let angle_error_deg = (estimated.angle() - expected.angle()).wrapped().0.abs();

    let report = EstimateReport {
        samples: samples.len(),
        expected,
        estimated,
        rms_error_pct,
        angle_error_deg,
    };
    match args.format {
        OutputFormat::Plain => {
            println!("Samples:   {}", report.samples);
            println!("Expected:  {:.4}", report.expected);
            println!("Estimated: {:.4}", report.estimated);
            println!("RMS error: {:.4}%", report.rms_error_pct);
            println!("Angle error: {:.4} deg", report.angle_error_deg);
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(io::stdout(), &report)
                .map_err(|err| anyhow::anyhow!("serializing estimate to JSON: {err}"))?;
            println!();
        }
    }
    Ok(())
}
