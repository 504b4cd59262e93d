//! Raw waveform samples and phasor estimation.
//!
//! A metering point reports a voltage or current as a series of
//! [`InstantaneousMeasurement`]s. [`estimate_phasor`] reduces one cycle (or a whole
//! number of cycles) of such a series to a [`Phasor`]:
//!
//! - **Magnitude:** RMS of every sample, `sqrt(Σ v² / n)`.
//! - **Angle:** read off the first two samples only. With peak `P = RMS·√2`, the first
//!   sample `v₀` sits at `asin(v₀ / P)` on a rising edge, or in the second/third quadrant
//!   (`±180° - asin(v₀ / P)`) on a falling edge. `|v₀| ≥ P` clamps to ±90°.
//!
//! The angle estimate assumes a clean single-frequency sinusoid sampled finely relative
//! to its period, starting at `t ≈ 0`. Harmonics, noise or DC offset on the first two
//! samples bias it directly; it is not a DFT estimator.

use crate::error::PhasorError;
use crate::phasor::Phasor;
use crate::units::{Degrees, Hertz, Seconds};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, SQRT_2};

/// One reading of a signal at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstantaneousMeasurement {
    /// Time of the reading
    pub time: Seconds,
    /// Signed instantaneous value in base units (V or A)
    pub value: f64,
}

impl InstantaneousMeasurement {
    pub fn new(time: Seconds, value: f64) -> Self {
        Self { time, value }
    }
}

/// Root-mean-square of the sample values, 0 for an empty slice.
pub fn rms(samples: &[InstantaneousMeasurement]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|s| s.value * s.value).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

/// Estimate the phasor traced by a sampled sinusoid.
///
/// Fails with [`PhasorError::InsufficientSamples`] for fewer than two samples. An
/// all-zero waveform yields [`Phasor::ZERO`].
pub fn estimate_phasor(samples: &[InstantaneousMeasurement]) -> Result<Phasor, PhasorError> {
    if samples.len() < 2 {
        return Err(PhasorError::InsufficientSamples {
            count: samples.len(),
        });
    }

    let rms = rms(samples);
    if rms == 0.0 {
        return Ok(Phasor::ZERO);
    }
    Ok(Phasor::new(
        rms,
        first_sample_angle(samples[0].value, samples[1].value, rms),
    ))
}

fn first_sample_angle(first: f64, second: f64, rms: f64) -> Degrees {
    let peak = rms * SQRT_2;

    // Rounding can push the crest sample past the computed peak
    if first >= peak {
        return Degrees(90.0);
    }
    if first <= -peak {
        return Degrees(-90.0);
    }

    let rising_angle = (first / peak).asin().to_degrees();
    if second >= first {
        Degrees(rising_angle)
    } else if first >= 0.0 {
        Degrees(180.0 - rising_angle)
    } else {
        Degrees(-180.0 - rising_angle)
    }
}

/// Sample `√2·rms·sin(2πft + θ)` at `sample_rate` for `duration`.
///
/// Produces `floor(sample_rate · duration)` readings starting at `t = 0`.
pub fn sample_sinusoid(
    phasor: Phasor,
    frequency: Hertz,
    sample_rate: Hertz,
    duration: Seconds,
) -> Vec<InstantaneousMeasurement> {
    let count = (sample_rate.0 * duration.0).max(0.0) as usize;
    let amplitude = SQRT_2 * phasor.rms();
    let theta = phasor.angle().to_radians().0;

    (0..count)
        .map(|i| {
            let t = i as f64 / sample_rate.0;
            let wt = 2.0 * PI * frequency.0 * t;
            InstantaneousMeasurement::new(Seconds(t), amplitude * (wt + theta).sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(values: &[f64]) -> Vec<InstantaneousMeasurement> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| InstantaneousMeasurement::new(Seconds(i as f64), v))
            .collect()
    }

    fn percent_error(reference: Phasor, estimate: Phasor) -> f64 {
        100.0 * (reference - estimate).rms() / reference.rms()
    }

    #[test]
    fn test_insufficient_samples() {
        assert_eq!(
            estimate_phasor(&[]),
            Err(PhasorError::InsufficientSamples { count: 0 })
        );
        assert_eq!(
            estimate_phasor(&samples(&[1.0])),
            Err(PhasorError::InsufficientSamples { count: 1 })
        );
    }

    #[test]
    fn test_rms() {
        assert_eq!(rms(&[]), 0.0);
        assert!((rms(&samples(&[3.0, -3.0, 3.0, -3.0])) - 3.0).abs() < 1e-12);
        assert!((rms(&samples(&[1.0, 7.0])) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_zero_waveform() {
        assert_eq!(estimate_phasor(&samples(&[0.0, 0.0, 0.0])), Ok(Phasor::ZERO));
    }

    #[test]
    fn test_reference_sinusoid_accuracy() {
        let reference = Phasor::new(120.0, Degrees(30.0));
        let waveform = sample_sinusoid(reference, Hertz(60.0), Hertz(32_000.0), Seconds(1.0));
        assert_eq!(waveform.len(), 32_000);

        let estimate = estimate_phasor(&waveform).unwrap();
        assert!(percent_error(reference, estimate) < 0.5);
        assert!((estimate.rms() - 120.0).abs() < 0.6);
        assert!((estimate.angle().0 - 30.0).abs() < 0.5);
    }

    #[test]
    fn test_estimates_every_quadrant() {
        for angle in [-150.0, -100.0, -45.0, 0.0, 45.0, 100.0, 150.0, 180.0] {
            let reference = Phasor::new(10.0, Degrees(angle));
            let waveform =
                sample_sinusoid(reference, Hertz(50.0), Hertz(20_000.0), Seconds(0.1));
            let estimate = estimate_phasor(&waveform).unwrap();
            assert!(
                percent_error(reference, estimate) < 1.0,
                "angle {angle}: estimated {estimate}"
            );
        }
    }

    #[test]
    fn test_crest_clamps_to_ninety() {
        // First sample above the computed peak
        let rising = samples(&[2.0, 0.0, -1.0, 0.0]);
        assert_eq!(estimate_phasor(&rising).unwrap().angle(), Degrees(90.0));

        let falling = samples(&[-2.0, 0.0, 1.0, 0.0]);
        assert_eq!(estimate_phasor(&falling).unwrap().angle(), Degrees(-90.0));
    }

    #[test]
    fn test_descending_quadrants() {
        // rms = 1, peak = √2; first sample at half the peak
        let half = SQRT_2 / 2.0;
        let q2 = first_sample_angle(half, 0.0, 1.0);
        assert!((q2.0 - 150.0).abs() < 1e-9);

        let q3 = first_sample_angle(-half, -SQRT_2, 1.0);
        assert!((q3.0 + 150.0).abs() < 1e-9);

        let rising = first_sample_angle(-half, 0.0, 1.0);
        assert!((rising.0 + 30.0).abs() < 1e-9);
    }
}
