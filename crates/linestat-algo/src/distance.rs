//! Weighted distance between line samples.
//!
//! Two [`LineSample`]s are comparable only when they describe the same physical line:
//! identical parameter addressing for both line currents, both voltages and, position
//! by position, both lists of other currents. Labels and values are ignored.
//!
//! For comparable samples the distance is a weighted Euclidean norm over the per-feature
//! phasor differences:
//!
//! ```text
//! d² = (w_line/2)·(|ΔI₁|² + |ΔI₂|²)
//!    + (w_node/2)·(|ΔV₁|² + |ΔV₂|²)
//!    + Σ (w_other / 2n₁)·|Δi|²   over node 1's other currents
//!    + Σ (w_other / 2n₂)·|Δi|²   over node 2's other currents
//! ```
//!
//! `|Δ|` is the magnitude of the phasor difference, so a phase shift contributes even
//! when magnitudes agree. Each pair of line-end features is halved, and the other
//! currents at a node are averaged over their count `n`; a node with none adds nothing.

use crate::line_sample::LineSample;
use linestat_core::{LineStatError, LineStatResult, Parameter};
use serde::{Deserialize, Serialize};

/// Feature-group weights of the distance metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceWeights {
    /// Weight of the two line currents
    pub line: f64,
    /// Weight of the two node voltages
    pub node: f64,
    /// Weight of the other currents at each node
    pub other: f64,
}

impl Default for DistanceWeights {
    fn default() -> Self {
        Self {
            line: 20.0,
            node: 4.0,
            other: 1.0,
        }
    }
}

impl DistanceWeights {
    pub fn validate(&self) -> LineStatResult<()> {
        for (name, w) in [("line", self.line), ("node", self.node), ("other", self.other)] {
            if !w.is_finite() || w < 0.0 {
                return Err(LineStatError::Config(format!(
                    "{name} weight must be finite and non-negative, got {w}"
                )));
            }
        }
        Ok(())
    }
}

/// Distance from one labeled sample to the query, carrying the labeled sample's status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceSample {
    /// Position of the labeled sample in the labeled set
    pub known_index: usize,
    /// Status label of the labeled sample
    pub is_working: bool,
    pub distance: f64,
}

impl DistanceSample {
    /// Measure `known` (at `known_index` in its set) against `query`.
    ///
    /// Fails with [`LineStatError::TopologyMismatch`] when the samples are not of the
    /// same line, and with [`LineStatError::Validation`] when the distance overflows.
    pub fn new(
        known_index: usize,
        known: &LineSample,
        query: &LineSample,
        weights: &DistanceWeights,
    ) -> LineStatResult<Self> {
        if let Some(reason) = topology_mismatch(known, query) {
            return Err(LineStatError::TopologyMismatch(reason));
        }
        let distance = weighted_distance(known, query, weights);
        if !distance.is_finite() {
            return Err(LineStatError::Validation(format!(
                "distance to the query is not finite ({distance})"
            )));
        }
        Ok(Self {
            known_index,
            is_working: known.is_working(),
            distance,
        })
    }
}

/// True when `known` and `query` describe the same line.
pub fn are_samples_of_same_line(known: &LineSample, query: &LineSample) -> bool {
    topology_mismatch(known, query).is_none()
}

/// First addressing difference between two samples, if any.
pub fn topology_mismatch(known: &LineSample, query: &LineSample) -> Option<String> {
    let a = known.topology();
    let b = query.topology();

    for (end, (ka, qa)) in a.line_currents.iter().zip(&b.line_currents).enumerate() {
        if ka != qa {
            return Some(format!(
                "node {} line current runs {}->{} in the known sample but {}->{} in the query",
                end + 1,
                ka.0,
                ka.1,
                qa.0,
                qa.1
            ));
        }
    }
    for (end, (kv, qv)) in a.voltages.iter().zip(&b.voltages).enumerate() {
        if kv != qv {
            return Some(format!(
                "node {} voltage is measured at node {} in the known sample but at node {} in the query",
                end + 1,
                kv,
                qv
            ));
        }
    }
    for (end, known_others, query_others) in [
        (1, &a.node1_other_currents, &b.node1_other_currents),
        (2, &a.node2_other_currents, &b.node2_other_currents),
    ] {
        if known_others.len() != query_others.len() {
            return Some(format!(
                "node {} has {} other currents in the known sample but {} in the query",
                end,
                known_others.len(),
                query_others.len()
            ));
        }
        if let Some(pos) = known_others.iter().zip(query_others).position(|(k, q)| k != q) {
            return Some(format!(
                "node {} other current #{} runs {}->{} in the known sample but {}->{} in the query",
                end,
                pos,
                known_others[pos].0,
                known_others[pos].1,
                query_others[pos].0,
                query_others[pos].1
            ));
        }
    }
    None
}

/// Weighted Euclidean distance between two comparable samples.
///
/// Assumes [`are_samples_of_same_line`] holds; use [`DistanceSample::new`] for a
/// checked measurement.
pub fn weighted_distance(known: &LineSample, query: &LineSample, weights: &DistanceWeights) -> f64 {
    let mut d2 = 0.0;

    d2 += weights.line / 2.0 * diff_sq(known.node1_line_current(), query.node1_line_current());
    d2 += weights.line / 2.0 * diff_sq(known.node2_line_current(), query.node2_line_current());

    d2 += weights.node / 2.0 * diff_sq(known.node1_voltage(), query.node1_voltage());
    d2 += weights.node / 2.0 * diff_sq(known.node2_voltage(), query.node2_voltage());

    d2 += other_currents_term(known.node1_other_currents(), query.node1_other_currents(), weights.other);
    d2 += other_currents_term(known.node2_other_currents(), query.node2_other_currents(), weights.other);

    d2.sqrt()
}

fn diff_sq(a: &Parameter, b: &Parameter) -> f64 {
    (a.phasor - b.phasor).rms().powi(2)
}

fn other_currents_term(known: &[Parameter], query: &[Parameter], weight: f64) -> f64 {
    if known.is_empty() {
        return 0.0;
    }
    let per_current = weight / (2.0 * known.len() as f64);
    known
        .iter()
        .zip(query)
        .map(|(k, q)| per_current * diff_sq(k, q))
        .sum()
}
