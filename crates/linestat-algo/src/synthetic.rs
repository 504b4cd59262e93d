//! Synthetic labeled sets for demos and tests.
//!
//! Generates two clusters of samples of one line: a "working" cluster around a normal
//! load flow and a "not working" cluster around a faulted one. Each cluster member is
//! its operating point with every magnitude scaled by `0.9 + 0.2·i/n`, so a cluster
//! spans ±10% around its average. The average itself (scale 1.0) is the natural query.

use crate::line_sample::LineSample;
use linestat_core::{Degrees, LineStatResult, NodeId, NodeSample, Phasor};
use serde::{Deserialize, Serialize};

/// Phasors of one line at one operating point.
///
/// Node 1 reports currents toward ground and node 2; node 2 reports currents toward
/// node 1 and ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    pub node1_voltage: Phasor,
    pub node1_currents: [Phasor; 2],
    pub node2_voltage: Phasor,
    pub node2_currents: [Phasor; 2],
}

impl OperatingPoint {
    /// Balanced load flow at rated values.
    pub fn working() -> Self {
        Self {
            node1_voltage: Phasor::new(250_000.0, Degrees(15.0)),
            node1_currents: [
                Phasor::new(25.0, Degrees(165.0)),
                Phasor::new(25.0, Degrees(-15.0)),
            ],
            node2_voltage: Phasor::new(250_000.0, Degrees(15.0)),
            node2_currents: [
                Phasor::new(25.0, Degrees(-15.0)),
                Phasor::new(25.0, Degrees(165.0)),
            ],
        }
    }

    /// Collapsed voltages and ten-fold fault currents.
    pub fn not_working() -> Self {
        Self {
            node1_voltage: Phasor::new(50_000.0, Degrees(-150.0)),
            node1_currents: [
                Phasor::new(250.0, Degrees(-70.0)),
                Phasor::new(250.0, Degrees(110.0)),
            ],
            node2_voltage: Phasor::new(75_000.0, Degrees(-120.0)),
            node2_currents: [
                Phasor::new(250.0, Degrees(70.0)),
                Phasor::new(250.0, Degrees(-110.0)),
            ],
        }
    }

    fn scaled(&self, factor: f64) -> Self {
        Self {
            node1_voltage: self.node1_voltage * factor,
            node1_currents: self.node1_currents.map(|p| p * factor),
            node2_voltage: self.node2_voltage * factor,
            node2_currents: self.node2_currents.map(|p| p * factor),
        }
    }
}

/// Labeled-set generator for the line between `node1` and `node2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticLineScenario {
    pub node1: NodeId,
    pub node2: NodeId,
    /// Number of samples in the working cluster
    pub working: usize,
    /// Number of samples in the not-working cluster
    pub not_working: usize,
}

impl Default for SyntheticLineScenario {
    fn default() -> Self {
        Self {
            node1: NodeId::new(1),
            node2: NodeId::new(2),
            working: 6,
            not_working: 4,
        }
    }
}

impl SyntheticLineScenario {
    pub fn new(working: usize, not_working: usize) -> Self {
        Self {
            working,
            not_working,
            ..Self::default()
        }
    }

    /// Node snapshots at `point`.
    pub fn node_samples(&self, point: &OperatingPoint) -> (NodeSample, NodeSample) {
        let node1 = NodeSample::new(
            self.node1,
            point.node1_voltage,
            [
                (point.node1_currents[0], NodeId::GROUND),
                (point.node1_currents[1], self.node2),
            ],
        );
        let node2 = NodeSample::new(
            self.node2,
            point.node2_voltage,
            [
                (point.node2_currents[0], self.node1),
                (point.node2_currents[1], NodeId::GROUND),
            ],
        );
        (node1, node2)
    }

    /// Node snapshots of the working cluster followed by the not-working cluster, each
    /// with its label.
    pub fn labeled_node_pairs(&self) -> Vec<(NodeSample, NodeSample, bool)> {
        let mut pairs = Vec::with_capacity(self.working + self.not_working);
        for (count, point, is_working) in [
            (self.working, OperatingPoint::working(), true),
            (self.not_working, OperatingPoint::not_working(), false),
        ] {
            for i in 0..count {
                let factor = 0.9 + 0.2 * i as f64 / count as f64;
                let (node1, node2) = self.node_samples(&point.scaled(factor));
                pairs.push((node1, node2, is_working));
            }
        }
        pairs
    }

    /// Working cluster followed by the not-working cluster.
    pub fn labeled_samples(&self) -> LineStatResult<Vec<LineSample>> {
        self.labeled_node_pairs()
            .iter()
            .map(|(node1, node2, is_working)| LineSample::build(node1, node2, *is_working))
            .collect()
    }

    /// Sample at the average of the working or not-working cluster.
    ///
    /// The query carries `is_working` as its placeholder label.
    pub fn query(&self, is_working: bool) -> LineStatResult<LineSample> {
        let point = if is_working {
            OperatingPoint::working()
        } else {
            OperatingPoint::not_working()
        };
        let (node1, node2) = self.node_samples(&point);
        LineSample::build(&node1, &node2, is_working)
    }
}
