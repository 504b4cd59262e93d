//! Per-line feature vectors.
//!
//! A [`LineSample`] turns the snapshots of the two nodes at either end of a line into
//! per-unit features:
//!
//! | Feature | Source | Divisor |
//! |---------|--------|---------|
//! | line current at node 1 / node 2 | the current at each node flowing to the other node | that node's rated current |
//! | node voltage 1 / 2 | each node's voltage | that node's rated voltage |
//! | other currents at node 1 / 2 | every other current at the node, in order | that node's rated current |
//!
//! Normalization divides magnitudes only; phase angles pass through unchanged.
//!
//! Building a sample is all-or-nothing: if either node lacks a current toward the
//! other, [`LineSample::build`] returns an error and nothing is produced.

use linestat_core::{Diagnostics, LineStatError, LineStatResult, NodeId, NodeSample, Parameter};
use serde::Serialize;
use std::fmt;

/// Normalized features of one line at one sampling epoch, with its status label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSample {
    node1: NodeId,
    node2: NodeId,
    node1_line_current: Parameter,
    node2_line_current: Parameter,
    node1_voltage: Parameter,
    node2_voltage: Parameter,
    node1_other_currents: Vec<Parameter>,
    node2_other_currents: Vec<Parameter>,
    is_working: bool,
}

/// Structural addressing of a [`LineSample`]: which parameters it was built from,
/// ignoring their values, units and the status label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineTopology {
    /// (start, destination) of the node 1 and node 2 line currents
    pub line_currents: [(NodeId, NodeId); 2],
    /// Start node of the node 1 and node 2 voltages
    pub voltages: [NodeId; 2],
    pub node1_other_currents: Vec<(NodeId, NodeId)>,
    pub node2_other_currents: Vec<(NodeId, NodeId)>,
}

impl LineSample {
    /// Build the features of the line between `node1` and `node2`.
    ///
    /// `is_working` is the known status for labeled samples, or any placeholder for
    /// the sample being classified; the classifier never reads the query's label.
    ///
    /// # Errors
    ///
    /// - [`LineStatError::LineCurrentNotFound`] if either node has no current toward
    ///   the other.
    /// - [`LineStatError::Validation`] if both snapshots are of the same node.
    /// - [`LineStatError::Config`] if a node's ratings cannot be used as divisors.
    /// - [`LineStatError::Validation`] if any per-unit feature is NaN or infinite.
    pub fn build(node1: &NodeSample, node2: &NodeSample, is_working: bool) -> LineStatResult<Self> {
        if node1.node() == node2.node() {
            return Err(LineStatError::Validation(format!(
                "a line needs two distinct nodes, got node {} twice",
                node1.node()
            )));
        }
        node1.ratings().validate()?;
        node2.ratings().validate()?;

        let (line1_idx, line1) = line_current(node1, node2)?;
        let (line2_idx, line2) = line_current(node2, node1)?;
        let rated_current1 = node1.ratings().rated_current.value();
        let rated_current2 = node2.ratings().rated_current.value();

        let sample = Self {
            node1: node1.node(),
            node2: node2.node(),
            node1_line_current: line1.normalized(rated_current1),
            node2_line_current: line2.normalized(rated_current2),
            node1_voltage: node1
                .voltage()
                .normalized(node1.ratings().rated_voltage.value()),
            node2_voltage: node2
                .voltage()
                .normalized(node2.ratings().rated_voltage.value()),
            node1_other_currents: other_currents(node1, line1_idx),
            node2_other_currents: other_currents(node2, line2_idx),
            is_working,
        };
        if let Some(bad) = sample.features().find(|p| !p.phasor.is_finite()) {
            return Err(LineStatError::Validation(format!(
                "line {}-{}: per-unit {} is not finite ({})",
                sample.node1, sample.node2, bad.name, bad.phasor
            )));
        }
        Ok(sample)
    }

    /// Every per-unit feature: line currents, voltages, then other currents.
    fn features(&self) -> impl Iterator<Item = &Parameter> {
        [
            &self.node1_line_current,
            &self.node2_line_current,
            &self.node1_voltage,
            &self.node2_voltage,
        ]
        .into_iter()
        .chain(&self.node1_other_currents)
        .chain(&self.node2_other_currents)
    }

    #[inline]
    pub fn node1(&self) -> NodeId {
        self.node1
    }

    #[inline]
    pub fn node2(&self) -> NodeId {
        self.node2
    }

    pub fn node1_line_current(&self) -> &Parameter {
        &self.node1_line_current
    }

    pub fn node2_line_current(&self) -> &Parameter {
        &self.node2_line_current
    }

    pub fn node1_voltage(&self) -> &Parameter {
        &self.node1_voltage
    }

    pub fn node2_voltage(&self) -> &Parameter {
        &self.node2_voltage
    }

    pub fn node1_other_currents(&self) -> &[Parameter] {
        &self.node1_other_currents
    }

    pub fn node2_other_currents(&self) -> &[Parameter] {
        &self.node2_other_currents
    }

    #[inline]
    pub fn is_working(&self) -> bool {
        self.is_working
    }

    pub fn topology(&self) -> LineTopology {
        LineTopology {
            line_currents: [
                self.node1_line_current.address(),
                self.node2_line_current.address(),
            ],
            voltages: [self.node1_voltage.start, self.node2_voltage.start],
            node1_other_currents: self.node1_other_currents.iter().map(Parameter::address).collect(),
            node2_other_currents: self.node2_other_currents.iter().map(Parameter::address).collect(),
        }
    }
}

fn line_current<'a>(
    from: &'a NodeSample,
    to: &NodeSample,
) -> LineStatResult<(usize, &'a Parameter)> {
    from.current_to(to.node())
        .ok_or(LineStatError::LineCurrentNotFound {
            from: from.node(),
            to: to.node(),
        })
}

/// Every current at `node` except the line current, per unit, in their listed order.
fn other_currents(node: &NodeSample, line_idx: usize) -> Vec<Parameter> {
    let rated_current = node.ratings().rated_current.value();
    node.currents()
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != line_idx)
        .map(|(_, current)| current.normalized(rated_current))
        .collect()
}

impl fmt::Display for LineSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Line {}-{} ({})",
            self.node1,
            self.node2,
            if self.is_working { "working" } else { "not working" }
        )?;
        writeln!(f, "  line currents (pu): {}, {}", self.node1_line_current, self.node2_line_current)?;
        writeln!(f, "  node voltages (pu): {}, {}", self.node1_voltage, self.node2_voltage)?;
        for current in self.node1_other_currents.iter().chain(&self.node2_other_currents) {
            writeln!(f, "  other current (pu): {}", current)?;
        }
        Ok(())
    }
}

/// Build a labeled set from `(node1, node2, is_working)` snapshot pairs.
///
/// A pair that fails [`LineSample::build`] is left out and recorded as a
/// `"construction"` error naming `labeled pair #i`. The returned samples keep the
/// order of the pairs that built.
pub fn build_labeled_set<'a, I>(pairs: I) -> (Vec<LineSample>, Diagnostics)
where
    I: IntoIterator<Item = (&'a NodeSample, &'a NodeSample, bool)>,
{
    let mut diag = Diagnostics::new();
    let mut samples = Vec::new();
    for (i, (node1, node2, is_working)) in pairs.into_iter().enumerate() {
        match LineSample::build(node1, node2, is_working) {
            Ok(sample) => samples.push(sample),
            Err(err) => {
                diag.add_error_with_entity("construction", &err.to_string(), &format!("labeled pair #{i}"))
            }
        }
    }
    (samples, diag)
}
