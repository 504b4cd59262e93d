//! Named, addressed electrical quantities.
//!
//! A [`Parameter`] is one phasor together with what it measures (voltage or current)
//! and where: a start node and a destination node. Voltages are measured from a node to
//! ground ([`NodeId::GROUND`]); currents flow from a node toward a peer node.
//!
//! A parameter either wraps a phasor directly or is estimated from a raw waveform. The
//! waveform is consumed by the estimate; only its sample count is kept.

use crate::measurement::{estimate_phasor, InstantaneousMeasurement};
use crate::phasor::Phasor;
use crate::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// What a parameter measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantity {
    Voltage,
    Current,
}

impl Quantity {
    /// Base-unit suffix used when printing values
    pub fn unit_suffix(self) -> &'static str {
        match self {
            Quantity::Voltage => "V",
            Quantity::Current => "A",
        }
    }
}

/// A voltage or current phasor addressed by its start and destination nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub quantity: Quantity,
    pub start: NodeId,
    pub destination: NodeId,
    pub phasor: Phasor,
    /// Number of raw samples the phasor was estimated from (0 when given directly)
    #[serde(default)]
    pub sample_count: usize,
}

impl Parameter {
    /// Wrap a known phasor.
    pub fn from_phasor(
        name: impl Into<String>,
        quantity: Quantity,
        start: NodeId,
        destination: NodeId,
        phasor: Phasor,
    ) -> Self {
        Self {
            name: name.into(),
            quantity,
            start,
            destination,
            phasor,
            sample_count: 0,
        }
    }

    /// Estimate the phasor from a sampled waveform, consuming the samples.
    ///
    /// Fewer than two samples cannot be estimated; the parameter then carries
    /// [`Phasor::ZERO`] and a warning is logged.
    pub fn from_samples(
        name: impl Into<String>,
        quantity: Quantity,
        start: NodeId,
        destination: NodeId,
        samples: Vec<InstantaneousMeasurement>,
    ) -> Self {
        let name = name.into();
        let phasor = estimate_phasor(&samples).unwrap_or_else(|err| {
            warn!(parameter = %name, "{err}; using the zero phasor");
            Phasor::ZERO
        });
        Self {
            name,
            quantity,
            start,
            destination,
            phasor,
            sample_count: samples.len(),
        }
    }

    /// Node voltage `V{node}`, measured to ground.
    pub fn voltage(node: NodeId, phasor: Phasor) -> Self {
        Self::from_phasor(
            format!("V{}", node.value()),
            Quantity::Voltage,
            node,
            NodeId::GROUND,
            phasor,
        )
    }

    /// Branch current `I{node}{destination}`, flowing out of `node`.
    pub fn current(node: NodeId, destination: NodeId, phasor: Phasor) -> Self {
        Self::from_phasor(
            format!("I{}{}", node.value(), destination.value()),
            Quantity::Current,
            node,
            destination,
            phasor,
        )
    }

    /// (start, destination) pair identifying the parameter in the grid.
    #[inline]
    pub fn address(&self) -> (NodeId, NodeId) {
        (self.start, self.destination)
    }

    /// Same identity, magnitude divided by `rating`; the angle is untouched.
    pub fn normalized(&self, rating: f64) -> Parameter {
        Parameter {
            phasor: self.phasor / rating,
            ..self.clone()
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {}{} ({} -> {})",
            self.name,
            self.phasor,
            self.quantity.unit_suffix(),
            self.start,
            self.destination
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::sample_sinusoid;
    use crate::units::{Degrees, Hertz, Seconds};

    #[test]
    fn test_voltage_naming() {
        let v = Parameter::voltage(NodeId::new(3), Phasor::new(250_000.0, Degrees(15.0)));
        assert_eq!(v.name, "V3");
        assert_eq!(v.quantity, Quantity::Voltage);
        assert_eq!(v.address(), (NodeId::new(3), NodeId::GROUND));
        assert_eq!(v.sample_count, 0);
    }

    #[test]
    fn test_current_naming() {
        let i = Parameter::current(NodeId::new(1), NodeId::new(2), Phasor::ZERO);
        assert_eq!(i.name, "I12");
        assert_eq!(i.quantity.unit_suffix(), "A");
        assert_eq!(i.address(), (NodeId::new(1), NodeId::new(2)));
    }

    #[test]
    fn test_from_samples_estimates_and_counts() {
        let reference = Phasor::new(120.0, Degrees(30.0));
        let waveform = sample_sinusoid(reference, Hertz(60.0), Hertz(32_000.0), Seconds(1.0));
        let v = Parameter::from_samples(
            "V1",
            Quantity::Voltage,
            NodeId::new(1),
            NodeId::GROUND,
            waveform,
        );
        assert_eq!(v.sample_count, 32_000);
        let error = 100.0 * (reference - v.phasor).rms() / reference.rms();
        assert!(error < 0.5, "percent error {error}");
    }

    #[test]
    fn test_from_too_few_samples_is_zero() {
        let v = Parameter::from_samples(
            "V1",
            Quantity::Voltage,
            NodeId::new(1),
            NodeId::GROUND,
            vec![InstantaneousMeasurement::new(Seconds(0.0), 10.0)],
        );
        assert_eq!(v.phasor, Phasor::ZERO);
        assert_eq!(v.sample_count, 1);
    }

    #[test]
    fn test_normalized_keeps_identity_and_angle() {
        let i = Parameter::current(
            NodeId::new(1),
            NodeId::new(2),
            Phasor::new(25.0, Degrees(-165.0)),
        );
        let pu = i.normalized(25.0);
        assert_eq!(pu.name, i.name);
        assert_eq!(pu.address(), i.address());
        assert_eq!(pu.phasor.rms(), 1.0);
        assert_eq!(pu.phasor.angle(), Degrees(-165.0));
    }

    #[test]
    fn test_display() {
        let i = Parameter::current(NodeId::new(1), NodeId::new(2), Phasor::new(5.0, Degrees(0.0)));
        assert_eq!(i.to_string(), "I12 = 5 @ 0degA (1 -> 2)");
    }
}
