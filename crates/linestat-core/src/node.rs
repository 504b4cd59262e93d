//! Per-node measurement snapshots.
//!
//! A [`NodeSample`] is everything metered at one grid node in one sampling epoch: the
//! node voltage and one current per branch leaving the node. Its [`NodeRatings`] are the
//! divisors later used to express those values per unit.

use crate::error::{LineStatError, LineStatResult};
use crate::parameter::{Parameter, Quantity};
use crate::phasor::Phasor;
use crate::units::{Amperes, Volts};
use crate::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rated voltage and current of the equipment at a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeRatings {
    pub rated_voltage: Volts,
    pub rated_current: Amperes,
}

impl Default for NodeRatings {
    fn default() -> Self {
        Self {
            rated_voltage: Volts(250_000.0),
            rated_current: Amperes(25.0),
        }
    }
}

impl NodeRatings {
    pub fn new(rated_voltage: Volts, rated_current: Amperes) -> Self {
        Self {
            rated_voltage,
            rated_current,
        }
    }

    /// Both ratings must be finite and strictly positive to serve as divisors.
    pub fn validate(&self) -> LineStatResult<()> {
        if !(self.rated_voltage.is_finite() && self.rated_voltage.0 > 0.0) {
            return Err(LineStatError::Config(format!(
                "rated voltage must be positive and finite, got {}",
                self.rated_voltage
            )));
        }
        if !(self.rated_current.is_finite() && self.rated_current.0 > 0.0) {
            return Err(LineStatError::Config(format!(
                "rated current must be positive and finite, got {}",
                self.rated_current
            )));
        }
        Ok(())
    }
}

/// Voltage and outgoing currents measured at one node.
///
/// Deserialization goes through [`NodeSample::from_parameters`], so a record whose
/// parameters do not belong to its node is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeSampleRecord")]
pub struct NodeSample {
    node: NodeId,
    voltage: Parameter,
    currents: Vec<Parameter>,
    #[serde(default)]
    ratings: NodeRatings,
}

/// Unchecked wire form of a [`NodeSample`].
#[derive(Deserialize)]
struct NodeSampleRecord {
    node: NodeId,
    voltage: Parameter,
    currents: Vec<Parameter>,
    #[serde(default)]
    ratings: NodeRatings,
}

impl TryFrom<NodeSampleRecord> for NodeSample {
    type Error = LineStatError;

    fn try_from(record: NodeSampleRecord) -> LineStatResult<Self> {
        Ok(NodeSample::from_parameters(record.node, record.voltage, record.currents)?
            .with_ratings(record.ratings))
    }
}

impl NodeSample {
    /// Build a node sample from phasors, naming each parameter after its address.
    ///
    /// ```
    /// use linestat_core::{Degrees, NodeId, NodeSample, Phasor};
    ///
    /// let node = NodeSample::new(
    ///     NodeId::new(1),
    ///     Phasor::new(250_000.0, Degrees(15.0)),
    ///     [
    ///         (Phasor::new(25.0, Degrees(-165.0)), NodeId::GROUND),
    ///         (Phasor::new(25.0, Degrees(15.0)), NodeId::new(2)),
    ///     ],
    /// );
    /// assert_eq!(node.currents()[1].name, "I12");
    /// ```
    pub fn new(
        node: NodeId,
        voltage: Phasor,
        currents: impl IntoIterator<Item = (Phasor, NodeId)>,
    ) -> Self {
        Self {
            node,
            voltage: Parameter::voltage(node, voltage),
            currents: currents
                .into_iter()
                .map(|(phasor, destination)| Parameter::current(node, destination, phasor))
                .collect(),
            ratings: NodeRatings::default(),
        }
    }

    /// Build a node sample from prebuilt parameters (e.g. estimated from waveforms).
    ///
    /// The voltage must be a voltage from `node` to ground and every current must be a
    /// current leaving `node`.
    pub fn from_parameters(
        node: NodeId,
        voltage: Parameter,
        currents: Vec<Parameter>,
    ) -> LineStatResult<Self> {
        if voltage.quantity != Quantity::Voltage || voltage.address() != (node, NodeId::GROUND)
        {
            return Err(LineStatError::Validation(format!(
                "parameter {} is not the voltage of node {} to ground",
                voltage.name, node
            )));
        }
        if let Some(bad) = currents
            .iter()
            .find(|c| c.quantity != Quantity::Current || c.start != node)
        {
            return Err(LineStatError::Validation(format!(
                "parameter {} is not a current leaving node {}",
                bad.name, node
            )));
        }
        Ok(Self {
            node,
            voltage,
            currents,
            ratings: NodeRatings::default(),
        })
    }

    /// Override the default ratings.
    pub fn with_ratings(mut self, ratings: NodeRatings) -> Self {
        self.ratings = ratings;
        self
    }

    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    #[inline]
    pub fn voltage(&self) -> &Parameter {
        &self.voltage
    }

    #[inline]
    pub fn currents(&self) -> &[Parameter] {
        &self.currents
    }

    #[inline]
    pub fn ratings(&self) -> NodeRatings {
        self.ratings
    }

    /// Position and value of the first current flowing to `destination`.
    pub fn current_to(&self, destination: NodeId) -> Option<(usize, &Parameter)> {
        self.currents
            .iter()
            .enumerate()
            .find(|(_, c)| c.destination == destination)
    }
}

impl fmt::Display for NodeSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Node {}", self.node)?;
        writeln!(f, "  {}", self.voltage)?;
        for current in &self.currents {
            writeln!(f, "  {}", current)?;
        }
        writeln!(f, "  Rated Voltage: {}", self.ratings.rated_voltage)?;
        write!(f, "  Rated Current: {}", self.ratings.rated_current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Degrees;

    fn node1() -> NodeSample {
        NodeSample::new(
            NodeId::new(1),
            Phasor::new(250_000.0, Degrees(15.0)),
            [
                (Phasor::new(25.0, Degrees(-165.0)), NodeId::GROUND),
                (Phasor::new(25.0, Degrees(15.0)), NodeId::new(2)),
            ],
        )
    }

    #[test]
    fn test_new_builds_named_parameters() {
        let node = node1();
        assert_eq!(node.node(), NodeId::new(1));
        assert_eq!(node.voltage().name, "V1");
        assert_eq!(node.voltage().destination, NodeId::GROUND);
        let names: Vec<_> = node.currents().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["I10", "I12"]);
        assert_eq!(node.ratings(), NodeRatings::default());
    }

    #[test]
    fn test_current_to() {
        let node = node1();
        let (idx, current) = node.current_to(NodeId::new(2)).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(current.phasor.angle(), Degrees(15.0));
        assert!(node.current_to(NodeId::new(7)).is_none());
    }

    #[test]
    fn test_node_without_currents() {
        let node = NodeSample::new(NodeId::new(4), Phasor::ZERO, []);
        assert!(node.currents().is_empty());
    }

    #[test]
    fn test_with_ratings() {
        let ratings = NodeRatings::new(Volts(138_000.0), Amperes(10.0));
        let node = node1().with_ratings(ratings);
        assert_eq!(node.ratings().rated_voltage, Volts(138_000.0));
        assert!(ratings.validate().is_ok());
    }

    #[test]
    fn test_ratings_validation() {
        let zero_voltage = NodeRatings::new(Volts(0.0), Amperes(25.0));
        assert!(matches!(
            zero_voltage.validate(),
            Err(LineStatError::Config(_))
        ));
        let nan_current = NodeRatings::new(Volts(1.0), Amperes(f64::NAN));
        assert!(nan_current.validate().is_err());
    }

    #[test]
    fn test_from_parameters_checks_addresses() {
        let n = NodeId::new(1);
        let v = Parameter::voltage(n, Phasor::new(1.0, Degrees(0.0)));
        let ok = NodeSample::from_parameters(
            n,
            v.clone(),
            vec![Parameter::current(n, NodeId::new(2), Phasor::ZERO)],
        );
        assert!(ok.is_ok());

        let wrong_start = NodeSample::from_parameters(
            n,
            v.clone(),
            vec![Parameter::current(NodeId::new(9), NodeId::new(2), Phasor::ZERO)],
        );
        assert!(matches!(wrong_start, Err(LineStatError::Validation(_))));

        let other_node_voltage = Parameter::voltage(NodeId::new(2), Phasor::ZERO);
        assert!(NodeSample::from_parameters(n, other_node_voltage, vec![]).is_err());
    }

    #[test]
    fn test_ratings_deserialize_with_defaults() {
        let ratings: NodeRatings = serde_json::from_str(r#"{"rated_current": 10.0}"#).unwrap();
        assert_eq!(ratings.rated_current, Amperes(10.0));
        assert_eq!(ratings.rated_voltage, Volts(250_000.0));
    }

    #[test]
    fn test_deserialize_round_trips_valid_sample() {
        let node = node1().with_ratings(NodeRatings::new(Volts(138_000.0), Amperes(10.0)));
        let json = serde_json::to_string(&node).unwrap();
        let back: NodeSample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_deserialize_rejects_foreign_current() {
        let mut value = serde_json::to_value(node1()).unwrap();
        value["currents"][1]["start"] = serde_json::json!(3);
        let err = serde_json::from_value::<NodeSample>(value).unwrap_err();
        assert!(err.to_string().contains("not a current leaving node 1"), "{err}");
    }

    #[test]
    fn test_deserialize_rejects_foreign_voltage() {
        let mut value = serde_json::to_value(node1()).unwrap();
        value["node"] = serde_json::json!(2);
        assert!(serde_json::from_value::<NodeSample>(value).is_err());
    }
}
