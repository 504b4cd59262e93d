//! # linestat-core: Measurement Model for Line Status Classification
//!
//! Value types shared by the classifier: phasors, raw waveform samples, addressed
//! voltage/current parameters and per-node measurement snapshots.
//!
//! ## Data Flow
//!
//! ```text
//! raw samples ──estimate──▶ Parameter (phasor) ──▶ NodeSample (voltage + currents)
//! ```
//!
//! Line features, distances and the nearest-neighbor search that consume these live
//! in `linestat-algo`.
//!
//! ## Quick Start
//!
//! ```rust
//! use linestat_core::*;
//!
//! let node1 = NodeSample::new(
//!     NodeId::new(1),
//!     Phasor::new(250_000.0, Degrees(15.0)),
//!     [
//!         (Phasor::new(25.0, Degrees(-165.0)), NodeId::GROUND),
//!         (Phasor::new(25.0, Degrees(15.0)), NodeId::new(2)),
//!     ],
//! );
//!
//! let (_, line_current) = node1.current_to(NodeId::new(2)).unwrap();
//! assert_eq!(line_current.name, "I12");
//! ```
//!
//! ## Modules
//!
//! - [`phasor`] - Complex arithmetic in polar and Cartesian form
//! - [`measurement`] - Raw samples and phasor estimation
//! - [`parameter`] - Named, addressed voltages and currents
//! - [`node`] - Node snapshots and their ratings
//! - [`units`] - Unit newtypes
//! - [`diagnostics`] - Non-fatal issue collection
//! - [`error`] - Error types

use serde::{Deserialize, Serialize};

pub mod diagnostics;
pub mod error;
pub mod measurement;
pub mod node;
pub mod parameter;
pub mod phasor;
pub mod units;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{LineStatError, LineStatResult, PhasorError};
pub use measurement::{estimate_phasor, sample_sinusoid, InstantaneousMeasurement};
pub use node::{NodeRatings, NodeSample};
pub use parameter::{Parameter, Quantity};
pub use phasor::Phasor;
pub use units::{Amperes, Degrees, Hertz, Radians, Seconds, Volts};

/// Grid node number. Node 0 is ground.
///
/// A number identifies one physical node within a comparison context; two distinct
/// nodes never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// The ground reference that node voltages are measured against
    pub const GROUND: NodeId = NodeId(0);

    #[inline]
    pub const fn new(value: u32) -> Self {
        NodeId(value)
    }

    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_ground(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        NodeId(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_ground() {
        assert!(NodeId::GROUND.is_ground());
        assert!(!NodeId::new(2).is_ground());
        assert_eq!(NodeId::from(5).value(), 5);
    }

    #[test]
    fn test_node_id_serde_transparent() {
        let json = serde_json::to_string(&NodeId::new(7)).unwrap();
        assert_eq!(json, "7");
        let id: NodeId = serde_json::from_str("3").unwrap();
        assert_eq!(id, NodeId::new(3));
    }
}
