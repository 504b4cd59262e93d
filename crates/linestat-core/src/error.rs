//! Error types shared by the linestat crates.
//!
//! Two layers:
//!
//! - [`PhasorError`] describes the recoverable numeric edge cases (division by the zero
//!   phasor, zero raised to a non-positive power, too few raw samples). Checked
//!   operations return it; the operator forms fall back to the zero phasor instead.
//! - [`LineStatError`] is the crate-wide error returned by anything that builds a
//!   feature vector or runs a classification. Those failures are fatal to the value
//!   being built and are never papered over.
//!
//! # Example
//!
//! ```
//! use linestat_core::{LineStatError, LineStatResult, Phasor, Degrees};
//!
//! fn ratio(a: Phasor, b: Phasor) -> LineStatResult<Phasor> {
//!     Ok(a.checked_div(b)?)
//! }
//!
//! let err = ratio(Phasor::new(1.0, Degrees(0.0)), Phasor::ZERO).unwrap_err();
//! assert!(matches!(err, LineStatError::Phasor(_)));
//! ```

use crate::NodeId;
use thiserror::Error;

/// Numeric conditions raised by phasor arithmetic and phasor estimation.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PhasorError {
    /// The divisor phasor has a magnitude of exactly zero.
    #[error("divisor phasor is zero")]
    DivisionByZero,

    /// The zero phasor was raised to a non-positive exponent.
    #[error("base phasor is zero and exponent {exponent} is non-positive")]
    InvalidPower { exponent: f64 },

    /// A waveform needs at least two samples before a phase can be estimated.
    #[error("insufficient samples to estimate a phasor: got {count}, need at least 2")]
    InsufficientSamples { count: usize },
}

/// Unified error type for line-sample construction and classification.
#[derive(Error, Debug)]
pub enum LineStatError {
    /// Unrecovered phasor arithmetic or estimation failure
    #[error("Phasor error: {0}")]
    Phasor(#[from] PhasorError),

    /// A node has no current parameter flowing to the other end of the line
    #[error("node {from} has no current flowing to node {to}")]
    LineCurrentNotFound { from: NodeId, to: NodeId },

    /// Two line samples do not describe the same physical line
    #[error("Topology mismatch: {0}")]
    TopologyMismatch(String),

    /// Configuration errors (ratings, weights, neighbor count)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Convenience type alias for Results using LineStatError.
pub type LineStatResult<T> = Result<T, LineStatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LineStatError::Config("k must be positive".into());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("k must be positive"));
    }

    #[test]
    fn test_line_current_not_found_names_both_nodes() {
        let err = LineStatError::LineCurrentNotFound {
            from: NodeId::new(1),
            to: NodeId::new(2),
        };
        assert_eq!(err.to_string(), "node 1 has no current flowing to node 2");
    }

    #[test]
    fn test_phasor_error_conversion() {
        let err: LineStatError = PhasorError::DivisionByZero.into();
        assert!(matches!(
            err,
            LineStatError::Phasor(PhasorError::DivisionByZero)
        ));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> Result<(), PhasorError> {
            Err(PhasorError::InsufficientSamples { count: 1 })
        }

        fn outer() -> LineStatResult<()> {
            inner()?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert!(err.to_string().contains("got 1"));
    }
}
