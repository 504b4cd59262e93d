//! # linestat-algo: Line Status Classification
//!
//! Builds per-line feature vectors from node measurements and classifies a line as
//! working or not working by comparing it with a labeled history.
//!
//! ## Pipeline
//!
//! ```text
//! NodeSample × 2 ──▶ LineSample ──▶ DistanceSample (vs. query) ──▶ KnnClassifier ──▶ bool
//! ```
//!
//! | Stage | Type | Fails when |
//! |-------|------|------------|
//! | Feature construction | [`LineSample`] | a node has no current toward the other |
//! | Comparison | [`DistanceSample`] | the samples are not of the same line |
//! | Selection and vote | [`KnnClassifier`] | `k` is 0 or exceeds the labeled set |
//!
//! ## Example
//!
//! ```rust
//! use linestat_algo::{KnnClassifier, KnnConfig, SyntheticLineScenario};
//!
//! let scenario = SyntheticLineScenario::default();
//! let labeled = scenario.labeled_samples()?;
//! let query = scenario.query(false)?;
//!
//! let mut knn = KnnClassifier::new(&labeled, &query, KnnConfig::with_k(3))?;
//! assert!(!knn.predicted_status());
//!
//! knn.set_k(1)?;
//! assert_eq!(knn.neighbors().len(), 1);
//! # Ok::<(), linestat_core::LineStatError>(())
//! ```

pub mod distance;
pub mod knn;
pub mod line_sample;
pub mod synthetic;

pub use distance::{
    are_samples_of_same_line, topology_mismatch, weighted_distance, DistanceSample,
    DistanceWeights,
};
pub use knn::{
    majority_vote, screen_labeled_set, KnnClassifier, KnnConfig, NearestNeighbors, VoteTally,
};
pub use line_sample::{build_labeled_set, LineSample, LineTopology};
pub use synthetic::{OperatingPoint, SyntheticLineScenario};
