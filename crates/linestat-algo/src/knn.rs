//! k-nearest-neighbor line status classification.
//!
//! [`KnnClassifier`] measures every labeled [`LineSample`] against the query, keeps the
//! `k` closest in a small sorted array ([`NearestNeighbors`]) and predicts the query's
//! status by majority vote over their labels.
//!
//! ## Top-k maintenance
//!
//! The running selection is insertion into a sorted array of at most `k` entries:
//! while fewer than `k` slots are filled a candidate is appended; once full it replaces
//! the worst slot only if strictly closer. Either way it then bubbles toward the front
//! while it is smaller than its predecessor. This is O(n·k) over the labeled set, which
//! beats a heap for the small `k` (3 to 7) used in practice. Equal distances keep their
//! scan order.
//!
//! ## Voting
//!
//! The prediction is "working" only when strictly more neighbors are working than not.
//! An even split predicts "not working"; choose an odd `k` to avoid ties.
//!
//! ## Comparability
//!
//! Every labeled sample must describe the same line as the query. A mismatch is a hard
//! error naming the offending sample; [`screen_labeled_set`] lets callers filter a
//! mixed set beforehand.

use crate::distance::{topology_mismatch, DistanceSample, DistanceWeights};
use crate::line_sample::LineSample;
use linestat_core::{Diagnostics, LineStatError, LineStatResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Classifier parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnnConfig {
    /// Number of neighbors that vote
    pub k: usize,
    pub weights: DistanceWeights,
}

impl Default for KnnConfig {
    fn default() -> Self {
        Self {
            k: 5,
            weights: DistanceWeights::default(),
        }
    }
}

impl KnnConfig {
    pub fn with_k(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    /// Check the configuration against a labeled set of `labeled_len` samples.
    pub fn validate(&self, labeled_len: usize) -> LineStatResult<()> {
        validate_k(self.k, labeled_len)?;
        self.weights.validate()
    }
}

fn validate_k(k: usize, labeled_len: usize) -> LineStatResult<()> {
    if k == 0 {
        return Err(LineStatError::Config("k must be at least 1".into()));
    }
    if k > labeled_len {
        return Err(LineStatError::Config(format!(
            "k = {k} exceeds the {labeled_len} labeled samples"
        )));
    }
    Ok(())
}

/// The `k` smallest distances seen so far, ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestNeighbors {
    k: usize,
    slots: Vec<DistanceSample>,
}

impl NearestNeighbors {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            slots: Vec::with_capacity(k),
        }
    }

    /// Offer a candidate; returns whether it was kept. A NaN distance is never kept.
    pub fn offer(&mut self, candidate: DistanceSample) -> bool {
        if candidate.distance.is_nan() {
            return false;
        }
        if self.slots.len() < self.k {
            self.slots.push(candidate);
        } else {
            match self.slots.last_mut() {
                Some(worst) if candidate.distance < worst.distance => *worst = candidate,
                _ => return false,
            }
        }

        let mut j = self.slots.len() - 1;
        while j > 0 && self.slots[j].distance < self.slots[j - 1].distance {
            self.slots.swap(j, j - 1);
            j -= 1;
        }
        true
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Largest distance kept, once any candidate has been kept.
    pub fn worst(&self) -> Option<f64> {
        self.slots.last().map(|d| d.distance)
    }

    pub fn as_slice(&self) -> &[DistanceSample] {
        &self.slots
    }

    pub fn into_vec(self) -> Vec<DistanceSample> {
        self.slots
    }
}

/// Working / not-working vote counts among the neighbors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VoteTally {
    pub working: usize,
    pub not_working: usize,
}

impl VoteTally {
    pub fn count(neighbors: &[DistanceSample]) -> Self {
        neighbors.iter().fold(Self::default(), |mut tally, n| {
            if n.is_working {
                tally.working += 1;
            } else {
                tally.not_working += 1;
            }
            tally
        })
    }

    /// Strict majority for "working"; ties go to "not working".
    #[inline]
    pub fn prediction(&self) -> bool {
        self.working > self.not_working
    }
}

/// Majority vote over `neighbors`' labels.
pub fn majority_vote(neighbors: &[DistanceSample]) -> bool {
    VoteTally::count(neighbors).prediction()
}

/// Indices of labeled samples comparable with `query`, plus one warning per sample
/// that is not.
pub fn screen_labeled_set(labeled: &[LineSample], query: &LineSample) -> (Vec<usize>, Diagnostics) {
    let mut diag = Diagnostics::new();
    let mut comparable = Vec::with_capacity(labeled.len());
    for (i, known) in labeled.iter().enumerate() {
        match topology_mismatch(known, query) {
            None => comparable.push(i),
            Some(reason) => {
                diag.add_warning_with_entity("topology", &reason, &format!("labeled sample #{i}"))
            }
        }
    }
    (comparable, diag)
}

/// Scan the whole labeled set against `query`.
fn select_neighbors(
    labeled: &[LineSample],
    query: &LineSample,
    config: &KnnConfig,
) -> LineStatResult<NearestNeighbors> {
    debug!(k = config.k, labeled = labeled.len(), "selecting nearest neighbors");
    let mut neighbors = NearestNeighbors::new(config.k);
    for (i, known) in labeled.iter().enumerate() {
        let sample = DistanceSample::new(i, known, query, &config.weights).map_err(|err| match err {
            LineStatError::TopologyMismatch(reason) => {
                LineStatError::TopologyMismatch(format!("labeled sample #{i}: {reason}"))
            }
            LineStatError::Validation(reason) => {
                LineStatError::Validation(format!("labeled sample #{i}: {reason}"))
            }
            other => other,
        })?;
        neighbors.offer(sample);
    }
    Ok(neighbors)
}

/// Status classifier for one query against a borrowed labeled set.
///
/// The neighbor list and prediction are always consistent with the current labeled
/// set, query and `k`: every setter rebuilds them, and a setter that fails leaves the
/// classifier unchanged.
///
/// ```
/// use linestat_algo::{KnnClassifier, SyntheticLineScenario};
///
/// let scenario = SyntheticLineScenario::default();
/// let labeled = scenario.labeled_samples()?;
/// let query = scenario.query(true)?;
///
/// let knn = KnnClassifier::with_k(&labeled, &query, 3)?;
/// assert!(knn.predicted_status());
/// assert_eq!(knn.neighbors().len(), 3);
/// # Ok::<(), linestat_core::LineStatError>(())
/// ```
#[derive(Debug, Clone)]
pub struct KnnClassifier<'a> {
    labeled: &'a [LineSample],
    query: &'a LineSample,
    config: KnnConfig,
    neighbors: NearestNeighbors,
    predicted_status: bool,
}

impl<'a> KnnClassifier<'a> {
    /// Classify `query` against `labeled`.
    ///
    /// # Errors
    ///
    /// - [`LineStatError::Config`] if `k` is zero or exceeds `labeled.len()`, or a
    ///   weight is negative or not finite.
    /// - [`LineStatError::TopologyMismatch`] if any labeled sample is of another line.
    /// - [`LineStatError::Validation`] if a distance to the query is not finite.
    pub fn new(
        labeled: &'a [LineSample],
        query: &'a LineSample,
        config: KnnConfig,
    ) -> LineStatResult<Self> {
        config.validate(labeled.len())?;
        let neighbors = select_neighbors(labeled, query, &config)?;
        let mut knn = Self {
            labeled,
            query,
            config,
            neighbors,
            predicted_status: false,
        };
        knn.vote();
        Ok(knn)
    }

    /// Classify with the default weights.
    pub fn with_k(labeled: &'a [LineSample], query: &'a LineSample, k: usize) -> LineStatResult<Self> {
        Self::new(labeled, query, KnnConfig::with_k(k))
    }

    /// Change `k` and rebuild.
    pub fn set_k(&mut self, k: usize) -> LineStatResult<()> {
        let config = KnnConfig { k, ..self.config };
        self.rebuild(self.labeled, self.query, config)
    }

    /// Classify a different query against the same labeled set.
    pub fn set_query(&mut self, query: &'a LineSample) -> LineStatResult<()> {
        self.rebuild(self.labeled, query, self.config)
    }

    /// Replace the labeled set, keeping the query and `k`.
    pub fn set_labeled(&mut self, labeled: &'a [LineSample]) -> LineStatResult<()> {
        self.rebuild(labeled, self.query, self.config)
    }

    fn rebuild(
        &mut self,
        labeled: &'a [LineSample],
        query: &'a LineSample,
        config: KnnConfig,
    ) -> LineStatResult<()> {
        config.validate(labeled.len())?;
        self.neighbors = select_neighbors(labeled, query, &config)?;
        self.labeled = labeled;
        self.query = query;
        self.config = config;
        self.vote();
        Ok(())
    }

    fn vote(&mut self) {
        let tally = self.tally();
        self.predicted_status = tally.prediction();
        debug!(
            working = tally.working,
            not_working = tally.not_working,
            predicted = self.predicted_status,
            "knn vote"
        );
    }

    /// Neighbors ascending by distance; `known_index` points into [`Self::labeled`].
    pub fn neighbors(&self) -> &[DistanceSample] {
        self.neighbors.as_slice()
    }

    #[inline]
    pub fn predicted_status(&self) -> bool {
        self.predicted_status
    }

    pub fn tally(&self) -> VoteTally {
        VoteTally::count(self.neighbors.as_slice())
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.config.k
    }

    pub fn config(&self) -> &KnnConfig {
        &self.config
    }

    pub fn labeled(&self) -> &'a [LineSample] {
        self.labeled
    }

    pub fn query(&self) -> &'a LineSample {
        self.query
    }
}
