//! Snapshot Builder: raw classifier observations → ordered classifications
//!
//! Steps, in order:
//! - keep the first `max_candidates` observations (classifier output is pre-ranked)
//! - drop observations with confidence < `min_confidence`
//! - stable sort by descending confidence (ties keep classifier order)
//! - carry forward each label's confidence from the previous sequence

use std::cmp::Ordering;
use std::collections::HashSet;
use crate::config::DemoConfig;
use crate::types::{Observation, Classification, ClassificationSequence};
use crate::{MAX_CANDIDATES, MIN_CONFIDENCE};

/// Builds the ordered sequence for one cycle
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    max_candidates: usize,
    min_confidence: f64,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBuilder {
    /// Create builder with the standard cap (11) and threshold (0.1)
    pub fn new() -> Self {
        Self {
            max_candidates: MAX_CANDIDATES,
            min_confidence: MIN_CONFIDENCE,
        }
    }

    /// Create builder from configuration
    pub fn from_config(config: &DemoConfig) -> Self {
        Self {
            max_candidates: config.max_candidates,
            min_confidence: config.min_confidence,
        }
    }

    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Build this cycle's sequence against the previous cycle's sequence
    ///
    /// The classifier never reports a label twice per frame; if it does,
    /// the first surviving occurrence wins. Confidences are not clamped.
    pub fn build(
        &self,
        observations: &[Observation],
        previous: &ClassificationSequence,
    ) -> ClassificationSequence {
        let mut seen: HashSet<&str> = HashSet::new();

        let mut survivors: Vec<&Observation> = observations
            .iter()
            .take(self.max_candidates)
            .filter(|o| o.confidence >= self.min_confidence)
            .filter(|o| seen.insert(o.identifier.as_str()))
            .collect();

        // sort_by is stable
        survivors.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });

        let items = survivors
            .into_iter()
            .map(|o| {
                let past_confidence = previous
                    .get(&o.identifier)
                    .map(|c| c.confidence)
                    .unwrap_or(0.0);
                Classification::new(o.identifier.clone(), o.confidence, past_confidence)
            })
            .collect();

        ClassificationSequence::new(items)
    }
}

// =============================================================================
// TESTS
// =============================================================================
