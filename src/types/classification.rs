//! Observation and classification records

use serde::{Deserialize, Serialize};

/// A raw (label, confidence) pair emitted by the classifier for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Classifier label
    pub identifier: String,
    /// Score, expected in 0.0-1.0 (not validated)
    pub confidence: f64,
}

impl Observation {
    /// Create a new observation
    pub fn new(identifier: impl Into<String>, confidence: f64) -> Self {
        Self {
            identifier: identifier.into(),
            confidence,
        }
    }
}

/// A cleaned classification record for the current cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Label, unique within a sequence
    pub identifier: String,
    /// Confidence in the current cycle
    pub confidence: f64,
    /// Confidence from the previous cycle, 0.0 if the label is new
    pub past_confidence: f64,
}

impl Classification {
    /// Create a new classification record
    pub fn new(identifier: impl Into<String>, confidence: f64, past_confidence: f64) -> Self {
        Self {
            identifier: identifier.into(),
            confidence,
            past_confidence,
        }
    }

    /// Change since the previous cycle
    pub fn delta(&self) -> f64 {
        self.confidence - self.past_confidence
    }
}

/// Ordered classifications, highest confidence first
///
/// Identifiers are unique. Sequences produced by `SnapshotBuilder` uphold
/// the ordering; `new` trusts its caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationSequence {
    items: Vec<Classification>,
}

impl ClassificationSequence {
    /// Wrap already ordered, de-duplicated records
    pub fn new(items: Vec<Classification>) -> Self {
        Self { items }
    }

    /// Empty sequence (state before the first cycle)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Position of the record with this identifier
    pub fn position_of(&self, identifier: &str) -> Option<usize> {
        self.items.iter().position(|c| c.identifier == identifier)
    }

    /// Record with this identifier
    pub fn get(&self, identifier: &str) -> Option<&Classification> {
        self.items.iter().find(|c| c.identifier == identifier)
    }

    /// Record at a position
    pub fn at(&self, position: usize) -> Option<&Classification> {
        self.items.get(position)
    }

    /// Does any record carry this identifier?
    pub fn contains(&self, identifier: &str) -> bool {
        self.position_of(identifier).is_some()
    }

    /// Highest ranked record
    pub fn top(&self) -> Option<&Classification> {
        self.items.first()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Classification> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Classification] {
        &self.items
    }

    /// Identifiers in rank order
    pub fn identifiers(&self) -> Vec<&str> {
        self.items.iter().map(|c| c.identifier.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a ClassificationSequence {
    type Item = &'a Classification;
    type IntoIter = std::slice::Iter<'a, Classification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
