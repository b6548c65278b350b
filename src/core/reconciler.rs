//! List Reconciler: edit script between two ordered classification sequences
//!
//! Matching is by identifier only. Four independent passes:
//! - deletions: old positions absent from new
//! - insertions: new positions absent from old
//! - reloads: new positions present in old
//! - moves: (old, new) for labels present in both whose position changed
//!
//! Every output collection is ascending (moves by new position).

use std::collections::HashMap;
use crate::types::{ClassificationSequence, EditScript, Move};

/// Compute the edits turning `old` into `new`
pub fn reconcile(old: &ClassificationSequence, new: &ClassificationSequence) -> EditScript {
    let old_index = index_by_identifier(old);
    let new_index = index_by_identifier(new);

    let deletions = old
        .iter()
        .enumerate()
        .filter(|(_, c)| !new_index.contains_key(c.identifier.as_str()))
        .map(|(position, _)| position)
        .collect();

    let insertions = new
        .iter()
        .enumerate()
        .filter(|(_, c)| !old_index.contains_key(c.identifier.as_str()))
        .map(|(position, _)| position)
        .collect();

    let mut reloads = Vec::new();
    let mut moves = Vec::new();

    for (to, c) in new.iter().enumerate() {
        if let Some(&from) = old_index.get(c.identifier.as_str()) {
            reloads.push(to);
            if from != to {
                moves.push(Move { from, to });
            }
        }
    }

    EditScript {
        deletions,
        insertions,
        moves,
        reloads,
    }
}

/// Identifier → first position
fn index_by_identifier(seq: &ClassificationSequence) -> HashMap<&str, usize> {
    let mut index = HashMap::with_capacity(seq.len());
    for (position, c) in seq.iter().enumerate() {
        index.entry(c.identifier.as_str()).or_insert(position);
    }
    index
}

// =============================================================================
// TESTS
// =============================================================================
