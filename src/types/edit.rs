//! Edit script between two classification sequences

use serde::{Deserialize, Serialize};
use crate::types::ClassificationSequence;

/// A surviving record that changed rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Position in the old sequence
    pub from: usize,
    /// Position in the new sequence
    pub to: usize,
}

/// Structural edits turning the old list into the new one
///
/// Presenters apply deletions and insertions first, then moves, then
/// reloads. A position listed in `moves` is also listed in `reloads`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditScript {
    /// Old positions whose label disappeared (ascending)
    pub deletions: Vec<usize>,
    /// New positions whose label is new (ascending)
    pub insertions: Vec<usize>,
    /// Surviving labels whose position changed (ascending by `to`)
    pub moves: Vec<Move>,
    /// New positions of every surviving label (ascending)
    pub reloads: Vec<usize>,
}

/// Values for the two-stage refresh of a reloaded row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReloadStage {
    pub position: usize,
    pub identifier: String,
    /// Rendered first
    pub from_confidence: f64,
    /// Transitioned to
    pub to_confidence: f64,
}

impl EditScript {
    /// True when no row is deleted, inserted or moved
    pub fn is_structural_noop(&self) -> bool {
        self.deletions.is_empty() && self.insertions.is_empty() && self.moves.is_empty()
    }

    /// Total number of row operations
    pub fn operation_count(&self) -> usize {
        self.deletions.len() + self.insertions.len() + self.moves.len() + self.reloads.len()
    }

    /// Resolve reload positions against the sequence they refer to
    pub fn reload_stages(&self, new: &ClassificationSequence) -> Vec<ReloadStage> {
        self.reloads
            .iter()
            .filter_map(|&position| {
                new.at(position).map(|c| ReloadStage {
                    position,
                    identifier: c.identifier.clone(),
                    from_confidence: c.past_confidence,
                    to_confidence: c.confidence,
                })
            })
            .collect()
    }

    /// Compact one-line summary, e.g. `-[0] +[1] ~[1→0] ↻[0]`
    pub fn summary(&self) -> String {
        let list = |v: &[usize]| {
            v.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(",")
        };
        let moves = self.moves
            .iter()
            .map(|m| format!("{}→{}", m.from, m.to))
            .collect::<Vec<_>>()
            .join(",");

        format!(
            "-[{}] +[{}] ~[{}] ↻[{}]",
            list(&self.deletions),
            list(&self.insertions),
            moves,
            list(&self.reloads)
        )
    }
}
