//! Core types for VisionToy

mod classification;
mod edit;
mod utterance;
mod output;

pub use classification::{Observation, Classification, ClassificationSequence};
pub use edit::{EditScript, Move, ReloadStage};
pub use utterance::UtteranceAction;
pub use output::CycleOutput;
