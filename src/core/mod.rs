//! Core modules for VisionToy

pub mod snapshot;
pub mod reconciler;
pub mod utterance;
pub mod throttle;
pub mod pipeline;
pub mod speech;
pub mod feed_parser;
pub mod api;

pub use snapshot::SnapshotBuilder;
pub use reconciler::reconcile;
pub use utterance::UtteranceGate;
pub use throttle::CycleThrottle;
pub use pipeline::{ClassificationPipeline, advance};
pub use speech::{Speaker, TerminalSpeaker, RecordingSpeaker, SpeechEvent, apply_utterance};
pub use feed_parser::ObservationParser;
pub use api::{create_router, run_server};
