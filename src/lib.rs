//! VisionToy: ranked classification list reconciliation
//!
//! Frame observations → SnapshotBuilder → reconcile → edit script,
//! with the top label flowing through the UtteranceGate.

pub mod config;
pub mod core;
pub mod error;
pub mod types;

// =============================================================================
// SNAPSHOT BUILDER
// =============================================================================

/// Number of raw classifier observations considered per frame
/// The classifier delivers pre-ranked output, the tail is noise
pub const MAX_CANDIDATES: usize = 11;

/// Observations below this confidence are discarded
pub const MIN_CONFIDENCE: f64 = 0.1;

// =============================================================================
// CYCLE CADENCE
// =============================================================================

/// Minimum time between two analysed frames (milliseconds)
pub const ANALYSIS_PERIOD_MS: u64 = 1000;

/// Duration of the past → current confidence transition (milliseconds)
pub const RELOAD_TRANSITION_MS: u64 = 1000;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
