//! Classification pipeline: one analysis cycle per accepted frame
//!
//! observations → SnapshotBuilder → reconcile(current, new) → UtteranceGate
//!
//! The pipeline owns the "current" sequence; each cycle replaces it with
//! the new one after diffing. Callers serialize cycles (one `&mut self`).

use std::time::Instant;
use tracing::debug;
use crate::config::DemoConfig;
use crate::core::{reconcile, CycleThrottle, SnapshotBuilder, UtteranceGate};
use crate::types::{ClassificationSequence, CycleOutput, EditScript, Observation, UtteranceAction};

/// Pure cycle transition: (previous, observations) → (new, edits)
pub fn advance(
    previous: &ClassificationSequence,
    observations: &[Observation],
    builder: &SnapshotBuilder,
) -> (ClassificationSequence, EditScript) {
    let next = builder.build(observations, previous);
    let edits = reconcile(previous, &next);
    (next, edits)
}

/// Stateful cycle driver
#[derive(Debug)]
pub struct ClassificationPipeline {
    builder: SnapshotBuilder,
    current: ClassificationSequence,
    gate: UtteranceGate,
    throttle: CycleThrottle,
    audio_enabled: bool,
    cycle_count: u64,
}

impl Default for ClassificationPipeline {
    fn default() -> Self {
        Self::new(&DemoConfig::default())
    }
}

impl ClassificationPipeline {
    /// Create pipeline from configuration
    pub fn new(config: &DemoConfig) -> Self {
        Self {
            builder: SnapshotBuilder::from_config(config),
            current: ClassificationSequence::empty(),
            gate: UtteranceGate::new(),
            throttle: CycleThrottle::from_millis(config.analysis_period_ms),
            audio_enabled: config.audio_enabled,
            cycle_count: 0,
        }
    }

    /// Run one cycle unconditionally
    pub fn run_cycle(&mut self, observations: &[Observation]) -> CycleOutput {
        let (next, edits) = advance(&self.current, observations, &self.builder);
        self.current = next;
        self.cycle_count += 1;

        let utterance = if self.audio_enabled {
            let top = self.current.top().map(|c| c.identifier.as_str());
            Some(self.gate.decide(top))
        } else {
            None
        };

        debug!(
            cycle = self.cycle_count,
            observations = observations.len(),
            kept = self.current.len(),
            deletions = edits.deletions.len(),
            insertions = edits.insertions.len(),
            moves = edits.moves.len(),
            reloads = edits.reloads.len(),
            "cycle complete"
        );

        CycleOutput::new(self.cycle_count, self.current.clone(), edits, utterance)
    }

    /// Run a cycle only if the throttle permits one at `now`
    pub fn offer_frame(&mut self, observations: &[Observation], now: Instant) -> Option<CycleOutput> {
        if !self.throttle.try_acquire(now) {
            debug!(cycle = self.cycle_count, "frame skipped by throttle");
            return None;
        }
        Some(self.run_cycle(observations))
    }

    /// Toggle announcements; disabling stops speech and clears the gate
    pub fn set_audio_enabled(&mut self, enabled: bool) -> Option<UtteranceAction> {
        if enabled == self.audio_enabled {
            return None;
        }
        self.audio_enabled = enabled;

        if enabled {
            None
        } else {
            self.gate.reset();
            Some(UtteranceAction::Stop)
        }
    }

    /// Current list
    pub fn current(&self) -> &ClassificationSequence {
        &self.current
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    /// Last announced label
    pub fn last_spoken(&self) -> Option<&str> {
        self.gate.last_spoken()
    }

    /// Reset to an empty list, keeping configuration and audio setting
    pub fn reset(&mut self) {
        self.current = ClassificationSequence::empty();
        self.gate.reset();
        self.throttle.reset();
        self.cycle_count = 0;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn obs(pairs: &[(&str, f64)]) -> Vec<Observation> {
        pairs.iter().map(|&(id, c)| Observation::new(id, c)).collect()
    }

    #[test]
    fn test_initial_state() {
        let pipeline = ClassificationPipeline::default();
        assert!(pipeline.current().is_empty());
        assert_eq!(pipeline.cycle_count(), 0);
        assert!(pipeline.audio_enabled());
    }

    #[test]
    fn test_advance_is_pure() {
        let builder = SnapshotBuilder::new();
        let previous = ClassificationSequence::empty();
        let (a, edits_a) = advance(&previous, &obs(&[("cat", 0.9)]), &builder);
        let (b, edits_b) = advance(&previous, &obs(&[("cat", 0.9)]), &builder);
        assert_eq!(a, b);
        assert_eq!(edits_a, edits_b);
        assert!(previous.is_empty());
    }

    #[test]
    fn test_cycle_replaces_current() {
        let mut pipeline = ClassificationPipeline::default();
        pipeline.run_cycle(&obs(&[("cat", 0.9), ("dog", 0.5)]));
        let output = pipeline.run_cycle(&obs(&[("dog", 0.6), ("bird", 0.3)]));

        assert_eq!(output.cycle, 2);
        assert_eq!(pipeline.current().identifiers(), vec!["dog", "bird"]);
        assert_eq!(output.edits.deletions, vec![0]);
        assert_eq!(pipeline.current().get("dog").map(|c| c.past_confidence), Some(0.5));
    }

    #[test]
    fn test_top_label_is_announced_once() {
        let mut pipeline = ClassificationPipeline::default();
        let first = pipeline.run_cycle(&obs(&[("cat", 0.9)]));
        let second = pipeline.run_cycle(&obs(&[("cat", 0.8)]));
        let third = pipeline.run_cycle(&[]);

        assert_eq!(first.utterance, Some(UtteranceAction::Speak("cat".into())));
        assert_eq!(second.utterance, Some(UtteranceAction::Suppress));
        assert_eq!(third.utterance, Some(UtteranceAction::Stop));
    }

    #[test]
    fn test_muted_pipeline_has_no_utterance() {
        let config = DemoConfig { audio_enabled: false, ..Default::default() };
        let mut pipeline = ClassificationPipeline::new(&config);
        let output = pipeline.run_cycle(&obs(&[("cat", 0.9)]));
        assert!(output.utterance.is_none());
        assert_eq!(pipeline.last_spoken(), None);
    }

    #[test]
    fn test_disable_audio_stops_and_forgets() {
        let mut pipeline = ClassificationPipeline::default();
        pipeline.run_cycle(&obs(&[("cat", 0.9)]));

        assert_eq!(pipeline.set_audio_enabled(false), Some(UtteranceAction::Stop));
        assert_eq!(pipeline.last_spoken(), None);
        // Unchanged setting is a no-op
        assert_eq!(pipeline.set_audio_enabled(false), None);

        assert_eq!(pipeline.set_audio_enabled(true), None);
        let output = pipeline.run_cycle(&obs(&[("cat", 0.9)]));
        assert_eq!(output.utterance, Some(UtteranceAction::Speak("cat".into())));
    }

    #[test]
    fn test_offer_frame_respects_throttle() {
        let mut pipeline = ClassificationPipeline::default();
        let start = Instant::now();

        assert!(pipeline.offer_frame(&obs(&[("cat", 0.9)]), start).is_some());
        assert!(pipeline.offer_frame(&obs(&[("dog", 0.9)]), start + Duration::from_millis(10)).is_none());
        assert_eq!(pipeline.current().identifiers(), vec!["cat"]);

        let output = pipeline.offer_frame(&obs(&[("dog", 0.9)]), start + Duration::from_secs(1));
        assert!(output.is_some());
        assert_eq!(pipeline.cycle_count(), 2);
    }

    #[test]
    fn test_reset() {
        let mut pipeline = ClassificationPipeline::default();
        pipeline.run_cycle(&obs(&[("cat", 0.9)]));
        pipeline.reset();
        assert!(pipeline.current().is_empty());
        assert_eq!(pipeline.cycle_count(), 0);
        assert_eq!(pipeline.last_spoken(), None);
    }
}
