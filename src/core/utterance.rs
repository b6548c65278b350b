//! Utterance Gate: announce the top label unless it was just announced
//!
//! - same text as last time (including both absent) → SUPPRESS, nothing changes
//! - new text → remember it, SPEAK
//! - no text after some text → remember absence, STOP
//!
//! `reset` forgets the last text without going through the comparison, so
//! the same label is announced again after audio is switched back on.

use crate::types::UtteranceAction;

/// De-duplicating speech decision
#[derive(Debug, Default, Clone)]
pub struct UtteranceGate {
    last_spoken: Option<String>,
}

impl UtteranceGate {
    /// Create gate with no memory
    pub fn new() -> Self {
        Self { last_spoken: None }
    }

    /// Decide what to do with this cycle's candidate text
    pub fn decide(&mut self, candidate: Option<&str>) -> UtteranceAction {
        if candidate == self.last_spoken.as_deref() {
            return UtteranceAction::Suppress;
        }

        self.last_spoken = candidate.map(str::to_string);

        match candidate {
            Some(text) => UtteranceAction::Speak(text.to_string()),
            None => UtteranceAction::Stop,
        }
    }

    /// Forget the last text (audio disabled externally)
    pub fn reset(&mut self) {
        self.last_spoken = None;
    }

    /// Last text the gate let through
    pub fn last_spoken(&self) -> Option<&str> {
        self.last_spoken.as_deref()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text_is_spoken() {
        let mut gate = UtteranceGate::new();
        assert_eq!(gate.decide(Some("cat")), UtteranceAction::Speak("cat".into()));
        assert_eq!(gate.last_spoken(), Some("cat"));
    }

    #[test]
    fn test_repeat_is_suppressed() {
        let mut gate = UtteranceGate::new();
        gate.decide(Some("cat"));
        assert_eq!(gate.decide(Some("cat")), UtteranceAction::Suppress);
    }

    #[test]
    fn test_absent_after_text_stops() {
        let mut gate = UtteranceGate::new();
        gate.decide(Some("cat"));
        assert_eq!(gate.decide(None), UtteranceAction::Stop);
        assert_eq!(gate.last_spoken(), None);
    }

    #[test]
    fn test_absent_twice_is_suppressed() {
        let mut gate = UtteranceGate::new();
        // Fresh gate already remembers "nothing"
        assert_eq!(gate.decide(None), UtteranceAction::Suppress);

        gate.decide(Some("cat"));
        gate.decide(None);
        assert_eq!(gate.decide(None), UtteranceAction::Suppress);
    }

    #[test]
    fn test_change_of_label_speaks() {
        let mut gate = UtteranceGate::new();
        gate.decide(Some("cat"));
        assert_eq!(gate.decide(Some("dog")), UtteranceAction::Speak("dog".into()));
        assert_eq!(gate.decide(Some("cat")), UtteranceAction::Speak("cat".into()));
    }

    #[test]
    fn test_reset_allows_repeat() {
        let mut gate = UtteranceGate::new();
        gate.decide(Some("cat"));
        gate.reset();
        assert_eq!(gate.last_spoken(), None);
        assert_eq!(gate.decide(Some("cat")), UtteranceAction::Speak("cat".into()));
    }

    #[test]
    fn test_text_returns_after_stop() {
        let mut gate = UtteranceGate::new();
        gate.decide(Some("cat"));
        gate.decide(None);
        assert_eq!(gate.decide(Some("cat")), UtteranceAction::Speak("cat".into()));
    }
}
