//! Speech collaborator seam
//!
//! The gate decides, a `Speaker` performs. Playback itself lives outside
//! this crate; the terminal speaker just prints announcements.

use colored::Colorize;
use crate::types::UtteranceAction;

/// Something that can announce text
pub trait Speaker {
    /// Start a new utterance
    fn speak(&mut self, text: &str);
    /// Halt any in-progress utterance
    fn stop(&mut self);
}

/// Apply a gate decision: SPEAK cancels the current utterance first
pub fn apply_utterance<S: Speaker + ?Sized>(speaker: &mut S, action: &UtteranceAction) {
    match action {
        UtteranceAction::Speak(text) => {
            speaker.stop();
            speaker.speak(text);
        }
        UtteranceAction::Stop => speaker.stop(),
        UtteranceAction::Suppress => {}
    }
}

/// Prints announcements to stdout
#[derive(Debug, Default)]
pub struct TerminalSpeaker {
    speaking: bool,
}

impl TerminalSpeaker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Speaker for TerminalSpeaker {
    fn speak(&mut self, text: &str) {
        self.speaking = true;
        println!("  {} {}", "🔊 says:".yellow(), text.bold());
    }

    fn stop(&mut self) {
        if self.speaking {
            println!("  {}", "🔇 (silence)".dimmed());
        }
        self.speaking = false;
    }
}

/// One call received by a `RecordingSpeaker`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    Spoke(String),
    Stopped,
}

/// Records every call, for tests and headless sessions
#[derive(Debug, Default)]
pub struct RecordingSpeaker {
    events: Vec<SpeechEvent>,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SpeechEvent] {
        &self.events
    }

    /// Texts spoken so far, in order
    pub fn spoken(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SpeechEvent::Spoke(text) => Some(text.as_str()),
                SpeechEvent::Stopped => None,
            })
            .collect()
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&mut self, text: &str) {
        self.events.push(SpeechEvent::Spoke(text.to_string()));
    }

    fn stop(&mut self) {
        self.events.push(SpeechEvent::Stopped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speak_cancels_first() {
        let mut speaker = RecordingSpeaker::new();
        apply_utterance(&mut speaker, &UtteranceAction::Speak("cat".into()));
        assert_eq!(
            speaker.events(),
            &[SpeechEvent::Stopped, SpeechEvent::Spoke("cat".into())]
        );
    }

    #[test]
    fn test_suppress_is_noop() {
        let mut speaker = RecordingSpeaker::new();
        apply_utterance(&mut speaker, &UtteranceAction::Suppress);
        assert!(speaker.events().is_empty());
    }

    #[test]
    fn test_stop_halts() {
        let mut speaker = RecordingSpeaker::new();
        apply_utterance(&mut speaker, &UtteranceAction::Stop);
        assert_eq!(speaker.events(), &[SpeechEvent::Stopped]);
    }

    #[test]
    fn test_dyn_speaker() {
        let mut speaker = RecordingSpeaker::new();
        {
            let dyn_speaker: &mut dyn Speaker = &mut speaker;
            apply_utterance(dyn_speaker, &UtteranceAction::Speak("dog".into()));
        }
        assert_eq!(speaker.spoken(), vec!["dog"]);
    }
}
