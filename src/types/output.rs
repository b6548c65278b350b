//! Output structures for each analysed frame

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use colored::Colorize;
use crate::types::{ClassificationSequence, EditScript, UtteranceAction};

/// Width of the confidence bar in terminal output
const BAR_WIDTH: usize = 20;

/// Output structure for each cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleOutput {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Cycle number, starting at 1
    pub cycle: u64,
    /// The new current list
    pub classifications: ClassificationSequence,
    /// Edits from the previous list
    pub edits: EditScript,
    /// Announcement decision, absent while audio is disabled
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub utterance: Option<UtteranceAction>,
}

impl CycleOutput {
    /// Create new output
    pub fn new(
        cycle: u64,
        classifications: ClassificationSequence,
        edits: EditScript,
        utterance: Option<UtteranceAction>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            cycle,
            classifications,
            edits,
            utterance,
        }
    }

    /// Format for terminal display (colors follow `colored`'s global override)
    pub fn to_terminal_string(&self) -> String {
        let mut lines = vec![format!(
            "{} {}",
            format!("#{}", self.cycle).bold(),
            self.edits.summary().dimmed()
        )];

        if self.classifications.is_empty() {
            lines.push(format!("  {}", "(nothing recognised)".dimmed()));
        }

        for (position, c) in self.classifications.iter().enumerate() {
            let inserted = self.edits.insertions.contains(&position);
            let bar = confidence_bar(c.confidence);
            let delta = c.delta();
            let delta_str = if inserted {
                "new".cyan().to_string()
            } else if delta >= 0.0 {
                format!("+{:.2}", delta).green().to_string()
            } else {
                format!("{:.2}", delta).red().to_string()
            };

            lines.push(format!(
                "  {:>2}. {:<24} {} {:.3} ({})",
                position + 1,
                c.identifier,
                bar,
                c.confidence,
                delta_str
            ));
        }

        if let Some(action) = &self.utterance {
            if let UtteranceAction::Speak(text) = action {
                lines.push(format!("  🔊 {}", text.yellow()));
            } else if *action == UtteranceAction::Stop {
                lines.push(format!("  🔇 {}", "stop".dimmed()));
            }
        }

        lines.join("\n")
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        let list = self.classifications
            .iter()
            .map(|c| format!("{}={:.3}", c.identifier, c.confidence))
            .collect::<Vec<_>>()
            .join(",");
        let utterance = self.utterance
            .as_ref()
            .map(|a| a.to_string())
            .unwrap_or_else(|| "MUTED".to_string());

        format!(
            "cycle={} | top=[{}] | edits={} | utterance={}",
            self.cycle,
            list,
            self.edits.summary(),
            utterance
        )
    }
}

/// Render a confidence as a fixed-width bar
fn confidence_bar(confidence: f64) -> String {
    let filled = ((confidence.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!(
        "{}{}",
        "█".repeat(filled).green(),
        "░".repeat(BAR_WIDTH - filled).dimmed()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Classification;

    fn sample() -> CycleOutput {
        let seq = ClassificationSequence::new(vec![
            Classification::new("dog", 0.6, 0.5),
            Classification::new("bird", 0.3, 0.0),
        ]);
        let edits = EditScript {
            insertions: vec![1],
            reloads: vec![0],
            ..Default::default()
        };
        CycleOutput::new(3, seq, edits, Some(UtteranceAction::Speak("dog".into())))
    }

    #[test]
    fn test_parseable_string() {
        let s = sample().to_parseable_string();
        assert!(s.contains("cycle=3"));
        assert!(s.contains("top=[dog=0.600,bird=0.300]"));
        assert!(s.contains("utterance=SPEAK \"dog\""));
    }

    #[test]
    fn test_parseable_string_muted() {
        let mut output = sample();
        output.utterance = None;
        assert!(output.to_parseable_string().ends_with("utterance=MUTED"));
    }

    #[test]
    fn test_terminal_string_lists_every_row() {
        let s = sample().to_terminal_string();
        assert!(s.contains("dog"));
        assert!(s.contains("bird"));
        assert!(s.contains("new"));
    }

    #[test]
    fn test_muted_output_omits_utterance_field() {
        let mut output = sample();
        output.utterance = None;
        let json = serde_json::to_string(&output).unwrap();
        assert!(!json.contains("utterance"));

        let back: CycleOutput = serde_json::from_str(&json).unwrap();
        assert!(back.utterance.is_none());
    }

    #[test]
    fn test_bar_is_clamped() {
        assert_eq!(confidence_bar(1.7).chars().filter(|&c| c == '█').count(), BAR_WIDTH);
        assert_eq!(confidence_bar(-0.2).chars().filter(|&c| c == '█').count(), 0);
    }
}
