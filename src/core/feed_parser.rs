//! Feed parser: classifier output from text lines or JSON frames
//!
//! Text form, one frame per line:
//!   `tabby, tabby cat:0.62; Egyptian cat=0.21`
//! Labels may contain spaces and commas but not `:`, `=` or `;`.
//! An empty line is a frame where nothing was recognised.
//!
//! JSON form: `[{"identifier":"cat","confidence":0.6}]` or
//! `{"observations":[...]}`.

use std::io::BufRead;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use tracing::warn;
use crate::error::FeedError;
use crate::types::Observation;

lazy_static! {
    /// `label : value`, label stops at the first separator character
    static ref RE_ENTRY: Regex = Regex::new(
        r"(?P<label>[^:=;]+?)\s*[:=]\s*(?P<value>[^,;\s]+)"
    ).unwrap();
}

/// Characters allowed between entries
fn is_separator(c: char) -> bool {
    c == ',' || c == ';' || c.is_whitespace()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonFrame {
    List(Vec<Observation>),
    Wrapped { observations: Vec<Observation> },
}

/// Parser for classifier frames
#[derive(Debug, Default)]
pub struct ObservationParser;

impl ObservationParser {
    /// Create new parser
    pub fn new() -> Self {
        Self
    }

    /// Parse one frame, JSON if it looks like JSON, text otherwise
    pub fn parse_frame(&self, line: &str) -> Result<Vec<Observation>, FeedError> {
        let trimmed = line.trim();
        if trimmed.starts_with('[') || trimmed.starts_with('{') {
            self.parse_json(trimmed)
        } else {
            self.parse_text(trimmed)
        }
    }

    /// Parse a `label:confidence` list
    pub fn parse_text(&self, line: &str) -> Result<Vec<Observation>, FeedError> {
        let line = line.trim();
        let mut observations = Vec::new();
        let mut consumed = 0;

        for caps in RE_ENTRY.captures_iter(line) {
            let whole = caps.get(0).map(|m| m.end()).unwrap_or(consumed);
            consumed = whole;

            let label = caps["label"].trim_matches(is_separator);
            let value = &caps["value"];

            if label.is_empty() {
                return Err(FeedError::MalformedEntry(caps[0].trim().to_string()));
            }

            let confidence: f64 = value.parse().map_err(|_| FeedError::InvalidConfidence {
                label: label.to_string(),
                value: value.to_string(),
            })?;

            observations.push(Observation::new(label, confidence));
        }

        let rest = line[consumed..].trim_matches(is_separator);
        if !rest.is_empty() {
            return Err(FeedError::MalformedEntry(rest.to_string()));
        }

        Ok(observations)
    }

    /// Parse a JSON frame
    pub fn parse_json(&self, text: &str) -> Result<Vec<Observation>, FeedError> {
        let frame: JsonFrame = serde_json::from_str(text)?;
        Ok(match frame {
            JsonFrame::List(observations) => observations,
            JsonFrame::Wrapped { observations } => observations,
        })
    }

    /// Read every frame of a replay feed; `#` lines are comments
    pub fn read_frames<R: BufRead>(&self, reader: R) -> Result<Vec<Vec<Observation>>, FeedError> {
        let mut frames = Vec::new();
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim_start().starts_with('#') {
                continue;
            }
            match self.parse_frame(&line) {
                Ok(frame) => frames.push(frame),
                Err(e) => {
                    warn!(line = number + 1, error = %e, "rejected feed line");
                    return Err(e);
                }
            }
        }
        Ok(frames)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_line_is_empty_frame() {
        let parser = ObservationParser::new();
        assert!(parser.parse_frame("").unwrap().is_empty());
        assert!(parser.parse_frame("   ").unwrap().is_empty());
    }

    #[test]
    fn test_simple_pairs() {
        let parser = ObservationParser::new();
        let frame = parser.parse_frame("dog:0.6, bird:0.3").unwrap();
        assert_eq!(frame, vec![Observation::new("dog", 0.6), Observation::new("bird", 0.3)]);
    }

    #[test]
    fn test_labels_with_spaces_and_commas() {
        let parser = ObservationParser::new();
        let frame = parser.parse_frame("tabby, tabby cat:0.62; Egyptian cat = 0.21").unwrap();
        assert_eq!(
            frame,
            vec![
                Observation::new("tabby, tabby cat", 0.62),
                Observation::new("Egyptian cat", 0.21),
            ]
        );
    }

    #[test]
    fn test_invalid_number() {
        let parser = ObservationParser::new();
        let err = parser.parse_frame("dog:high").unwrap_err();
        assert!(matches!(err, FeedError::InvalidConfidence { ref label, .. } if label == "dog"));
    }

    #[test]
    fn test_trailing_label_without_value() {
        let parser = ObservationParser::new();
        let err = parser.parse_frame("dog:0.5, cat").unwrap_err();
        assert!(matches!(err, FeedError::MalformedEntry(ref s) if s == "cat"));
    }

    #[test]
    fn test_missing_label() {
        let parser = ObservationParser::new();
        assert!(parser.parse_frame(",:0.5").is_err());
    }

    #[test]
    fn test_json_list() {
        let parser = ObservationParser::new();
        let frame = parser
            .parse_frame(r#"[{"identifier":"cat","confidence":0.9}]"#)
            .unwrap();
        assert_eq!(frame, vec![Observation::new("cat", 0.9)]);
    }

    #[test]
    fn test_json_wrapped() {
        let parser = ObservationParser::new();
        let frame = parser
            .parse_frame(r#"{"observations":[{"identifier":"dog","confidence":0.4}]}"#)
            .unwrap();
        assert_eq!(frame, vec![Observation::new("dog", 0.4)]);
    }

    #[test]
    fn test_bad_json() {
        let parser = ObservationParser::new();
        assert!(matches!(parser.parse_frame("[{oops"), Err(FeedError::Json(_))));
    }

    #[test]
    fn test_read_frames_skips_comments() {
        let parser = ObservationParser::new();
        let feed = "# warmup\ncat:0.9\n\ndog:0.5\n";
        let frames = parser.read_frames(feed.as_bytes()).unwrap();
        assert_eq!(frames.len(), 3);
        assert!(frames[1].is_empty());
        assert_eq!(frames[2], vec![Observation::new("dog", 0.5)]);
    }
}
