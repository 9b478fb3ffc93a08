use std::fmt;

use serde::Serialize;

use voicegate_templates::MatchResult;

/// Decision for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The best template cleared the category threshold.
    Confident { label: String, confidence: f32 },
    /// The best template fell short; its label is kept for reporting.
    NoMatch { best_label: String, confidence: f32 },
}

impl Outcome {
    /// Applies `threshold` to a match. Confident iff `confidence >= threshold`.
    pub fn from_match(m: &MatchResult, threshold: f32) -> Self {
        if m.confidence >= threshold {
            Outcome::Confident {
                label: m.label.clone(),
                confidence: m.confidence,
            }
        } else {
            Outcome::NoMatch {
                best_label: m.label.clone(),
                confidence: m.confidence,
            }
        }
    }

    pub fn is_confident(&self) -> bool {
        matches!(self, Outcome::Confident { .. })
    }

    /// The accepted label, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Outcome::Confident { label, .. } => Some(label),
            Outcome::NoMatch { .. } => None,
        }
    }

    /// The closest label whether or not it was accepted.
    pub fn best_label(&self) -> &str {
        match self {
            Outcome::Confident { label, .. } => label,
            Outcome::NoMatch { best_label, .. } => best_label,
        }
    }

    pub fn confidence(&self) -> f32 {
        match self {
            Outcome::Confident { confidence, .. } | Outcome::NoMatch { confidence, .. } => {
                *confidence
            }
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Confident { label, confidence } => {
                write!(f, "{label} (confidence {confidence:.3})")
            }
            Outcome::NoMatch {
                best_label,
                confidence,
            } => write!(f, "no match (closest {best_label}, confidence {confidence:.3})"),
        }
    }
}

/// Independent command and speaker outcomes for one recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub command: Outcome,
    pub speaker: Outcome,
    pub command_match: MatchResult,
    pub speaker_match: MatchResult,
}

impl Verdict {
    /// The command to execute: present only when both the command and the
    /// speaker are confident.
    pub fn granted_command(&self) -> Option<&str> {
        if self.speaker.is_confident() {
            self.command.label()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(label: &str, confidence: f32) -> MatchResult {
        MatchResult {
            label: label.into(),
            confidence,
            distance: 2.0 * (1.0 - confidence),
            index: 0,
            runner_up: None,
        }
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(Outcome::from_match(&m("open", 0.9), 0.9).is_confident());
        let o = Outcome::from_match(&m("open", 0.89), 0.9);
        assert_eq!(o.label(), None);
        assert_eq!(o.best_label(), "open");
        assert_eq!(o.confidence(), 0.89);
    }

    #[test]
    fn granted_needs_both() {
        let verdict = |c: f32, s: f32| {
            let (cm, sm) = (m("close", c), m("owner1", s));
            Verdict {
                command: Outcome::from_match(&cm, 0.9),
                speaker: Outcome::from_match(&sm, 0.85),
                command_match: cm,
                speaker_match: sm,
            }
        };
        assert_eq!(verdict(0.95, 0.9).granted_command(), Some("close"));
        assert_eq!(verdict(0.95, 0.5).granted_command(), None);
        assert_eq!(verdict(0.5, 0.9).granted_command(), None);
    }

    #[test]
    fn outcome_json() {
        let o = Outcome::from_match(&m("owner1", 0.5), 0.85);
        let v = serde_json::to_value(&o).unwrap();
        assert_eq!(v["status"], "no_match");
        assert_eq!(v["best_label"], "owner1");
    }
}
