use serde::{Deserialize, Serialize};

use voicegate_templates::Metric;

use crate::GateError;

/// Thresholds and distance metric for the decision engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Minimum confidence to accept a command (default: 0.90).
    pub command_threshold: f32,
    /// Minimum confidence to accept a speaker (default: 0.95).
    pub speaker_threshold: f32,
    /// Distance function shared by both categories (default: cosine).
    pub metric: Metric,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            command_threshold: 0.90,
            speaker_threshold: 0.95,
            metric: Metric::Cosine,
        }
    }
}

impl GateConfig {
    pub fn validate(&self) -> Result<(), GateError> {
        for (name, t) in [
            ("command_threshold", self.command_threshold),
            ("speaker_threshold", self.speaker_threshold),
        ] {
            if !(0.0..=1.0).contains(&t) {
                return Err(GateError::Config(format!("{name} {t} is outside [0, 1]")));
            }
        }
        Ok(())
    }
}
