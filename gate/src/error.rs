use thiserror::Error;

use voicegate_templates::TemplateError;
use voicegate_voiceprint::VoiceprintError;

/// Errors returned by the decision engine.
#[derive(Debug, Error)]
pub enum GateError {
    #[error(transparent)]
    Voiceprint(#[from] VoiceprintError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("invalid config: {0}")]
    Config(String),
}
