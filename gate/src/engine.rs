use tracing::{debug, info, warn};

use voicegate_templates::{
    COMMAND_LABELS, Category, Matcher, Ranked, TemplateError, TemplateStore,
};
use voicegate_voiceprint::{FeatureModel, FeatureVector, Recording};

use crate::{GateConfig, GateError, Outcome, Verdict};

/// Enrolls templates and turns recordings into [`Verdict`]s.
///
/// Enrollment and evaluation share one [`FeatureModel`], so stored and
/// queried vectors are always comparable. The command and speaker outcomes
/// are decided independently against their own thresholds.
pub struct Engine {
    model: Box<dyn FeatureModel>,
    store: Box<dyn TemplateStore>,
    matcher: Matcher,
    cfg: GateConfig,
}

impl Engine {
    pub fn new(
        model: Box<dyn FeatureModel>,
        store: Box<dyn TemplateStore>,
        cfg: GateConfig,
    ) -> Result<Self, GateError> {
        cfg.validate()?;
        Ok(Self {
            model,
            store,
            matcher: Matcher::new(cfg.metric),
            cfg,
        })
    }

    pub fn config(&self) -> &GateConfig {
        &self.cfg
    }

    pub fn store(&self) -> &dyn TemplateStore {
        self.store.as_ref()
    }

    /// Enrolls one sample of a command word. `label` must be in [`COMMAND_LABELS`].
    pub fn enroll_command(&self, label: &str, recording: &Recording) -> Result<usize, GateError> {
        let label = label.trim();
        if !COMMAND_LABELS.contains(&label) {
            return Err(TemplateError::InvalidTemplate(format!(
                "unknown command {label:?}, expected one of {COMMAND_LABELS:?}"
            ))
            .into());
        }
        self.enroll(Category::Command, label, recording)
    }

    /// Enrolls one sample of an authorized speaker.
    pub fn enroll_speaker(&self, label: &str, recording: &Recording) -> Result<usize, GateError> {
        self.enroll(Category::Speaker, label, recording)
    }

    fn enroll(
        &self,
        category: Category,
        label: &str,
        recording: &Recording,
    ) -> Result<usize, GateError> {
        if label.trim().is_empty() {
            return Err(TemplateError::InvalidTemplate("empty label".into()).into());
        }
        let features = self.model.extract(recording)?;
        let idx = self.store.enroll(category, label, features)?;
        info!(%category, label, idx, "enrollment complete");
        Ok(idx)
    }

    /// Extracts the feature vector of a recording.
    pub fn extract(&self, recording: &Recording) -> Result<FeatureVector, GateError> {
        Ok(self.model.extract(recording)?)
    }

    /// Runs the feature model once and decides both outcomes.
    pub fn evaluate(&self, recording: &Recording) -> Result<Verdict, GateError> {
        let features = self.model.extract(recording)?;
        self.decide(&features)
    }

    /// Same as [`Engine::evaluate`].
    pub fn test_recording(&self, recording: &Recording) -> Result<Verdict, GateError> {
        self.evaluate(recording)
    }

    /// Decides both outcomes for an already extracted vector.
    pub fn decide(&self, features: &FeatureVector) -> Result<Verdict, GateError> {
        let store = self.store.as_ref();
        let command_match = self.matcher.best(store, Category::Command, features)?;
        let speaker_match = self.matcher.best(store, Category::Speaker, features)?;

        let command = Outcome::from_match(&command_match, self.cfg.command_threshold);
        let speaker = Outcome::from_match(&speaker_match, self.cfg.speaker_threshold);
        if command.is_confident() && !speaker.is_confident() {
            warn!(
                command = command.best_label(),
                speaker = speaker.best_label(),
                confidence = speaker.confidence(),
                "command recognized from unrecognized speaker"
            );
        }
        debug!(%command, %speaker, "verdict");

        Ok(Verdict {
            command,
            speaker,
            command_match,
            speaker_match,
        })
    }

    /// Every template of `category` scored against `features`, best first.
    pub fn rank(
        &self,
        category: Category,
        features: &FeatureVector,
    ) -> Result<Vec<Ranked>, GateError> {
        Ok(self.matcher.rank(self.store.as_ref(), category, features)?)
    }
}
