use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use voicegate_voiceprint::FeatureVector;

use crate::TemplateError;

/// The closed command vocabulary.
pub const COMMAND_LABELS: [&str; 2] = ["open", "close"];

/// Which question a template answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// What word was spoken.
    Command,
    /// Who spoke it.
    Speaker,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Command, Category::Speaker];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Command => "command",
            Category::Speaker => "speaker",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "command" => Ok(Category::Command),
            "speaker" => Ok(Category::Speaker),
            "" => Err(TemplateError::InvalidTemplate("empty category".into())),
            other => Err(TemplateError::InvalidTemplate(format!(
                "unknown category {other:?}"
            ))),
        }
    }
}

/// An enrolled reference vector and its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub label: String,
    pub features: FeatureVector,
}

impl Template {
    pub fn new(label: impl Into<String>, features: FeatureVector) -> Self {
        Self {
            label: label.into(),
            features,
        }
    }
}

/// Checks the parts of a template that do not depend on store contents.
pub(crate) fn validate(label: &str, features: &FeatureVector) -> Result<(), TemplateError> {
    if label.trim().is_empty() {
        return Err(TemplateError::InvalidTemplate("empty label".into()));
    }
    if features.is_empty() {
        return Err(TemplateError::InvalidTemplate(format!(
            "empty feature vector for {label:?}"
        )));
    }
    if !features.is_finite() {
        return Err(TemplateError::InvalidTemplate(format!(
            "non-finite feature value for {label:?}"
        )));
    }
    Ok(())
}
