//! Enrolled voice templates and nearest-template matching.
//!
//! Templates are grouped by [`Category`]: `command` templates answer "which
//! word was spoken", `speaker` templates answer "who spoke it". The two are
//! stored and matched independently.
//!
//! # Usage
//!
//! ```
//! use voicegate_templates::{Category, Matcher, MemoryStore, Metric, TemplateStore};
//! use voicegate_voiceprint::FeatureVector;
//!
//! let store = MemoryStore::new();
//! store.enroll(Category::Command, "open", FeatureVector::new(vec![1.0, 0.0])).unwrap();
//! store.enroll(Category::Command, "close", FeatureVector::new(vec![0.0, 1.0])).unwrap();
//!
//! let query = FeatureVector::new(vec![0.9, 0.1]);
//! let m = Matcher::new(Metric::Cosine).best(&store, Category::Command, &query).unwrap();
//! assert_eq!(m.label, "open");
//! ```
//!
//! # Design
//!
//! The store never merges or deduplicates: every enrollment appends one
//! template, and the matcher picks the single closest one. Ties go to the
//! template enrolled first.

mod error;
mod file;
mod matcher;
mod store;
mod template;

pub use error::TemplateError;
pub use file::{FORMAT_VERSION, FileStore};
pub use matcher::{MatchResult, Matcher, Metric, Ranked, cosine_distance, euclidean_distance};
pub use store::{MemoryStore, TemplateStore};
pub use template::{COMMAND_LABELS, Category, Template};
