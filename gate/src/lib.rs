//! Decision engine pairing command recognition with speaker authorization.
//!
//! ```text
//! Recording ──> FeatureModel ──> FeatureVector ─┬─> Matcher(command) ──> Outcome
//!                                               └─> Matcher(speaker) ──> Outcome
//! ```
//!
//! The vector is extracted once and matched against both template
//! categories. Each [`Outcome`] is confident when its best template's
//! confidence reaches that category's threshold; neither outcome influences
//! the other. [`Verdict::granted_command`] combines them for callers that
//! only act on an authorized command.
//!
//! # Usage
//!
//! ```ignore
//! use voicegate_gate::{Engine, GateConfig};
//! use voicegate_templates::FileStore;
//! use voicegate_voiceprint::{MfccModel, VoiceprintConfig};
//!
//! let engine = Engine::new(
//!     Box::new(MfccModel::new(VoiceprintConfig::default())?),
//!     Box::new(FileStore::open("templates.json")?),
//!     GateConfig::default(),
//! )?;
//! engine.enroll_command("open", &open_take)?;
//! engine.enroll_speaker("owner1", &phrase_take)?;
//!
//! let verdict = engine.evaluate(&clip)?;
//! if let Some(cmd) = verdict.granted_command() {
//!     println!("executing {cmd}");
//! }
//! ```

mod config;
mod engine;
mod error;
mod verdict;

pub use config::GateConfig;
pub use engine::Engine;
pub use error::GateError;
pub use verdict::{Outcome, Verdict};
