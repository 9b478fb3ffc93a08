//! CLI utilities for voicegate.
//!
//! Configuration lives in `~/.voicegate/config.yaml`; enrolled templates
//! default to `~/.voicegate/data/templates.json`.

pub mod config;
pub mod paths;

pub use config::{Config, load_config, save_config};
pub use paths::Paths;
