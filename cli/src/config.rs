//! Configuration management for the voicegate CLI.
//!
//! Configuration is stored in ~/.voicegate/config.yaml. Every field has a
//! default, so a partial file only overrides what it names.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use voicegate_gate::GateConfig;
use voicegate_voiceprint::VoiceprintConfig;

use crate::paths::Paths;

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Template store file (default: ~/.voicegate/data/templates.json).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<PathBuf>,

    /// Decision thresholds and metric.
    pub gate: GateConfig,

    /// Preprocessing and feature extraction tuning.
    pub voiceprint: VoiceprintConfig,

    /// Path to the config file (not serialized).
    #[serde(skip)]
    config_path: PathBuf,
}

impl Config {
    /// Gets the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Paths::new().ok().map(|p| p.config_file())
    }

    /// Returns the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Resolves the template store path: the override if given, then the
    /// configured path, then the default data path.
    pub fn store_path(&self, override_path: Option<&Path>) -> anyhow::Result<PathBuf> {
        if let Some(p) = override_path {
            return Ok(p.to_path_buf());
        }
        if let Some(p) = &self.store {
            return Ok(p.clone());
        }
        Ok(Paths::new()?.store_file())
    }

    /// Saves the configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        save_config(self, Some(&self.config_path))
    }
}

fn resolve_path(custom_path: Option<&Path>) -> anyhow::Result<PathBuf> {
    match custom_path {
        Some(p) => Ok(p.to_path_buf()),
        None => Config::default_config_path()
            .ok_or_else(|| anyhow::anyhow!("cannot determine config path")),
    }
}

/// Loads configuration, creating a default file if none exists.
pub fn load_config(custom_path: Option<&Path>) -> anyhow::Result<Config> {
    let config_path = resolve_path(custom_path)?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut cfg = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content).map_err(|e| {
                anyhow::anyhow!("invalid config {}: {}", config_path.display(), e)
            })?
        }
    } else {
        let cfg = Config::default();
        let content = serde_yaml::to_string(&cfg)?;
        std::fs::write(&config_path, content)?;
        cfg
    };

    cfg.config_path = config_path;
    Ok(cfg)
}

/// Saves configuration to the specified path.
pub fn save_config(config: &Config, custom_path: Option<&Path>) -> anyhow::Result<()> {
    let config_path = resolve_path(custom_path)?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_yaml::to_string(config)?;
    std::fs::write(&config_path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use voicegate_gate::GateConfig;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.yaml");

        let cfg = load_config(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.path(), path.as_path());
        assert_eq!(cfg.gate, GateConfig::default());
        assert_eq!(cfg.voiceprint, VoiceprintConfig::default());
        assert!(cfg.store.is_none());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "store: /tmp/vg/templates.json\ngate:\n  speaker_threshold: 0.8\nvoiceprint:\n  preprocess:\n    trim_top_db: 30\n",
        )
        .unwrap();

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.store, Some(PathBuf::from("/tmp/vg/templates.json")));
        assert_eq!(cfg.gate.speaker_threshold, 0.8);
        assert_eq!(cfg.gate.command_threshold, 0.90);
        assert_eq!(cfg.voiceprint.preprocess.trim_top_db, 30.0);
        assert_eq!(cfg.voiceprint.preprocess.sample_rate, 16000);
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut cfg = load_config(Some(&path)).unwrap();
        cfg.gate.command_threshold = 0.75;
        cfg.voiceprint.preprocess.denoise = None;
        cfg.save().unwrap();

        let back = load_config(Some(&path)).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn store_path_precedence() {
        let mut cfg = Config::default();
        let flag = PathBuf::from("/flag/templates.json");
        assert_eq!(cfg.store_path(Some(&flag)).unwrap(), flag);

        cfg.store = Some(PathBuf::from("/configured.json"));
        assert_eq!(cfg.store_path(None).unwrap(), PathBuf::from("/configured.json"));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "gate: [1, 2").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }
}
