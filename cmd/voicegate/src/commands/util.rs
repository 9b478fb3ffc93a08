//! Shared helpers for commands.

use anyhow::Context;

use voicegate_cli::{Config, load_config};
use voicegate_gate::Engine;
use voicegate_templates::FileStore;
use voicegate_voiceprint::MfccModel;

use crate::Cli;

/// Loads the configuration file.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(cli.config.as_deref())
}

/// Opens the template store named by the flags or config.
pub fn open_store(cli: &Cli, cfg: &Config) -> anyhow::Result<FileStore> {
    let path = cfg.store_path(cli.store.as_deref())?;
    FileStore::open(&path).with_context(|| format!("open template store {}", path.display()))
}

/// Builds the decision engine from config, flags and the template store.
pub fn build_engine(cli: &Cli) -> anyhow::Result<Engine> {
    let cfg = get_config(cli)?;
    let store = open_store(cli, &cfg)?;
    let model = MfccModel::new(cfg.voiceprint.clone()).context("feature pipeline config")?;
    Ok(Engine::new(Box::new(model), Box::new(store), cfg.gate.clone())?)
}

/// Prints the result as pretty JSON or YAML.
pub fn print_result<T: serde::Serialize>(result: &T, as_json: bool) -> anyhow::Result<()> {
    let output = if as_json {
        serde_json::to_string_pretty(result)?
    } else {
        serde_yaml::to_string(result)?
    };
    println!("{}", output.trim_end());
    Ok(())
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}

/// Prints error message.
pub fn print_error(msg: &str) {
    eprintln!("\x1b[31m✗\x1b[0m {}", msg);
}
