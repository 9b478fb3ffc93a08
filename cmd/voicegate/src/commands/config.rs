//! Configuration management commands.

use clap::{Args, Subcommand};

use voicegate_cli::{Config, save_config};

use super::{get_config, print_result, print_success};
use crate::Cli;

/// Manage CLI configuration.
///
/// Configuration is stored in ~/.voicegate/config.yaml
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Print the effective configuration
    #[command(alias = "view")]
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a configuration file with every default filled in
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ConfigSubcommand::Show { json } => {
                let cfg = get_config(cli)?;
                eprintln!("# {}", cfg.path().display());
                eprintln!("# store: {}", cfg.store_path(cli.store.as_deref())?.display());
                print_result(&cfg, *json)
            }

            ConfigSubcommand::Init { force } => {
                let path = match &cli.config {
                    Some(p) => p.clone(),
                    None => Config::default_config_path()
                        .ok_or_else(|| anyhow::anyhow!("cannot determine config path"))?,
                };
                if path.exists() && !force {
                    anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
                }
                save_config(&Config::default(), Some(&path))?;
                print_success(&format!("Wrote default configuration to {}", path.display()));
                Ok(())
            }
        }
    }
}
