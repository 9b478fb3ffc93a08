//! voicegate - Voice command recognition gated by speaker authorization.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod wav;

use commands::{ConfigCommand, EnrollCommand, PreprocessCommand, TemplatesCommand, TestCommand};

/// voicegate - Voice command recognition gated by speaker authorization.
///
/// Enroll a few takes of each command word ("open", "close") and of each
/// authorized speaker, then test new recordings:
///
///   voicegate enroll command open open1.wav open2.wav open3.wav
///   voicegate enroll speaker owner1 phrase1.wav phrase2.wav phrase3.wav
///   voicegate test clip.wav
///
/// Configuration is stored in ~/.voicegate/config.yaml.
#[derive(Parser)]
#[command(name = "voicegate")]
#[command(about = "Voice command + speaker gate")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.voicegate/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Template store file (overrides the config)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enroll command or speaker templates from WAV files
    Enroll(EnrollCommand),
    /// Match a recording and print the verdict
    Test(TestCommand),
    /// List or remove enrolled templates
    Templates(TemplatesCommand),
    /// Write the cleaned waveform for inspection
    Preprocess(PreprocessCommand),
    /// Manage CLI configuration
    Config(ConfigCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match &cli.command {
        Commands::Enroll(cmd) => cmd.run(&cli),
        Commands::Test(cmd) => cmd.run(&cli),
        Commands::Templates(cmd) => cmd.run(&cli),
        Commands::Preprocess(cmd) => cmd.run(&cli),
        Commands::Config(cmd) => cmd.run(&cli),
    }
}
