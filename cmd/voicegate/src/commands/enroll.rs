//! Enrollment commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use voicegate_templates::Category;

use super::{build_engine, print_error, print_success};
use crate::{Cli, wav};

/// Enroll templates from WAV files.
///
/// Each file becomes one template. Record three or more takes per label in
/// the conditions the gate will be used in.
#[derive(Args)]
pub struct EnrollCommand {
    #[command(subcommand)]
    command: EnrollSubcommand,
}

#[derive(Subcommand)]
enum EnrollSubcommand {
    /// Enroll takes of a command word
    Command {
        /// Command word: open or close
        label: String,
        /// WAV files, one take each
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Enroll takes of an authorized speaker
    Speaker {
        /// Speaker name (e.g. owner1)
        label: String,
        /// WAV files, one take each
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

impl EnrollCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let (category, label, files) = match &self.command {
            EnrollSubcommand::Command { label, files } => (Category::Command, label, files),
            EnrollSubcommand::Speaker { label, files } => (Category::Speaker, label, files),
        };
        let engine = build_engine(cli)?;

        let mut failed = 0;
        for path in files {
            let result = wav::read(path).and_then(|rec| {
                Ok(match category {
                    Category::Command => engine.enroll_command(label, &rec)?,
                    Category::Speaker => engine.enroll_speaker(label, &rec)?,
                })
            });
            match result {
                Ok(idx) => print_success(&format!(
                    "{}: enrolled as {category} \"{label}\" (#{idx})",
                    path.display()
                )),
                Err(e) => {
                    print_error(&format!("{}: {e:#}", path.display()));
                    failed += 1;
                }
            }
        }
        if failed > 0 {
            anyhow::bail!("{failed} of {} files failed to enroll", files.len());
        }
        Ok(())
    }
}
