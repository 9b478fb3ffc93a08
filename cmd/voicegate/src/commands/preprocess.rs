//! Dump the cleaned waveform.

use std::path::PathBuf;

use clap::Args;

use voicegate_voiceprint::MfccModel;

use super::{get_config, print_success};
use crate::{Cli, wav};

/// Run the preprocessor on a WAV file and write the result.
///
/// The output is exactly what feature extraction sees: resampled,
/// normalized, denoised, trimmed and padded to the canonical length.
#[derive(Args)]
pub struct PreprocessCommand {
    /// Input WAV file
    input: PathBuf,
    /// Output WAV file
    output: PathBuf,
}

impl PreprocessCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let model = MfccModel::new(cfg.voiceprint)?;

        let recording = wav::read(&self.input)?;
        let clean = model.preprocessor().process(&recording)?;
        wav::write(&self.output, &clean)?;

        print_success(&format!(
            "{} -> {} ({:.2}s at {} Hz)",
            self.input.display(),
            self.output.display(),
            clean.duration().as_secs_f32(),
            clean.sample_rate()
        ));
        Ok(())
    }
}
