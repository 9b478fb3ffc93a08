//! WAV file I/O.

use std::path::Path;

use anyhow::Context;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::debug;

use voicegate_voiceprint::Recording;

/// Reads a WAV file as a mono recording, averaging channels.
pub fn read(path: &Path) -> anyhow::Result<Recording> {
    let mut reader =
        WavReader::open(path).with_context(|| format!("open {}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .with_context(|| format!("decode {}", path.display()))?,
        SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()
                .with_context(|| format!("decode {}", path.display()))?
        }
    };

    let mono: Vec<f32> = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();

    debug!(
        path = %path.display(),
        rate = spec.sample_rate,
        channels,
        bits = spec.bits_per_sample,
        samples = mono.len(),
        "read wav"
    );
    Ok(Recording::new(mono, spec.sample_rate))
}

/// Writes a recording as 16-bit mono PCM.
pub fn write(path: &Path, recording: &Recording) -> anyhow::Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: recording.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer =
        WavWriter::create(path, spec).with_context(|| format!("create {}", path.display()))?;
    for &s in recording.samples() {
        writer.write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_is_downmixed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut w = WavWriter::create(&path, spec).unwrap();
        for _ in 0..100 {
            w.write_sample(16384i16).unwrap();
            w.write_sample(0i16).unwrap();
        }
        w.finalize().unwrap();

        let rec = read(&path).unwrap();
        assert_eq!(rec.sample_rate(), 8000);
        assert_eq!(rec.len(), 100);
        assert!((rec.samples()[0] - 0.25).abs() < 1e-4);
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        let rec = Recording::new(vec![0.0, 0.5, -0.5, 1.0], 16000);
        write(&path, &rec).unwrap();

        let back = read(&path).unwrap();
        assert_eq!(back.sample_rate(), 16000);
        for (a, b) in back.samples().iter().zip(rec.samples()) {
            assert!((a - b).abs() < 1e-3);
        }
    }

    #[test]
    fn missing_file() {
        assert!(read(Path::new("/nonexistent/voicegate.wav")).is_err());
    }
}
