use std::f32::consts::PI;
use std::path::Path;
use std::process::{Command, Output};

use hound::{SampleFormat, WavSpec, WavWriter};

const RATE: u32 = 16000;

/// Two seconds: a harmonic-rich 150 Hz voice in the middle second.
fn write_clip(path: &Path) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut w = WavWriter::create(path, spec).unwrap();
    for i in 0..RATE as usize * 2 {
        let mut v = 0.0f32;
        if (8000..24000).contains(&i) {
            let t = i as f32 / RATE as f32;
            for h in 1..20 {
                let f = 150.0 * h as f32;
                let amp = 1.0 + 2.0 * (-((f - 700.0) / 200.0).powi(2)).exp();
                v += amp * (2.0 * PI * f * t).sin() / h as f32;
            }
            v *= 0.1;
        }
        w.write_sample((v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
            .unwrap();
    }
    w.finalize().unwrap();
}

fn voicegate(dir: &Path, args: &[&str]) -> Output {
    let out = Command::new(env!("CARGO_BIN_EXE_voicegate"))
        .arg("--config")
        .arg(dir.join("config.yaml"))
        .arg("--store")
        .arg(dir.join("templates.json"))
        .args(args)
        .output()
        .unwrap();
    assert!(
        out.status.success(),
        "voicegate {args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    out
}

#[test]
fn verbose_json_keeps_logs_off_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let clip = dir.path().join("open.wav");
    write_clip(&clip);
    let clip = clip.to_str().unwrap();

    voicegate(dir.path(), &["enroll", "command", "open", clip]);
    voicegate(dir.path(), &["enroll", "speaker", "owner1", clip]);

    let out = voicegate(dir.path(), &["-v", "test", clip, "--json"]);
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["granted"], "open");
    assert_eq!(report["command"]["status"], "confident");
    assert!(String::from_utf8_lossy(&out.stderr).contains("DEBUG"));
}
