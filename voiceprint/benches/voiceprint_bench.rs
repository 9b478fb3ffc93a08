use criterion::{Criterion, black_box, criterion_group, criterion_main};
use voicegate_voiceprint::{
    FeatureModel, MfccModel, PreprocessConfig, Preprocessor, Recording, VoiceprintConfig,
};

fn make_clip(freq_hz: f32, n_samples: usize, sample_rate: u32) -> Recording {
    let pcm = (0..n_samples)
        .map(|i| {
            if i < n_samples / 5 {
                return 0.0;
            }
            let t = i as f32 / sample_rate as f32;
            0.4 * (freq_hz * 2.0 * std::f32::consts::PI * t).sin()
        })
        .collect();
    Recording::new(pcm, sample_rate)
}

fn bench_preprocess(c: &mut Criterion) {
    let pre = Preprocessor::new(PreprocessConfig::default()).unwrap();
    let clip = make_clip(440.0, 16000 * 2, 16000);

    c.bench_function("voiceprint_preprocess_2s", |b| {
        b.iter(|| {
            let _ = black_box(pre.process(black_box(&clip)));
        });
    });
}

fn bench_preprocess_44k(c: &mut Criterion) {
    let pre = Preprocessor::new(PreprocessConfig::default()).unwrap();
    let clip = make_clip(440.0, 44100 * 2, 44100);

    c.bench_function("voiceprint_preprocess_2s_44k", |b| {
        b.iter(|| {
            let _ = black_box(pre.process(black_box(&clip)));
        });
    });
}

fn bench_model_extract(c: &mut Criterion) {
    let model = MfccModel::new(VoiceprintConfig::default()).unwrap();
    let clip = make_clip(440.0, 16000 * 2, 16000);

    c.bench_function("voiceprint_mfcc_extract_2s", |b| {
        b.iter(|| {
            let _ = black_box(model.extract(black_box(&clip)));
        });
    });
}

criterion_group!(
    benches,
    bench_preprocess,
    bench_preprocess_44k,
    bench_model_extract
);
criterion_main!(benches);
