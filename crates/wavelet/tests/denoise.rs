//! Integration tests for the padded denoising passes.

use std::f64::consts::PI;

use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use ecgann_wavelet::{Denoiser, FilterDir, Shrinkage, ThresholdRule};

fn filters() -> FilterDir {
    FilterDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../../filters"))
}

fn sine(n: usize, freq: f64, sr: f64) -> Vec<f64> {
    (0..n).map(|i| (2.0 * PI * freq * i as f64 / sr).sin()).collect()
}

fn rms(a: &[f64], b: &[f64]) -> f64 {
    let ss: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
    (ss / a.len() as f64).sqrt()
}

/// 10 Hz tone riding on a 5.0 offset plus a slow 0.1 Hz drift.
fn drifting_tone() -> Vec<f64> {
    let sr = 100.0;
    sine(1080, 10.0, sr)
        .iter()
        .zip(sine(1080, 0.1, sr))
        .map(|(s, d)| s + 5.0 + 0.5 * d)
        .collect()
}

#[test]
fn lf_denoise_removes_offset() {
    let mut data = drifting_tone();
    Denoiser::new(100.0, filters()).lf_denoise(&mut data).unwrap();
    let mean = data.iter().sum::<f64>() / data.len() as f64;
    assert_abs_diff_eq!(mean, 0.0, epsilon = 0.01);

    let tone = sine(1080, 10.0, 100.0);
    for i in 100..980 {
        assert_abs_diff_eq!(data[i], tone[i], epsilon = 0.1);
    }
}

#[test]
fn lf_denoise_is_idempotent() {
    let original = drifting_tone();
    let denoiser = Denoiser::new(100.0, filters());

    let mut once = original.clone();
    denoiser.lf_denoise(&mut once).unwrap();
    let mut twice = once.clone();
    denoiser.lf_denoise(&mut twice).unwrap();

    let first = original
        .iter()
        .zip(&once)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max);
    let second = once
        .iter()
        .zip(&twice)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max);
    assert!(first > 4.0, "first pass changed {first}");
    assert!(second < 0.05, "second pass changed {second}");
}

#[test]
fn hf_denoise_reduces_white_noise() {
    let sr = 250.0;
    let clean = sine(1000, 5.0, sr);
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let normal = Normal::new(0.0, 0.3).unwrap();
    let noisy: Vec<f64> = clean.iter().map(|c| c + normal.sample(&mut rng)).collect();

    let mut out = noisy.clone();
    Denoiser::new(sr, filters()).hf_denoise(&mut out).unwrap();
    assert!(
        rms(&out, &clean) < 0.75 * rms(&noisy, &clean),
        "before {} after {}",
        rms(&noisy, &clean),
        rms(&out, &clean)
    );
}

#[test]
fn hard_shrinkage_is_selectable() {
    let sr = 250.0;
    let mut rng = rand::rngs::StdRng::seed_from_u64(5);
    let normal = Normal::new(0.0, 0.3).unwrap();
    let noisy: Vec<f64> = sine(1000, 5.0, sr)
        .iter()
        .map(|c| c + normal.sample(&mut rng))
        .collect();

    let mut soft = noisy.clone();
    Denoiser::new(sr, filters()).hf_denoise(&mut soft).unwrap();
    let mut hard = noisy.clone();
    Denoiser::new(sr, filters())
        .with_threshold(ThresholdRule::Fixed)
        .with_shrinkage(Shrinkage::Hard)
        .hf_denoise(&mut hard)
        .unwrap();
    assert_ne!(soft, hard);
}

#[test]
fn lfhf_preserves_baseline_free_range() {
    let sr = 100.0;
    let mut reference = drifting_tone();
    Denoiser::new(sr, filters()).lf_denoise(&mut reference).unwrap();
    let lo = reference.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = reference.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut data = drifting_tone();
    Denoiser::new(sr, filters()).lfhf_denoise(&mut data).unwrap();
    let out_lo = data.iter().copied().fold(f64::INFINITY, f64::min);
    let out_hi = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert_abs_diff_eq!(out_lo, lo, epsilon = 1e-9);
    assert_abs_diff_eq!(out_hi, hi, epsilon = 1e-9);
}

#[test]
fn flat_signal_stays_flat() {
    let mut data = vec![0.0; 600];
    Denoiser::new(250.0, filters()).lfhf_denoise(&mut data).unwrap();
    assert!(data.iter().all(|&v| v == 0.0));
}
