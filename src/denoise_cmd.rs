//! Denoise command: strip baseline wander and/or high-frequency noise.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use ecgann_io::{read_text_signal, write_signal};
use ecgann_wavelet::{Denoiser, FilterDir, WaveletError};

use crate::cli::DenoiseArgs;
use crate::config::EcgannConfig;
use crate::convert::{self, DenoiseMode};

/// Applies `mode` to `data` in place.
pub fn apply(denoiser: &Denoiser, mode: DenoiseMode, data: &mut [f64]) -> Result<(), WaveletError> {
    match mode {
        DenoiseMode::Lf => denoiser.lf_denoise(data),
        DenoiseMode::Hf => denoiser.hf_denoise(data),
        DenoiseMode::LfHf => denoiser.lfhf_denoise(data),
    }
}

/// Run the denoise pipeline on one signal.
pub fn run(args: DenoiseArgs) -> Result<()> {
    let _cmd = info_span!("denoise").entered();
    let config = EcgannConfig::load(&args.config)?;

    let mode = convert::parse_denoise_mode(args.mode.as_deref().unwrap_or(&config.denoise.mode))?;
    let sample_rate = args.sample_rate.unwrap_or(config.signal.sample_rate);
    let lead = args.lead.unwrap_or(config.signal.lead);
    let filters = FilterDir::new(args.filters.unwrap_or_else(|| config.filters.dir.clone()));
    let denoiser = convert::build_denoiser(&config.denoise, sample_rate, filters)?;

    let mut data = read_text_signal(&args.input, lead)
        .with_context(|| format!("failed to read signal: {}", args.input.display()))?;
    info!(path = %args.input.display(), samples = data.len(), ?mode, "denoising");

    apply(&denoiser, mode, &mut data).context("denoising failed")?;

    write_signal(&args.output, &data)
        .with_context(|| format!("failed to write signal: {}", args.output.display()))?;
    info!(path = %args.output.display(), "denoised signal written");
    Ok(())
}
