use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ecgann single-lead ECG annotator.
#[derive(Parser)]
#[command(
    name = "ecgann",
    version,
    about = "Wavelet-based single-lead ECG annotator"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Annotate QRS complexes, ectopic beats and P/T waves.
    Annotate(AnnotateArgs),
    /// Remove baseline wander and/or high-frequency noise from a signal.
    Denoise(DenoiseArgs),
    /// Print the listing of a binary annotation file.
    Decode(DecodeArgs),
}

/// Arguments for the `annotate` subcommand.
#[derive(clap::Args)]
pub struct AnnotateArgs {
    /// Text signal files; each is annotated independently.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Path to TOML configuration file; defaults apply when it is missing.
    #[arg(short, long, default_value = "ecgann.toml")]
    pub config: PathBuf,

    /// Override sampling rate (Hz) from config.
    #[arg(short = 'r', long)]
    pub sample_rate: Option<f64>,

    /// Override 1-based lead (column) from config.
    #[arg(short, long)]
    pub lead: Option<usize>,

    /// Override filter directory from config.
    #[arg(short, long)]
    pub filters: Option<PathBuf>,

    /// Shift every annotation by this many samples before saving.
    #[arg(long, allow_hyphen_values = true)]
    pub offset: Option<i64>,

    /// Stop after QRS detection and ectopic labelling.
    #[arg(long)]
    pub no_waves: bool,
}

/// Arguments for the `denoise` subcommand.
#[derive(clap::Args)]
pub struct DenoiseArgs {
    /// Text signal file.
    pub input: PathBuf,

    /// Output path, one sample per line.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Path to TOML configuration file; defaults apply when it is missing.
    #[arg(short, long, default_value = "ecgann.toml")]
    pub config: PathBuf,

    /// Override denoise mode from config: lf, hf or lfhf.
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Override sampling rate (Hz) from config.
    #[arg(short = 'r', long)]
    pub sample_rate: Option<f64>,

    /// Override 1-based lead (column) from config.
    #[arg(short, long)]
    pub lead: Option<usize>,

    /// Override filter directory from config.
    #[arg(short, long)]
    pub filters: Option<PathBuf>,
}

/// Arguments for the `decode` subcommand.
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// Binary annotation file.
    pub annotations: PathBuf,

    /// Path to TOML configuration file; defaults apply when it is missing.
    #[arg(short, long, default_value = "ecgann.toml")]
    pub config: PathBuf,

    /// Override sampling rate (Hz) from config, used for timestamps.
    #[arg(short = 'r', long)]
    pub sample_rate: Option<f64>,
}
