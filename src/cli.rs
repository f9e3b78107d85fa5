use clap::Parser;
use std::path::PathBuf;

use crate::analysis::window::WindowKind;

#[derive(Parser, Debug)]
#[command(name = "soniscape", about = "Ecoacoustic soundscape index analyzer")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: Option<PathBuf>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Analysis frame length in samples (rounded up to a fast FFT length)
    #[arg(long, default_value_t = 512)]
    pub window_size: usize,

    /// Frame overlap in samples (window_size / 8 when omitted)
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Window function applied to each frame
    #[arg(long, value_enum, default_value = "hann")]
    pub window: WindowKind,

    /// Remap the frequency axis to log2 spacing
    #[arg(long)]
    pub log_freq: bool,

    /// Scale each channel's spectrum and envelope by its own peak
    #[arg(long)]
    pub normalize: bool,

    /// Sub-window stride in spectrogram frames
    #[arg(long, default_value_t = 10)]
    pub step_frames: usize,

    /// Sub-window overlap fraction (block length = step / (1 - fraction))
    #[arg(long, default_value_t = 0.5)]
    pub sub_overlap: f32,

    /// Acoustic indices to compute (ACI, BI, NDSI, HS, HT, AEI, ADI)
    #[arg(short, long, value_delimiter = ',')]
    pub indices: Vec<String>,

    /// Config file (auto-detects soniscape.toml when omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
