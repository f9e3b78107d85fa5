mod analysis;
mod audio;
mod cli;
mod config;
mod error;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use analysis::indices::{compute_indices, AcousticIndex, IndexParameters, IndexResultSet};
use analysis::segment::segment;
use analysis::spectrogram::{build, SpectrogramConfig};
use analysis::window::WindowKind;
use cli::Cli;

/// Everything the downstream display/persistence layer needs: the run
/// geometry plus the index time series keyed by index name.
#[derive(Serialize)]
struct Report {
    input: String,
    sample_rate: u32,
    duration_secs: f32,
    window_size: usize,
    overlap: usize,
    log_frequency: bool,
    normalized: bool,
    step_frames: usize,
    block_frames: usize,
    indices: IndexResultSet,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect soniscape.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = std::path::PathBuf::from("soniscape.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("soniscape").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("soniscape").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });

    let mut params = IndexParameters::default();
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.window_size == 512 {
                cli.window_size = cfg.spectrogram.window_size;
            }
            if cli.overlap.is_none() {
                cli.overlap = cfg.spectrogram.overlap;
            }
            if cli.window == WindowKind::Hann {
                cli.window = cfg.spectrogram.window;
            }
            if !cli.log_freq {
                cli.log_freq = cfg.spectrogram.log_frequency;
            }
            if !cli.normalize {
                cli.normalize = cfg.spectrogram.normalized;
            }
            if cli.step_frames == 10 {
                cli.step_frames = cfg.segment.step_frames;
            }
            if cli.sub_overlap == 0.5 {
                cli.sub_overlap = cfg.segment.overlap_fraction;
            }
            if cli.indices.is_empty() && !cfg.indices.requested.is_empty() {
                cli.indices = cfg.indices.requested;
            }
            params = cfg.indices.parameters;
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    let input = cli.input.as_ref().context("Input audio file is required")?;
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    log::info!("soniscape - ecoacoustic soundscape index analyzer");
    log::info!("Input: {}", input.display());

    let requested: Vec<AcousticIndex> = cli
        .indices
        .iter()
        .map(|name| name.parse())
        .collect::<std::result::Result<_, _>>()?;

    // 1. Decode audio
    log::info!("Decoding audio...");
    let waveform = audio::decode::decode_audio(input)?;

    // 2. Spectrogram + analytic envelope
    log::info!("Building spectrogram...");
    let spec = build(
        &waveform,
        &SpectrogramConfig {
            window_size: cli.window_size,
            overlap: cli.overlap,
            window: cli.window,
            log_frequency: cli.log_freq,
            normalized: cli.normalize,
        },
    )?;
    log::info!(
        "Spectrogram: {} frames x {} bins, df = {:.2} Hz",
        spec.frame_count(),
        spec.bin_count(),
        spec.freq_resolution
    );

    // 3. Sub-windows
    log::info!("Segmenting...");
    let subs = segment(&spec, cli.step_frames, cli.sub_overlap)?;
    log::info!(
        "Sub-windows: {} blocks of {} frames",
        subs.window_count(),
        subs.block_len
    );

    // 4. Acoustic indices
    log::info!(
        "Computing indices ({} requested + centroid/dB)...",
        requested.len()
    );
    let results = compute_indices(&spec, &subs, &requested, &params)?;

    // 5. Report
    let report = Report {
        input: input.display().to_string(),
        sample_rate: waveform.sample_rate,
        duration_secs: waveform.duration_secs(),
        window_size: spec.window_size,
        overlap: spec.overlap,
        log_frequency: spec.log_frequency,
        normalized: spec.normalized,
        step_frames: subs.step_frames,
        block_frames: subs.block_len,
        indices: results,
    };
    let json = serde_json::to_string_pretty(&report)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            log::info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
