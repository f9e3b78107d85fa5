use serde::Deserialize;
use std::path::PathBuf;

use crate::analysis::indices::IndexParameters;
use crate::analysis::window::WindowKind;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub spectrogram: SpectrogramSection,
    #[serde(default)]
    pub segment: SegmentSection,
    #[serde(default)]
    pub indices: IndicesSection,
}

#[derive(Debug, Deserialize)]
pub struct SpectrogramSection {
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default)]
    pub overlap: Option<usize>,
    #[serde(default = "default_window")]
    pub window: WindowKind,
    #[serde(default)]
    pub log_frequency: bool,
    #[serde(default)]
    pub normalized: bool,
}

#[derive(Debug, Deserialize)]
pub struct SegmentSection {
    #[serde(default = "default_step_frames")]
    pub step_frames: usize,
    #[serde(default = "default_overlap_fraction")]
    pub overlap_fraction: f32,
}

#[derive(Debug, Default, Deserialize)]
pub struct IndicesSection {
    /// Index names to compute, e.g. ["ACI", "NDSI", "HS"].
    #[serde(default)]
    pub requested: Vec<String>,
    #[serde(default)]
    pub parameters: IndexParameters,
}

impl Default for SpectrogramSection {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            overlap: None,
            window: default_window(),
            log_frequency: false,
            normalized: false,
        }
    }
}

impl Default for SegmentSection {
    fn default() -> Self {
        Self {
            step_frames: default_step_frames(),
            overlap_fraction: default_overlap_fraction(),
        }
    }
}

fn default_window_size() -> usize { 512 }
fn default_window() -> WindowKind { WindowKind::Hann }
fn default_step_frames() -> usize { 10 }
fn default_overlap_fraction() -> f32 { 0.5 }

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}
