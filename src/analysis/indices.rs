use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::str::FromStr;

use super::gini::gini;
use super::segment::SubWindows;
use super::spectrogram::Spectrogram;
use crate::error::AnalysisError;

/// The closed set of computable acoustic indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcousticIndex {
    /// Acoustic Complexity Index: temporal irregularity of the spectrum.
    Aci,
    /// Bioacoustic Index: dB area above the band minimum.
    Bi,
    /// Normalized Difference Soundscape Index: biophony vs anthropophony.
    Ndsi,
    /// Spectral entropy.
    Hs,
    /// Temporal entropy of the envelope.
    Ht,
    /// Acoustic Evenness Index: Gini over per-band activity.
    Aei,
    /// Acoustic Diversity Index: Shannon diversity over per-band activity.
    Adi,
}

impl AcousticIndex {
    pub fn name(self) -> &'static str {
        match self {
            AcousticIndex::Aci => "ACI",
            AcousticIndex::Bi => "BI",
            AcousticIndex::Ndsi => "NDSI",
            AcousticIndex::Hs => "HS",
            AcousticIndex::Ht => "HT",
            AcousticIndex::Aei => "AEI",
            AcousticIndex::Adi => "ADI",
        }
    }
}

impl FromStr for AcousticIndex {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ACI" => Ok(AcousticIndex::Aci),
            "BI" => Ok(AcousticIndex::Bi),
            "NDSI" => Ok(AcousticIndex::Ndsi),
            "HS" => Ok(AcousticIndex::Hs),
            "HT" => Ok(AcousticIndex::Ht),
            "AEI" => Ok(AcousticIndex::Aei),
            "ADI" => Ok(AcousticIndex::Adi),
            _ => Err(AnalysisError::UnknownIndex(s.to_string())),
        }
    }
}

/// Band edges and thresholds consumed by the banded indices.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexParameters {
    /// BI band edges, Hz.
    pub freq_bi: Option<[f32; 2]>,
    /// NDSI anthropophony band edges, Hz.
    pub freq_anthro: Option<[f32; 2]>,
    /// NDSI biophony band edges, Hz.
    pub freq_bio: Option<[f32; 2]>,
    /// AEI/ADI banding ceiling, Hz.
    pub max_freq: Option<f32>,
    /// AEI/ADI band width, Hz.
    pub freq_step: Option<f32>,
    /// AEI/ADI activity threshold, dB.
    pub db_threshold: Option<f32>,
    /// Floor applied before logarithms.
    pub tol: f32,
}

impl Default for IndexParameters {
    fn default() -> Self {
        Self {
            freq_bi: None,
            freq_anthro: None,
            freq_bio: None,
            max_freq: None,
            freq_step: None,
            db_threshold: None,
            tol: 1e-8,
        }
    }
}

/// Per-index results aligned to the sub-window center times.
///
/// The always-computed centroid and dB level are plain fields; each named
/// index is present only when requested. All arrays are `[channel][window]`.
#[derive(Debug, Clone, Serialize)]
pub struct IndexResultSet {
    pub channel_count: usize,
    pub center_times: Vec<f32>,
    pub spectral_centroid: Vec<Vec<f32>>,
    pub db_level: Vec<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aci: Option<Vec<Vec<f32>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bi: Option<Vec<Vec<f32>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ndsi: Option<Vec<Vec<f32>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hs: Option<Vec<Vec<f32>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ht: Option<Vec<Vec<f32>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aei: Option<Vec<Vec<f32>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adi: Option<Vec<Vec<f32>>>,
}

/// Resolved computation plan: which indices run, with their band geometry
/// already converted to bin ranges. Built once, shared by every channel.
struct EnginePlan {
    aci: bool,
    bi: Option<Range<usize>>,
    ndsi: Option<(Range<usize>, Range<usize>)>,
    hs: bool,
    ht: bool,
    aei: bool,
    adi: bool,
    banding: Option<Banding>,
    tol: f32,
}

struct Banding {
    bin_width: usize,
    start_bins: Vec<usize>,
    db_threshold: f32,
}

/// One channel's slice of the result set.
struct ChannelResults {
    sc: Vec<f32>,
    db: Vec<f32>,
    aci: Vec<f32>,
    bi: Vec<f32>,
    ndsi: Vec<f32>,
    hs: Vec<f32>,
    ht: Vec<f32>,
    aei: Vec<f32>,
    adi: Vec<f32>,
}

/// Compute the requested indices over every channel and sub-window.
pub fn compute_indices(
    spec: &Spectrogram,
    subs: &SubWindows,
    requested: &[AcousticIndex],
    params: &IndexParameters,
) -> Result<IndexResultSet, AnalysisError> {
    let plan = resolve_plan(spec, requested, params)?;

    log::debug!(
        "indices: {} over {} channels x {} windows",
        requested
            .iter()
            .map(|ix| ix.name())
            .collect::<Vec<_>>()
            .join(","),
        subs.channel_count(),
        subs.window_count()
    );

    let channels: Vec<ChannelResults> = (0..subs.channel_count())
        .into_par_iter()
        .map(|c| compute_channel(spec, subs, c, &plan))
        .collect::<Result<Vec<_>, _>>()?;

    let gather = |pick: fn(&ChannelResults) -> &Vec<f32>, on: bool| -> Option<Vec<Vec<f32>>> {
        on.then(|| channels.iter().map(|ch| pick(ch).clone()).collect())
    };

    Ok(IndexResultSet {
        channel_count: channels.len(),
        center_times: subs.center_times.clone(),
        spectral_centroid: channels.iter().map(|ch| ch.sc.clone()).collect(),
        db_level: channels.iter().map(|ch| ch.db.clone()).collect(),
        aci: gather(|ch| &ch.aci, plan.aci),
        bi: gather(|ch| &ch.bi, plan.bi.is_some()),
        ndsi: gather(|ch| &ch.ndsi, plan.ndsi.is_some()),
        hs: gather(|ch| &ch.hs, plan.hs),
        ht: gather(|ch| &ch.ht, plan.ht),
        aei: gather(|ch| &ch.aei, plan.aei),
        adi: gather(|ch| &ch.adi, plan.adi),
    })
}

/// Validate parameters for the requested indices and precompute bin ranges.
fn resolve_plan(
    spec: &Spectrogram,
    requested: &[AcousticIndex],
    params: &IndexParameters,
) -> Result<EnginePlan, AnalysisError> {
    let want = |ix: AcousticIndex| requested.contains(&ix);
    let bin_count = spec.bin_count();
    let df = spec.freq_resolution;

    let edges_to_bins = |edges: [f32; 2]| -> Range<usize> {
        let lo = ((edges[0] / df).round() as usize).min(bin_count);
        let hi = ((edges[1] / df).round() as usize).min(bin_count);
        lo..hi.max(lo)
    };

    let bi = if want(AcousticIndex::Bi) {
        let edges = require(params.freq_bi, "BI", "freq_bi")?;
        Some(edges_to_bins(edges))
    } else {
        None
    };

    let ndsi = if want(AcousticIndex::Ndsi) {
        let anthro = require(params.freq_anthro, "NDSI", "freq_anthro")?;
        let bio = require(params.freq_bio, "NDSI", "freq_bio")?;
        Some((edges_to_bins(anthro), edges_to_bins(bio)))
    } else {
        None
    };

    let aei = want(AcousticIndex::Aei);
    let adi = want(AcousticIndex::Adi);
    let banding = if aei || adi {
        let index = if aei { "AEI" } else { "ADI" };
        let max_freq = require(params.max_freq, index, "max_freq")?;
        let freq_step = require(params.freq_step, index, "freq_step")?;
        let db_threshold = require(params.db_threshold, index, "db_threshold")?;
        if freq_step <= 0.0 || max_freq <= 0.0 {
            return Err(AnalysisError::DegenerateInput(
                "banding requires positive max_freq and freq_step".into(),
            ));
        }
        let band_count = (max_freq / freq_step).ceil() as usize;
        let bin_width = (freq_step / df).round() as usize;
        let start_bins = (0..band_count)
            .map(|b| ((b as f32 * freq_step / df).round() as usize).min(bin_count))
            .collect();
        Some(Banding {
            bin_width,
            start_bins,
            db_threshold,
        })
    } else {
        None
    };

    Ok(EnginePlan {
        aci: want(AcousticIndex::Aci),
        bi,
        ndsi,
        hs: want(AcousticIndex::Hs),
        ht: want(AcousticIndex::Ht),
        aei,
        adi,
        banding,
        tol: params.tol,
    })
}

fn require<T>(
    value: Option<T>,
    index: &'static str,
    parameter: &'static str,
) -> Result<T, AnalysisError> {
    value.ok_or(AnalysisError::MissingParameter { index, parameter })
}

fn compute_channel(
    spec: &Spectrogram,
    subs: &SubWindows,
    channel: usize,
    plan: &EnginePlan,
) -> Result<ChannelResults, AnalysisError> {
    let windows = &subs.power[channel];
    let envelopes = &subs.envelope[channel];
    let window_count = windows.len();

    let mut out = ChannelResults {
        sc: Vec::with_capacity(window_count),
        db: Vec::with_capacity(window_count),
        aci: Vec::new(),
        bi: Vec::new(),
        ndsi: Vec::new(),
        hs: Vec::new(),
        ht: Vec::new(),
        aei: Vec::new(),
        adi: Vec::new(),
    };

    for (block, env) in windows.iter().zip(envelopes) {
        out.sc.push(spectral_centroid(block, &spec.frequencies)?);
        out.db.push(db_level(env)?);

        if plan.aci {
            out.aci.push(aci(block)?);
        }
        let norm = if plan.bi.is_some() || plan.banding.is_some() {
            Some(max_normalized(block)?)
        } else {
            None
        };
        if let Some(band) = &plan.bi {
            out.bi
                .push(bi(norm.as_ref().unwrap(), band, spec.freq_resolution, plan.tol)?);
        }
        if let Some((anthro, bio)) = &plan.ndsi {
            out.ndsi.push(ndsi(block, anthro, bio)?);
        }
        if plan.hs {
            out.hs.push(spectral_entropy(block)?);
        }
        if plan.ht {
            out.ht.push(temporal_entropy(env, plan.tol)?);
        }
        if let Some(banding) = &plan.banding {
            let activity = band_activity(norm.as_ref().unwrap(), banding, plan.tol);
            if plan.aei {
                out.aei.push(gini(&activity)?);
            }
            if plan.adi {
                out.adi.push(shannon_diversity(&activity, plan.tol)?);
            }
        }
    }
    Ok(out)
}

/// Frequency-weighted mean of the block's power over bins and frames.
fn spectral_centroid(block: &[Vec<f32>], frequencies: &[f32]) -> Result<f32, AnalysisError> {
    let total: f32 = block.iter().flat_map(|bin| bin.iter()).sum();
    if total <= 0.0 {
        return Err(AnalysisError::DegenerateInput(
            "spectral centroid of a window with no power".into(),
        ));
    }
    let weighted: f32 = block
        .iter()
        .zip(frequencies)
        .map(|(bin, &f)| f * bin.iter().sum::<f32>())
        .sum();
    Ok(weighted / total)
}

/// `20 log10` of the mean envelope magnitude over the block.
fn db_level(env: &[f32]) -> Result<f32, AnalysisError> {
    let mean = env.iter().sum::<f32>() / env.len() as f32;
    if mean <= 0.0 {
        return Err(AnalysisError::DegenerateInput(
            "dB level of a silent envelope block".into(),
        ));
    }
    Ok(20.0 * mean.log10())
}

/// Acoustic Complexity Index: absolute frame-to-frame power differences
/// accumulated over the block, normalized by the first frame's total power.
fn aci(block: &[Vec<f32>]) -> Result<f32, AnalysisError> {
    let first_frame: f32 = block.iter().map(|bin| bin[0]).sum();
    if first_frame <= 0.0 {
        return Err(AnalysisError::DegenerateInput(
            "ACI normalization frame has no power".into(),
        ));
    }
    let diffs: f32 = block
        .iter()
        .map(|bin| bin.windows(2).map(|p| (p[1] - p[0]).abs()).sum::<f32>())
        .sum();
    Ok(diffs / first_frame)
}

/// Scale the block by its own peak.
fn max_normalized(block: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, AnalysisError> {
    let peak = block
        .iter()
        .flat_map(|bin| bin.iter().copied())
        .fold(0.0f32, f32::max);
    if peak <= 0.0 {
        return Err(AnalysisError::DegenerateInput(
            "max-normalization of a window with no power".into(),
        ));
    }
    Ok(block
        .iter()
        .map(|bin| bin.iter().map(|p| p / peak).collect())
        .collect())
}

/// Bioacoustic Index: per-bin mean square of the normalized spectrum in dB,
/// shifted by the band minimum and summed as area over the band.
fn bi(
    norm: &[Vec<f32>],
    band: &Range<usize>,
    freq_resolution: f32,
    tol: f32,
) -> Result<f32, AnalysisError> {
    if band.is_empty() {
        return Err(AnalysisError::DegenerateInput(
            "BI band maps to no frequency bins".into(),
        ));
    }
    let mean_db: Vec<f32> = norm[band.clone()]
        .iter()
        .map(|bin| {
            let mean_sq = bin.iter().map(|p| p * p).sum::<f32>() / bin.len() as f32;
            10.0 * mean_sq.max(tol).log10()
        })
        .collect();
    let floor = mean_db.iter().copied().fold(f32::INFINITY, f32::min);
    Ok(mean_db.iter().map(|v| (v - floor) / freq_resolution).sum())
}

/// Normalized Difference Soundscape Index over the two configured bands.
fn ndsi(
    block: &[Vec<f32>],
    anthro: &Range<usize>,
    bio: &Range<usize>,
) -> Result<f32, AnalysisError> {
    let band_power = |band: &Range<usize>| -> f32 {
        block[band.clone()]
            .iter()
            .flat_map(|bin| bin.iter())
            .sum()
    };
    let a = band_power(anthro);
    let b = band_power(bio);
    if a + b <= 0.0 {
        return Err(AnalysisError::DegenerateInput(
            "NDSI bands carry no power".into(),
        ));
    }
    Ok((b - a) / (b + a))
}

/// Shannon entropy of the frame-averaged spectrum, normalized to `[0, 1]`
/// by the bin count.
fn spectral_entropy(block: &[Vec<f32>]) -> Result<f32, AnalysisError> {
    let per_bin: Vec<f32> = block.iter().map(|bin| bin.iter().sum()).collect();
    let total: f32 = per_bin.iter().sum();
    if total <= 0.0 {
        return Err(AnalysisError::DegenerateInput(
            "spectral entropy of a window with no power".into(),
        ));
    }
    let entropy: f32 = per_bin
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| {
            let p = p / total;
            -p * p.log2()
        })
        .sum();
    Ok(entropy / (per_bin.len() as f32).log2())
}

/// Shannon entropy of the floored envelope block, normalized to `[0, 1]`
/// by the sample count.
fn temporal_entropy(env: &[f32], tol: f32) -> Result<f32, AnalysisError> {
    let floored: Vec<f32> = env.iter().map(|&e| e.max(tol)).collect();
    let total: f32 = floored.iter().sum();
    if total <= 0.0 {
        return Err(AnalysisError::DegenerateInput(
            "temporal entropy of a silent envelope block".into(),
        ));
    }
    let entropy: f32 = floored
        .iter()
        .map(|&e| {
            let p = e / total;
            -p * p.log2()
        })
        .sum();
    Ok(entropy / (floored.len() as f32).log2())
}

/// Fraction of time-frequency samples above the dB threshold, per band.
fn band_activity(norm: &[Vec<f32>], banding: &Banding, tol: f32) -> Vec<f32> {
    let bin_count = norm.len();
    banding
        .start_bins
        .iter()
        .map(|&lo| {
            let hi = (lo + banding.bin_width).min(bin_count);
            let mut active = 0usize;
            let mut seen = 0usize;
            for bin in &norm[lo..hi] {
                for &p in bin {
                    if 20.0 * p.max(tol).log10() > banding.db_threshold {
                        active += 1;
                    }
                    seen += 1;
                }
            }
            if seen == 0 {
                0.0
            } else {
                active as f32 / seen as f32
            }
        })
        .collect()
}

/// ADI: floor the activity fractions, renormalize across bands, and take
/// Shannon diversity (`-sum p ln p`).
fn shannon_diversity(activity: &[f32], tol: f32) -> Result<f32, AnalysisError> {
    let floored: Vec<f32> = activity.iter().map(|&a| a.max(tol)).collect();
    let total: f32 = floored.iter().sum();
    if total <= 0.0 {
        return Err(AnalysisError::DegenerateInput(
            "ADI with no band activity".into(),
        ));
    }
    Ok(floored
        .iter()
        .map(|&a| {
            let p = a / total;
            -p * p.ln()
        })
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::segment::segment;
    use crate::analysis::spectrogram::{build, SpectrogramConfig};
    use crate::analysis::window::WindowKind;
    use crate::audio::WaveformBuffer;

    /// A one-channel, one-window fixture with 9 bins at 100 Hz spacing.
    fn fixture(block: Vec<Vec<f32>>, env: Vec<f32>) -> (Spectrogram, SubWindows) {
        let bins = block.len();
        let frames = block[0].len();
        let spec = Spectrogram {
            frequencies: (0..bins).map(|k| k as f32 * 100.0).collect(),
            times: (0..frames).map(|i| i as f32 * 0.01).collect(),
            power: vec![block.clone()],
            envelope: vec![env.clone()],
            freq_resolution: 100.0,
            sample_rate: 48000,
            window_size: 512,
            overlap: 64,
            window: WindowKind::Hann,
            log_frequency: false,
            normalized: false,
        };
        let subs = SubWindows {
            power: vec![vec![block]],
            envelope: vec![vec![env]],
            center_times: vec![0.1],
            block_len: frames,
            step_frames: frames,
        };
        (spec, subs)
    }

    fn flat_block(bins: usize, frames: usize, value: f32) -> Vec<Vec<f32>> {
        vec![vec![value; frames]; bins]
    }

    #[test]
    fn unknown_index_name_is_rejected() {
        let err = "SPL".parse::<AcousticIndex>().unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownIndex(_)));
        assert_eq!("ndsi".parse::<AcousticIndex>().unwrap(), AcousticIndex::Ndsi);
    }

    #[test]
    fn missing_band_parameters_are_reported() {
        let (spec, subs) = fixture(flat_block(9, 4, 1.0), vec![0.5; 16]);
        let err = compute_indices(
            &spec,
            &subs,
            &[AcousticIndex::Ndsi],
            &IndexParameters::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MissingParameter {
                index: "NDSI",
                parameter: "freq_anthro"
            }
        ));
    }

    #[test]
    fn flat_spectrum_has_unit_entropy() {
        let (spec, subs) = fixture(flat_block(9, 4, 1.0), vec![0.5; 16]);
        let result = compute_indices(
            &spec,
            &subs,
            &[AcousticIndex::Hs],
            &IndexParameters::default(),
        )
        .unwrap();
        let hs = result.hs.unwrap()[0][0];
        assert!((hs - 1.0).abs() < 1e-5, "flat HS = {hs}");
    }

    #[test]
    fn concentrated_spectrum_has_zero_entropy() {
        let mut block = flat_block(9, 4, 0.0);
        block[3] = vec![2.0; 4];
        let (spec, subs) = fixture(block, vec![0.5; 16]);
        let result = compute_indices(
            &spec,
            &subs,
            &[AcousticIndex::Hs],
            &IndexParameters::default(),
        )
        .unwrap();
        let hs = result.hs.unwrap()[0][0];
        assert!(hs.abs() < 1e-6, "one-bin HS = {hs}");
    }

    #[test]
    fn ndsi_saturates_one_sided_bands() {
        let params = IndexParameters {
            freq_anthro: Some([100.0, 300.0]),
            freq_bio: Some([500.0, 700.0]),
            ..Default::default()
        };

        let mut bio_only = flat_block(9, 4, 0.0);
        bio_only[5] = vec![1.0; 4];
        let (spec, subs) = fixture(bio_only, vec![0.5; 16]);
        let result =
            compute_indices(&spec, &subs, &[AcousticIndex::Ndsi], &params).unwrap();
        assert_eq!(result.ndsi.unwrap()[0][0], 1.0);

        let mut anthro_only = flat_block(9, 4, 0.0);
        anthro_only[2] = vec![1.0; 4];
        let (spec, subs) = fixture(anthro_only, vec![0.5; 16]);
        let result =
            compute_indices(&spec, &subs, &[AcousticIndex::Ndsi], &params).unwrap();
        assert_eq!(result.ndsi.unwrap()[0][0], -1.0);
    }

    #[test]
    fn ndsi_with_empty_bands_is_degenerate() {
        let params = IndexParameters {
            freq_anthro: Some([100.0, 300.0]),
            freq_bio: Some([500.0, 700.0]),
            ..Default::default()
        };
        // power only at 800 Hz, outside both bands
        let mut block = flat_block(9, 4, 0.0);
        block[8] = vec![1.0; 4];
        let (spec, subs) = fixture(block, vec![0.5; 16]);
        let err = compute_indices(&spec, &subs, &[AcousticIndex::Ndsi], &params).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateInput(_)));
    }

    #[test]
    fn constant_spectrum_has_zero_complexity() {
        let (spec, subs) = fixture(flat_block(9, 4, 0.7), vec![0.5; 16]);
        let result = compute_indices(
            &spec,
            &subs,
            &[AcousticIndex::Aci],
            &IndexParameters::default(),
        )
        .unwrap();
        assert_eq!(result.aci.unwrap()[0][0], 0.0);
    }

    #[test]
    fn db_level_of_a_constant_envelope() {
        let (spec, subs) = fixture(flat_block(9, 4, 1.0), vec![0.1; 16]);
        let result =
            compute_indices(&spec, &subs, &[], &IndexParameters::default()).unwrap();
        assert!((result.db_level[0][0] + 20.0).abs() < 1e-4);
        // centroid of a flat 0..800 Hz spectrum sits at the middle
        assert!((result.spectral_centroid[0][0] - 400.0).abs() < 1e-3);
    }

    #[test]
    fn constant_envelope_has_unit_temporal_entropy() {
        let (spec, subs) = fixture(flat_block(9, 4, 1.0), vec![0.3; 16]);
        let result = compute_indices(
            &spec,
            &subs,
            &[AcousticIndex::Ht],
            &IndexParameters::default(),
        )
        .unwrap();
        let ht = result.ht.unwrap()[0][0];
        assert!((ht - 1.0).abs() < 1e-5, "constant HT = {ht}");
    }

    #[test]
    fn evenness_separates_uniform_from_concentrated_activity() {
        let params = IndexParameters {
            max_freq: Some(800.0),
            freq_step: Some(100.0),
            db_threshold: Some(-30.0),
            ..Default::default()
        };

        // all bands loud: activity uniform, AEI near 0, ADI near ln(band_count)
        let (spec, subs) = fixture(flat_block(9, 4, 1.0), vec![0.5; 16]);
        let even = compute_indices(
            &spec,
            &subs,
            &[AcousticIndex::Aei, AcousticIndex::Adi],
            &params,
        )
        .unwrap();
        let aei_even = even.aei.unwrap()[0][0];
        let adi_even = even.adi.unwrap()[0][0];
        assert!(aei_even.abs() < 1e-5, "uniform AEI = {aei_even}");
        assert!((adi_even - (8.0f32).ln()).abs() < 1e-4, "uniform ADI = {adi_even}");

        // one loud band among quiet ones: high inequality, low diversity
        let mut block = flat_block(9, 4, 1e-6);
        block[2] = vec![1.0; 4];
        let (spec, subs) = fixture(block, vec![0.5; 16]);
        let uneven = compute_indices(
            &spec,
            &subs,
            &[AcousticIndex::Aei, AcousticIndex::Adi],
            &params,
        )
        .unwrap();
        let aei_uneven = uneven.aei.unwrap()[0][0];
        let adi_uneven = uneven.adi.unwrap()[0][0];
        assert!(aei_uneven > 0.8, "concentrated AEI = {aei_uneven}");
        assert!(adi_uneven < adi_even, "ADI {adi_uneven} !< {adi_even}");
    }

    #[test]
    fn bi_of_a_flat_band_is_zero() {
        let params = IndexParameters {
            freq_bi: Some([200.0, 600.0]),
            ..Default::default()
        };
        let (spec, subs) = fixture(flat_block(9, 4, 0.5), vec![0.5; 16]);
        let result = compute_indices(&spec, &subs, &[AcousticIndex::Bi], &params).unwrap();
        // every bin equals the band minimum after the shift
        assert!(result.bi.unwrap()[0][0].abs() < 1e-5);
    }

    #[test]
    fn two_tone_end_to_end() {
        // 10 s at 48 kHz: strong 10 kHz "biophony" over weak 1 kHz
        // "anthropophony"
        let sample_rate = 48000u32;
        let samples: Vec<f32> = (0..480_000)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * std::f32::consts::PI * 10_000.0 * t).sin()
                    + 0.2 * (2.0 * std::f32::consts::PI * 1_000.0 * t).sin()
            })
            .collect();
        let wave = WaveformBuffer::mono(samples, sample_rate);

        let spec = build(
            &wave,
            &SpectrogramConfig {
                window_size: 512,
                overlap: Some(64),
                ..Default::default()
            },
        )
        .unwrap();
        let subs = segment(&spec, 10, 0.5).unwrap();

        let params = IndexParameters {
            freq_anthro: Some([500.0, 1500.0]),
            freq_bio: Some([8000.0, 12000.0]),
            ..Default::default()
        };
        let result = compute_indices(
            &spec,
            &subs,
            &[AcousticIndex::Ndsi, AcousticIndex::Hs],
            &params,
        )
        .unwrap();

        assert_eq!(result.channel_count, 1);
        assert_eq!(result.center_times.len(), subs.window_count());

        for (&ndsi, &hs) in result.ndsi.as_ref().unwrap()[0]
            .iter()
            .zip(&result.hs.as_ref().unwrap()[0])
        {
            assert!(ndsi > 0.8, "NDSI {ndsi} does not favor the bio band");
            assert!(hs < 1.0, "two-tone HS {hs} should not look flat");
            assert!(hs > 0.0);
        }
    }
}
