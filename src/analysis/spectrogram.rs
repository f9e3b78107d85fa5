use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};

use super::window::{next_fast_len, WindowKind};
use crate::audio::WaveformBuffer;
use crate::error::AnalysisError;

/// Spectrogram builder parameters.
#[derive(Debug, Clone)]
pub struct SpectrogramConfig {
    /// Analysis frame length in samples; rounded up to the next fast FFT
    /// length before use.
    pub window_size: usize,
    /// Overlap between consecutive frames in samples. `None` selects
    /// `window_size / 8` after rounding.
    pub overlap: Option<usize>,
    pub window: WindowKind,
    /// Remap the frequency axis onto log2-spaced points.
    pub log_frequency: bool,
    /// Scale each channel's power and envelope by that channel's peak.
    pub normalized: bool,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            window_size: 512,
            overlap: None,
            window: WindowKind::Hann,
            log_frequency: false,
            normalized: false,
        }
    }
}

/// Power spectra over time plus the analytic envelope, per channel.
///
/// Built once per invocation; not mutated afterwards.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// Frequency axis, `window_size / 2 + 1` values. Linear bin centers, or
    /// log2-spaced points spanning the same range when `log_frequency`.
    pub frequencies: Vec<f32>,
    /// Frame-center times in seconds.
    pub times: Vec<f32>,
    /// Power spectral density, `[channel][bin][frame]`.
    pub power: Vec<Vec<Vec<f32>>>,
    /// Analytic-signal magnitude, `[channel][sample]`. Length is the next
    /// fast FFT length >= the input sample count.
    pub envelope: Vec<Vec<f32>>,
    /// Linear bin spacing in Hz, reported regardless of log remapping.
    pub freq_resolution: f32,
    pub sample_rate: u32,
    /// Frame length actually used, after fast-length rounding.
    pub window_size: usize,
    pub overlap: usize,
    pub window: WindowKind,
    pub log_frequency: bool,
    pub normalized: bool,
}

impl Spectrogram {
    pub fn channel_count(&self) -> usize {
        self.power.len()
    }

    pub fn bin_count(&self) -> usize {
        self.frequencies.len()
    }

    pub fn frame_count(&self) -> usize {
        self.times.len()
    }

    /// Frame hop in samples.
    pub fn hop(&self) -> usize {
        self.window_size - self.overlap
    }

    /// Resample every frame's spectrum onto a log2-spaced frequency axis
    /// spanning `[f[1], f[last]]`, keeping the bin count.
    ///
    /// Building with `log_frequency: false` and remapping afterwards is
    /// equivalent to requesting `log_frequency: true` directly.
    pub fn into_log_frequency(mut self) -> Spectrogram {
        if self.log_frequency {
            return self;
        }
        let bin_count = self.frequencies.len();
        let frame_count = self.times.len();
        let l1 = self.frequencies[1].log2();
        let llast = self.frequencies[bin_count - 1].log2();
        let log_freqs: Vec<f32> = (0..bin_count)
            .map(|i| {
                let t = i as f32 / (bin_count - 1) as f32;
                (l1 + (llast - l1) * t).exp2()
            })
            .collect();

        let df = self.freq_resolution;
        for channel in &mut self.power {
            let mut remapped = vec![vec![0.0f32; frame_count]; bin_count];
            for frame in 0..frame_count {
                for (k, &lf) in log_freqs.iter().enumerate() {
                    remapped[k][frame] = interp_frame(channel, frame, df, lf);
                }
            }
            *channel = remapped;
        }
        self.frequencies = log_freqs;
        self.log_frequency = true;
        self
    }
}

/// Linear interpolation of one frame's spectrum at frequency `x`, on the
/// uniform linear axis `f[k] = k * df`. Points past either end extrapolate
/// along the nearest segment.
fn interp_frame(power: &[Vec<f32>], frame: usize, df: f32, x: f32) -> f32 {
    let bin_count = power.len();
    let pos = x / df;
    let seg = (pos.floor() as isize).clamp(0, bin_count as isize - 2) as usize;
    let t = pos - seg as f32;
    let y0 = power[seg][frame];
    let y1 = power[seg + 1][frame];
    y0 + (y1 - y0) * t
}

/// Build the per-channel power spectrogram and analytic envelope.
pub fn build(
    waveform: &WaveformBuffer,
    cfg: &SpectrogramConfig,
) -> Result<Spectrogram, AnalysisError> {
    let sample_count = waveform.sample_count();
    if sample_count == 0 || waveform.channel_count() == 0 {
        return Err(AnalysisError::EmptyInput);
    }
    if cfg.window_size == 0 {
        return Err(AnalysisError::InvalidWindow {
            size: cfg.window_size,
            overlap: cfg.overlap.unwrap_or(0),
        });
    }

    // Fast-length rounding happens before anything else; every bin count
    // downstream uses the rounded size.
    let window_size = next_fast_len(cfg.window_size);
    let overlap = cfg.overlap.unwrap_or(window_size / 8);
    if overlap == 0 || overlap >= window_size || window_size > sample_count {
        return Err(AnalysisError::InvalidWindow {
            size: window_size,
            overlap,
        });
    }

    let fs = waveform.sample_rate as f32;
    let hop = window_size - overlap;
    let frame_count = (sample_count - window_size) / hop + 1;
    let bin_count = window_size / 2 + 1;
    let env_len = next_fast_len(sample_count);
    let freq_resolution = fs / window_size as f32;

    let frequencies: Vec<f32> = (0..bin_count).map(|k| k as f32 * freq_resolution).collect();
    let times: Vec<f32> = (0..frame_count)
        .map(|i| (i * hop + window_size / 2) as f32 / fs)
        .collect();

    let coeffs = cfg.window.coefficients(window_size);
    let window_energy: f32 = coeffs.iter().map(|w| w * w).sum();
    let psd_scale = 1.0 / (fs * window_energy);

    log::debug!(
        "spectrogram: window={} overlap={} hop={} frames={} bins={} env_len={}",
        window_size, overlap, hop, frame_count, bin_count, env_len
    );

    // Channels are independent; each worker owns its planner and writes its
    // own output rows.
    let per_channel: Vec<(Vec<Vec<f32>>, Vec<f32>)> = waveform
        .channels
        .par_iter()
        .map(|samples| {
            let mut planner = FftPlanner::<f32>::new();
            let envelope = analytic_envelope(samples, env_len, &mut planner);
            let power = power_frames(
                samples, &coeffs, hop, frame_count, bin_count, psd_scale, &mut planner,
            );
            (power, envelope)
        })
        .collect();

    let (mut power, mut envelope): (Vec<_>, Vec<_>) = per_channel.into_iter().unzip();

    if cfg.normalized {
        for channel in &mut power {
            let peak = channel
                .iter()
                .flat_map(|bin| bin.iter().copied())
                .fold(0.0f32, f32::max);
            if peak > 0.0 {
                for bin in channel.iter_mut() {
                    for p in bin.iter_mut() {
                        *p /= peak;
                    }
                }
            }
        }
        for channel in &mut envelope {
            let peak = channel.iter().copied().fold(0.0f32, f32::max);
            if peak > 0.0 {
                for e in channel.iter_mut() {
                    *e /= peak;
                }
            }
        }
    }

    let mut spec = Spectrogram {
        frequencies,
        times,
        power,
        envelope,
        freq_resolution,
        sample_rate: waveform.sample_rate,
        window_size,
        overlap,
        window: cfg.window,
        log_frequency: false,
        normalized: cfg.normalized,
    };

    if cfg.log_frequency {
        spec = spec.into_log_frequency();
    }
    Ok(spec)
}

/// Magnitude of the analytic signal over a zero-padded transform of length
/// `n`: forward FFT, double the positive bins, keep DC (and Nyquist for even
/// `n`), zero the negative half, inverse FFT.
fn analytic_envelope(samples: &[f32], n: usize, planner: &mut FftPlanner<f32>) -> Vec<f32> {
    let fft = planner.plan_fft_forward(n);
    let ifft = planner.plan_fft_inverse(n);

    let mut buf: Vec<Complex<f32>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    buf.resize(n, Complex::new(0.0, 0.0));
    fft.process(&mut buf);

    for c in buf[1..(n + 1) / 2].iter_mut() {
        *c = c.scale(2.0);
    }
    for c in buf[n / 2 + 1..].iter_mut() {
        *c = Complex::new(0.0, 0.0);
    }
    ifft.process(&mut buf);

    // rustfft leaves the inverse unscaled
    let inv_n = 1.0 / n as f32;
    buf.iter().map(|c| c.norm() * inv_n).collect()
}

/// One-sided windowed-periodogram frames, `[bin][frame]`, density-scaled.
fn power_frames(
    samples: &[f32],
    coeffs: &[f32],
    hop: usize,
    frame_count: usize,
    bin_count: usize,
    psd_scale: f32,
    planner: &mut FftPlanner<f32>,
) -> Vec<Vec<f32>> {
    let window_size = coeffs.len();
    let fft = planner.plan_fft_forward(window_size);
    let even = window_size % 2 == 0;

    let mut power = vec![vec![0.0f32; frame_count]; bin_count];
    let mut buf = vec![Complex::new(0.0f32, 0.0); window_size];

    for frame in 0..frame_count {
        let start = frame * hop;
        for (i, (&s, &w)) in samples[start..start + window_size]
            .iter()
            .zip(coeffs)
            .enumerate()
        {
            buf[i] = Complex::new(s * w, 0.0);
        }
        fft.process(&mut buf);

        for (k, bin) in power.iter_mut().enumerate() {
            let mut p = buf[k].norm_sqr() * psd_scale;
            // one-sided: double everything except DC and (for even sizes)
            // the Nyquist bin
            if k != 0 && !(even && k == bin_count - 1) {
                p *= 2.0;
            }
            bin[frame] = p;
        }
    }
    power
}
