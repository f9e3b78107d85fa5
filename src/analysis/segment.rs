use super::spectrogram::Spectrogram;
use crate::error::AnalysisError;

/// Overlapping fixed-length blocks cut from a spectrogram, the unit over
/// which acoustic indices are computed.
#[derive(Debug, Clone)]
pub struct SubWindows {
    /// Power blocks, `[channel][window][bin][frame_in_block]`.
    pub power: Vec<Vec<Vec<Vec<f32>>>>,
    /// Envelope blocks at audio rate, `[channel][window][sample_in_block]`.
    pub envelope: Vec<Vec<Vec<f32>>>,
    /// Center time of each window, taken from the parent time axis.
    pub center_times: Vec<f32>,
    /// Frames per block.
    pub block_len: usize,
    /// Stride between window starts, in frames.
    pub step_frames: usize,
}

impl SubWindows {
    pub fn channel_count(&self) -> usize {
        self.power.len()
    }

    pub fn window_count(&self) -> usize {
        self.center_times.len()
    }
}

/// Slice a spectrogram into sliding blocks of
/// `round(step_frames / (1 - overlap_fraction))` frames at stride
/// `step_frames`. Every block fits fully inside the parent spectrogram.
///
/// Envelope blocks cover the same time span as their frames: audio samples
/// `start * hop .. (start + block_len) * hop`.
pub fn segment(
    spec: &Spectrogram,
    step_frames: usize,
    overlap_fraction: f32,
) -> Result<SubWindows, AnalysisError> {
    if step_frames == 0 {
        return Err(AnalysisError::DegenerateInput(
            "segmentation step must be positive".into(),
        ));
    }
    let frame_count = spec.frame_count();
    let block_len = (step_frames as f32 / (1.0 - overlap_fraction)).round() as usize;
    if block_len == 0 || block_len >= frame_count {
        return Err(AnalysisError::WindowTooLarge {
            block_len,
            frame_count,
        });
    }

    let starts: Vec<usize> = (0..frame_count - block_len).step_by(step_frames).collect();
    let hop = spec.hop();

    log::debug!(
        "segment: block_len={} step={} windows={}",
        block_len,
        step_frames,
        starts.len()
    );

    let mut power = Vec::with_capacity(spec.channel_count());
    let mut envelope = Vec::with_capacity(spec.channel_count());

    for (channel, env) in spec.power.iter().zip(&spec.envelope) {
        let blocks: Vec<Vec<Vec<f32>>> = starts
            .iter()
            .map(|&start| {
                channel
                    .iter()
                    .map(|bin| bin[start..start + block_len].to_vec())
                    .collect()
            })
            .collect();
        let env_blocks: Vec<Vec<f32>> = starts
            .iter()
            .map(|&start| {
                let lo = start * hop;
                let hi = ((start + block_len) * hop).min(env.len());
                env[lo..hi].to_vec()
            })
            .collect();
        power.push(blocks);
        envelope.push(env_blocks);
    }

    let center_times = starts
        .iter()
        .map(|&start| spec.times[start + block_len / 2])
        .collect();

    Ok(SubWindows {
        power,
        envelope,
        center_times,
        block_len,
        step_frames,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::spectrogram::{build, SpectrogramConfig};
    use crate::audio::WaveformBuffer;

    fn spec_107_frames() -> Spectrogram {
        let samples: Vec<f32> = (0..48000)
            .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 48000.0).sin())
            .collect();
        let wave = WaveformBuffer::mono(samples, 48000);
        build(
            &wave,
            &SpectrogramConfig {
                window_size: 512,
                overlap: Some(64),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn geometry_of_the_sliding_blocks() {
        let spec = spec_107_frames();
        assert_eq!(spec.frame_count(), 107);

        let subs = segment(&spec, 10, 0.5).unwrap();
        assert_eq!(subs.block_len, 20);
        // starts 0, 10, ..., 80: strictly below 107 - 20
        assert_eq!(subs.window_count(), 9);
        for windows in &subs.power {
            for block in windows {
                assert_eq!(block.len(), spec.bin_count());
                for bin in block {
                    assert_eq!(bin.len(), 20);
                }
            }
        }
    }

    #[test]
    fn center_times_come_from_the_parent_axis() {
        let spec = spec_107_frames();
        let subs = segment(&spec, 10, 0.5).unwrap();
        for (w, &t) in subs.center_times.iter().enumerate() {
            assert_eq!(t, spec.times[w * 10 + 10]);
        }
        for pair in subs.center_times.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn envelope_blocks_span_the_frames() {
        let spec = spec_107_frames();
        let subs = segment(&spec, 10, 0.5).unwrap();
        let hop = spec.hop();
        for block in &subs.envelope[0] {
            assert_eq!(block.len(), 20 * hop);
        }
        // second window starts at frame 10 = sample 10 * hop
        assert_eq!(subs.envelope[0][1][0], spec.envelope[0][10 * hop]);
    }

    #[test]
    fn oversized_block_is_rejected() {
        let spec = spec_107_frames();
        // 120 / (1 - 0.5) = 240 frames > 107
        let err = segment(&spec, 120, 0.5).unwrap_err();
        assert!(matches!(err, AnalysisError::WindowTooLarge { .. }));
    }
}
