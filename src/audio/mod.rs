pub mod decode;

/// Planar multichannel audio: one sample vector per channel, all the same
/// length, at a fixed sample rate. Immutable input to the analysis pipeline.
#[derive(Debug, Clone)]
pub struct WaveformBuffer {
    /// Per-channel sample data, equal lengths.
    pub channels: Vec<Vec<f32>>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl WaveformBuffer {
    /// Wrap a one-dimensional signal as a single-channel buffer.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            channels: vec![samples],
            sample_rate,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn sample_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn duration_secs(&self) -> f32 {
        self.sample_count() as f32 / self.sample_rate as f32
    }
}
