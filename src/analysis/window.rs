use clap::ValueEnum;
use serde::Deserialize;
use std::f32::consts::PI;

/// Analysis window function applied to each spectrogram frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Hann,
    Hamming,
    Blackman,
    Rectangular,
}

impl WindowKind {
    /// Window coefficients for a frame of `size` samples.
    pub fn coefficients(self, size: usize) -> Vec<f32> {
        let denom = (size - 1) as f32;
        (0..size)
            .map(|i| {
                let x = i as f32 / denom;
                match self {
                    WindowKind::Hann => 0.5 * (1.0 - (2.0 * PI * x).cos()),
                    WindowKind::Hamming => 0.54 - 0.46 * (2.0 * PI * x).cos(),
                    WindowKind::Blackman => {
                        0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
                    }
                    WindowKind::Rectangular => 1.0,
                }
            })
            .collect()
    }
}

/// Smallest 5-smooth integer >= `n` (factors 2, 3 and 5 only).
///
/// FFT lengths decomposable into small primes keep rustfft on its fast
/// mixed-radix paths; both the frame size and the envelope transform length
/// are rounded up through here.
pub fn next_fast_len(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    let mut candidate = n;
    loop {
        let mut m = candidate;
        while m % 2 == 0 {
            m /= 2;
        }
        while m % 3 == 0 {
            m /= 3;
        }
        while m % 5 == 0 {
            m /= 5;
        }
        if m == 1 {
            return candidate;
        }
        candidate += 1;
    }
}
