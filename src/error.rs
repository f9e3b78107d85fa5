use thiserror::Error;

/// Errors raised by the analysis pipeline.
///
/// Everything here is a caller configuration or data problem detected at the
/// point of violation; nothing is transient or retryable.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid window: size={size}, overlap={overlap} (need 0 < overlap < size <= input length)")]
    InvalidWindow { size: usize, overlap: usize },

    #[error("input waveform has no samples")]
    EmptyInput,

    #[error("sub-window of {block_len} frames does not fit in a {frame_count}-frame spectrogram")]
    WindowTooLarge {
        block_len: usize,
        frame_count: usize,
    },

    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("unknown acoustic index {0:?} (expected one of ACI, BI, NDSI, HS, HT, AEI, ADI)")]
    UnknownIndex(String),

    #[error("index {index} requires parameter `{parameter}`")]
    MissingParameter {
        index: &'static str,
        parameter: &'static str,
    },
}
