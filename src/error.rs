use thiserror::Error;

/// Central error type for the drum-sampler-core crate.
#[derive(Debug, Error)]
pub enum SamplerError {
    // Generic fallback (wraps anyhow)
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),

    // Domain-specific variants
    #[error("Config error: {0}")]
    Config(String),

    #[error("Preset `{0}` not found in catalog")]
    PresetNotFound(String),

    #[error("Invalid trim canvas width {0}")]
    InvalidCanvasWidth(f32),

    #[error("Slot {0} is out of range (0..16)")]
    SlotOutOfRange(usize),
}

/// Why a single sample could not be turned into a playable buffer.
///
/// These never cross the pipeline boundary as `Err`; they are carried inside
/// [`SampleOutcome::Failed`](crate::SampleOutcome::Failed).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("sample has no url")]
    EmptyLocator,

    #[error("transfer failed: {0}")]
    Transfer(String),

    #[error("decode failed: {0}")]
    Decode(String),
}

// --- Implement From conversions for common errors ---
impl From<std::io::Error> for SamplerError {
    fn from(e: std::io::Error) -> Self {
        SamplerError::Anyhow(e.into())
    }
}

impl From<serde_json::Error> for SamplerError {
    fn from(e: serde_json::Error) -> Self {
        SamplerError::Anyhow(e.into())
    }
}

impl From<reqwest::Error> for SamplerError {
    fn from(e: reqwest::Error) -> Self {
        SamplerError::Anyhow(e.into())
    }
}

impl From<hound::Error> for SamplerError {
    fn from(e: hound::Error) -> Self {
        SamplerError::Anyhow(e.into())
    }
}

pub type Result<T> = std::result::Result<T, SamplerError>;
