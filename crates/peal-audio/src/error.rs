//! Audio error types

use thiserror::Error;

use crate::wav::WavError;

pub type Result<T> = std::result::Result<T, AudioError>;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("sound file error: {0}")]
    Wav(#[from] WavError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported sample depth: {0} bits")]
    UnsupportedDepth(u16),

    #[error("sink used before configure")]
    NotConfigured,

    #[error("audio device error: {0}")]
    Device(String),
}
