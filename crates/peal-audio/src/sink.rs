//! PCM playback boundary

use crate::error::{AudioError, Result};
use crate::wav::SampleSpec;

/// Sample encodings the playback path can deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    U8,
    S16Le,
    S24Le,
    S32Le,
}

impl SampleFormat {
    /// Map a PCM bit depth onto the narrowest format that carries it
    pub fn from_bits(bits: u16) -> Result<Self> {
        match bits {
            1..=8 => Ok(SampleFormat::U8),
            9..=16 => Ok(SampleFormat::S16Le),
            17..=24 => Ok(SampleFormat::S24Le),
            25..=32 => Ok(SampleFormat::S32Le),
            _ => Err(AudioError::UnsupportedDepth(bits)),
        }
    }
}

/// A playback device accepting interleaved PCM frames.
///
/// `configure` applies the sample format and negotiates the period
/// size: callers request a period in frames and get back the size the
/// device granted, which later [`write`](Self::write) calls should
/// deliver in. `drain` blocks until everything written has played out.
pub trait PcmSink {
    fn configure(&mut self, spec: &SampleSpec, period_frames: usize) -> Result<usize>;
    fn write(&mut self, frames: &[u8]) -> Result<()>;
    fn drain(&mut self) -> Result<()>;
}

/// Discards audio while enforcing the sink calling contract. Stands in
/// for a real device in tests and sound-less deployments.
#[derive(Debug, Default)]
pub struct NullSink {
    configured: bool,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PcmSink for NullSink {
    fn configure(&mut self, spec: &SampleSpec, period_frames: usize) -> Result<usize> {
        SampleFormat::from_bits(spec.bits_per_sample)?;
        self.configured = true;
        Ok(period_frames.max(1))
    }

    fn write(&mut self, _frames: &[u8]) -> Result<()> {
        if !self.configured {
            return Err(AudioError::NotConfigured);
        }
        Ok(())
    }

    fn drain(&mut self) -> Result<()> {
        if !self.configured {
            return Err(AudioError::NotConfigured);
        }
        Ok(())
    }
}
