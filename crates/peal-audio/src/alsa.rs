//! ALSA playback backend
//!
//! Only compiled with the `alsa` feature. Maps the [`PcmSink`]
//! contract onto the alsa crate: interleaved access, blocking writes,
//! drain on completion.

use alsa::device_name::HintIter;
use alsa::pcm::{Access, Format, HwParams, PCM};
use alsa::{Direction, ValueOr};
use tracing::debug;

use crate::error::{AudioError, Result};
use crate::sink::{PcmSink, SampleFormat};
use crate::wav::SampleSpec;

fn device_err(context: &str, e: alsa::Error) -> AudioError {
    AudioError::Device(format!("{}: {}", context, e))
}

/// Playback sink on a named ALSA PCM device (`default`, `hw:0,0`, ...).
pub struct AlsaSink {
    pcm: PCM,
}

impl AlsaSink {
    /// Open the device for blocking playback. Fails if the device does
    /// not exist or is busy.
    pub fn open(device: &str) -> Result<Self> {
        let pcm =
            PCM::new(device, Direction::Playback, false).map_err(|e| device_err(device, e))?;
        Ok(Self { pcm })
    }
}

impl PcmSink for AlsaSink {
    fn configure(&mut self, spec: &SampleSpec, period_frames: usize) -> Result<usize> {
        let format = match SampleFormat::from_bits(spec.bits_per_sample)? {
            SampleFormat::U8 => Format::U8,
            SampleFormat::S16Le => Format::S16LE,
            SampleFormat::S24Le => Format::S24LE,
            SampleFormat::S32Le => Format::S32LE,
        };

        let hwp = HwParams::any(&self.pcm).map_err(|e| device_err("hw params", e))?;
        hwp.set_access(Access::RWInterleaved)
            .map_err(|e| device_err("set access", e))?;
        hwp.set_format(format)
            .map_err(|e| device_err("set format", e))?;
        hwp.set_rate(spec.sample_rate, ValueOr::Nearest)
            .map_err(|e| device_err("set rate", e))?;
        hwp.set_channels(spec.channels as u32)
            .map_err(|e| device_err("set channels", e))?;
        let granted = hwp
            .set_period_size_near(period_frames as alsa::pcm::Frames, ValueOr::Nearest)
            .map_err(|e| device_err("set period size", e))?;
        self.pcm
            .hw_params(&hwp)
            .map_err(|e| device_err("apply hw params", e))?;

        debug!(
            "alsa configured: {:?}, {} Hz, {} ch, period {} frames",
            format, spec.sample_rate, spec.channels, granted
        );
        Ok(granted as usize)
    }

    fn write(&mut self, frames: &[u8]) -> Result<()> {
        let io = self.pcm.io_bytes();
        io.writei(frames).map_err(|e| device_err("writei", e))?;
        Ok(())
    }

    fn drain(&mut self) -> Result<()> {
        self.pcm.drain().map_err(|e| device_err("drain", e))
    }
}

/// Playback-capable PCM device names with their descriptions.
pub fn playback_devices() -> Result<Vec<(String, String)>> {
    let hints = HintIter::new_str(None, "pcm").map_err(|e| device_err("pcm hints", e))?;
    let mut devices = Vec::new();
    for hint in hints {
        if matches!(hint.direction, Some(Direction::Capture)) {
            continue;
        }
        if let Some(name) = hint.name {
            devices.push((name, hint.desc.unwrap_or_default()));
        }
    }
    Ok(devices)
}
