//! peal audio stack
//!
//! Everything between a command and a speaker: RIFF/WAVE parsing, the
//! on/off sound bank, the playback sink boundary, and the ALSA backend
//! (behind the `alsa` feature).
//!
//! This crate provides:
//! - WAV container parsing ([`WavFile`])
//! - The playback device boundary ([`PcmSink`], [`NullSink`])
//! - Command-to-file mapping ([`SoundBank`])
//! - Chunked playback ([`play_wav`])

pub mod bank;
pub mod error;
pub mod play;
pub mod sink;
pub mod wav;

#[cfg(feature = "alsa")]
pub mod alsa;

pub use bank::{SoundBank, Switch};
pub use error::{AudioError, Result};
pub use play::play_wav;
pub use sink::{NullSink, PcmSink, SampleFormat};
pub use wav::{DataRange, SampleSpec, WavError, WavFile};

#[cfg(feature = "alsa")]
pub use self::alsa::{playback_devices, AlsaSink};
