//! WAV playback through a sink

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::sink::PcmSink;
use crate::wav::WavFile;

/// Period size requested from the device, in frames. The device may
/// grant something else; writes follow the granted size.
const PERIOD_FRAMES: usize = 128;

/// Read, parse, and stream one WAV file through `sink`.
///
/// Blocks until the sink has drained, so the sound has finished
/// playing when this returns.
pub fn play_wav(sink: &mut dyn PcmSink, path: &Path) -> Result<()> {
    let bytes = std::fs::read(path)?;
    let wav = WavFile::parse(&bytes)?;
    let granted = sink.configure(&wav.spec, PERIOD_FRAMES)?;

    let chunk_bytes = (granted.max(1) * wav.spec.frame_size()).max(1);
    let data = &bytes[wav.data.offset..wav.data.offset + wav.data.len];
    debug!(
        "playing {}: {} Hz, {} ch, {} bit, {} bytes, period {} frames",
        path.display(),
        wav.spec.sample_rate,
        wav.spec.channels,
        wav.spec.bits_per_sample,
        data.len(),
        granted
    );

    for chunk in data.chunks(chunk_bytes) {
        sink.write(chunk)?;
    }
    sink.drain()
}
