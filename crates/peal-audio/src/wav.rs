//! RIFF/WAVE container parsing
//!
//! Walks the chunk list of an in-memory WAV file, keeping the last
//! `fmt ` and `data` chunks and skipping everything else. The sample
//! data itself is never copied; [`DataRange`] points back into the
//! source bytes.

use bytes::Buf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WavError {
    #[error("not a RIFF container")]
    NotRiff,

    #[error("not a WAVE file")]
    NotWave,

    #[error("file truncated")]
    Truncated,

    #[error("fmt chunk too short")]
    BadFormat,

    #[error("missing fmt chunk")]
    MissingFormat,

    #[error("missing data chunk")]
    MissingData,
}

/// Decoded `fmt ` chunk fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSpec {
    pub compression: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub bytes_per_second: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl SampleSpec {
    /// Bytes per interleaved frame (all channels of one sample point)
    pub fn frame_size(&self) -> usize {
        self.channels as usize * (self.bits_per_sample as usize / 8)
    }
}

/// Location of the raw sample data within the source bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRange {
    pub offset: usize,
    pub len: usize,
}

/// A parsed WAV file: the sample format plus where the samples live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFile {
    pub spec: SampleSpec,
    pub data: DataRange,
}

impl WavFile {
    /// Parse the RIFF/WAVE container in `data`.
    ///
    /// Chunks may appear in any order; if a chunk type repeats the last
    /// one wins. Chunk payloads are padded to even length per RIFF,
    /// except that a final odd-sized chunk may end the file unpadded.
    pub fn parse(data: &[u8]) -> Result<Self, WavError> {
        let mut buf = data;
        if buf.remaining() < 12 {
            return Err(WavError::Truncated);
        }

        let mut tag = [0u8; 4];
        buf.copy_to_slice(&mut tag);
        if &tag != b"RIFF" {
            return Err(WavError::NotRiff);
        }
        let _riff_size = buf.get_u32_le();
        buf.copy_to_slice(&mut tag);
        if &tag != b"WAVE" {
            return Err(WavError::NotWave);
        }

        let mut spec = None;
        let mut range = None;

        while buf.remaining() >= 8 {
            let mut id = [0u8; 4];
            buf.copy_to_slice(&mut id);
            let size = buf.get_u32_le() as usize;
            if buf.remaining() < size {
                return Err(WavError::Truncated);
            }
            let offset = data.len() - buf.remaining();

            match &id {
                b"fmt " => spec = Some(parse_fmt(&data[offset..offset + size])?),
                b"data" => range = Some(DataRange { offset, len: size }),
                _ => {}
            }

            buf.advance(size);
            if size % 2 == 1 && buf.has_remaining() {
                buf.advance(1);
            }
        }

        Ok(Self {
            spec: spec.ok_or(WavError::MissingFormat)?,
            data: range.ok_or(WavError::MissingData)?,
        })
    }
}

fn parse_fmt(chunk: &[u8]) -> Result<SampleSpec, WavError> {
    if chunk.len() < 16 {
        return Err(WavError::BadFormat);
    }
    let mut buf = chunk;
    Ok(SampleSpec {
        compression: buf.get_u16_le(),
        channels: buf.get_u16_le(),
        sample_rate: buf.get_u32_le(),
        bytes_per_second: buf.get_u32_le(),
        block_align: buf.get_u16_le(),
        bits_per_sample: buf.get_u16_le(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::{BufMut, BytesMut};

    fn fmt_chunk(channels: u16, rate: u32, bits: u16) -> BytesMut {
        let mut chunk = BytesMut::new();
        chunk.put_slice(b"fmt ");
        chunk.put_u32_le(16);
        chunk.put_u16_le(1); // PCM
        chunk.put_u16_le(channels);
        chunk.put_u32_le(rate);
        chunk.put_u32_le(rate * channels as u32 * (bits as u32 / 8));
        chunk.put_u16_le(channels * bits / 8);
        chunk.put_u16_le(bits);
        chunk
    }

    fn wav_bytes(channels: u16, rate: u32, bits: u16, samples: &[u8]) -> Vec<u8> {
        let mut body = BytesMut::new();
        body.put_slice(b"WAVE");
        body.put_slice(&fmt_chunk(channels, rate, bits));
        body.put_slice(b"data");
        body.put_u32_le(samples.len() as u32);
        body.put_slice(samples);

        let mut out = BytesMut::new();
        out.put_slice(b"RIFF");
        out.put_u32_le(body.len() as u32);
        out.put_slice(&body);
        out.to_vec()
    }

    #[test]
    fn test_parse_basic_wav() {
        let samples = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let bytes = wav_bytes(2, 44100, 16, &samples);
        let wav = WavFile::parse(&bytes).expect("wav should parse");

        assert_eq!(wav.spec.compression, 1);
        assert_eq!(wav.spec.channels, 2);
        assert_eq!(wav.spec.sample_rate, 44100);
        assert_eq!(wav.spec.bits_per_sample, 16);
        assert_eq!(wav.spec.frame_size(), 4);
        assert_eq!(wav.data.len, samples.len());
        assert_eq!(&bytes[wav.data.offset..wav.data.offset + wav.data.len], &samples);
    }

    #[test]
    fn test_not_riff_rejected() {
        assert_eq!(WavFile::parse(b"RIFX0000WAVE"), Err(WavError::NotRiff));
        assert_eq!(
            WavFile::parse(&wav_bytes(1, 8000, 8, &[0; 4])[..8]),
            Err(WavError::Truncated)
        );
    }

    #[test]
    fn test_not_wave_rejected() {
        let mut bytes = wav_bytes(1, 8000, 8, &[0; 4]);
        bytes[8..12].copy_from_slice(b"AVI ");
        assert_eq!(WavFile::parse(&bytes), Err(WavError::NotWave));
    }

    #[test]
    fn test_truncated_chunk_rejected() {
        let mut bytes = wav_bytes(1, 8000, 8, &[0; 100]);
        bytes.truncate(bytes.len() - 10);
        assert_eq!(WavFile::parse(&bytes), Err(WavError::Truncated));
    }

    #[test]
    fn test_unknown_chunks_skipped() {
        let mut body = BytesMut::new();
        body.put_slice(b"WAVE");
        body.put_slice(b"LIST");
        body.put_u32_le(6);
        body.put_slice(b"junk12");
        body.put_slice(&fmt_chunk(1, 8000, 8));
        body.put_slice(b"data");
        body.put_u32_le(4);
        body.put_slice(&[9, 9, 9, 9]);

        let mut bytes = BytesMut::new();
        bytes.put_slice(b"RIFF");
        bytes.put_u32_le(body.len() as u32);
        bytes.put_slice(&body);

        let wav = WavFile::parse(&bytes).expect("wav should parse");
        assert_eq!(wav.spec.sample_rate, 8000);
        assert_eq!(wav.data.len, 4);
    }

    #[test]
    fn test_odd_chunk_padding() {
        // An odd-sized unknown chunk is padded to even length; the
        // chunks after it must still be found.
        let mut body = BytesMut::new();
        body.put_slice(b"WAVE");
        body.put_slice(b"note");
        body.put_u32_le(3);
        body.put_slice(b"abc\0"); // 3 bytes + pad
        body.put_slice(&fmt_chunk(1, 8000, 8));
        body.put_slice(b"data");
        body.put_u32_le(2);
        body.put_slice(&[1, 2]);

        let mut bytes = BytesMut::new();
        bytes.put_slice(b"RIFF");
        bytes.put_u32_le(body.len() as u32);
        bytes.put_slice(&body);

        let wav = WavFile::parse(&bytes).expect("wav should parse");
        assert_eq!(wav.data.len, 2);
        assert_eq!(bytes[wav.data.offset], 1);
    }

    #[test]
    fn test_final_odd_chunk_without_pad() {
        let mut body = BytesMut::new();
        body.put_slice(b"WAVE");
        body.put_slice(&fmt_chunk(1, 8000, 8));
        body.put_slice(b"data");
        body.put_u32_le(3);
        body.put_slice(&[1, 2, 3]); // no trailing pad byte

        let mut bytes = BytesMut::new();
        bytes.put_slice(b"RIFF");
        bytes.put_u32_le(body.len() as u32);
        bytes.put_slice(&body);

        let wav = WavFile::parse(&bytes).expect("wav should parse");
        assert_eq!(wav.data.len, 3);
    }

    #[test]
    fn test_missing_chunks_rejected() {
        let mut body = BytesMut::new();
        body.put_slice(b"WAVE");
        body.put_slice(&fmt_chunk(1, 8000, 8));
        let mut bytes = BytesMut::new();
        bytes.put_slice(b"RIFF");
        bytes.put_u32_le(body.len() as u32);
        bytes.put_slice(&body);
        assert_eq!(WavFile::parse(&bytes), Err(WavError::MissingData));

        let mut body = BytesMut::new();
        body.put_slice(b"WAVE");
        body.put_slice(b"data");
        body.put_u32_le(2);
        body.put_slice(&[0, 0]);
        let mut bytes = BytesMut::new();
        bytes.put_slice(b"RIFF");
        bytes.put_u32_le(body.len() as u32);
        bytes.put_slice(&body);
        assert_eq!(WavFile::parse(&bytes), Err(WavError::MissingFormat));
    }

    #[test]
    fn test_repeated_chunk_last_wins() {
        let mut body = BytesMut::new();
        body.put_slice(b"WAVE");
        body.put_slice(&fmt_chunk(1, 8000, 8));
        body.put_slice(&fmt_chunk(2, 44100, 16));
        body.put_slice(b"data");
        body.put_u32_le(4);
        body.put_slice(&[0; 4]);

        let mut bytes = BytesMut::new();
        bytes.put_slice(b"RIFF");
        bytes.put_u32_le(body.len() as u32);
        bytes.put_slice(&body);

        let wav = WavFile::parse(&bytes).expect("wav should parse");
        assert_eq!(wav.spec.channels, 2);
        assert_eq!(wav.spec.sample_rate, 44100);
    }

    #[test]
    fn test_short_fmt_rejected() {
        let mut body = BytesMut::new();
        body.put_slice(b"WAVE");
        body.put_slice(b"fmt ");
        body.put_u32_le(8);
        body.put_slice(&[0; 8]);
        body.put_slice(b"data");
        body.put_u32_le(0);

        let mut bytes = BytesMut::new();
        bytes.put_slice(b"RIFF");
        bytes.put_u32_le(body.len() as u32);
        bytes.put_slice(&body);

        assert_eq!(WavFile::parse(&bytes), Err(WavError::BadFormat));
    }
}
