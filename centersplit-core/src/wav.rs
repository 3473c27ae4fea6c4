//! 16-bit linear PCM WAV encoding, held in memory.
//!
//! Mono and stereo output uses the canonical 44-byte `RIFF`/`fmt `/`data`
//! layout with interleaved little-endian i16 samples.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::buffer::SampleBuffer;
use crate::{Result, SeparationError};

pub const HEADER_LEN: usize = 44;
const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: usize = 2;

/// Convert a float sample to i16: clamp to [-1, 1], scale by 0x7FFF for
/// positive values and 0x8000 for negative ones, truncate toward zero.
pub fn sample_to_i16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

fn encode_err(e: hound::Error) -> SeparationError {
    SeparationError::Encode(e.to_string())
}

/// Encode `buffer` as a 16-bit PCM WAV file held in memory.
pub fn encode_wav(buffer: &SampleBuffer) -> Result<Vec<u8>> {
    let channels = u16::try_from(buffer.num_channels()).map_err(|_| {
        SeparationError::Encode(format!(
            "{} channels exceed the WAV limit",
            buffer.num_channels()
        ))
    })?;
    let block_align = channels as usize * BYTES_PER_SAMPLE;
    let sample_rate = buffer.sample_rate();

    // hound keeps these header fields in u32
    let data_len = buffer
        .len()
        .checked_mul(block_align)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|&n| n <= u32::MAX - 36)
        .ok_or_else(|| {
            SeparationError::Encode(format!(
                "{} frames of {} channels exceed the 4 GiB WAV limit",
                buffer.len(),
                channels
            ))
        })?;
    if sample_rate.checked_mul(block_align as u32).is_none() {
        return Err(SeparationError::Encode(format!(
            "byte rate of {} Hz x {} channels overflows the WAV header",
            sample_rate, channels
        )));
    }

    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };

    let mut out = Vec::with_capacity(HEADER_LEN + data_len as usize);
    let mut writer = WavWriter::new(Cursor::new(&mut out), spec).map_err(encode_err)?;

    let chans = buffer.channels();
    for i in 0..buffer.len() {
        for ch in chans {
            writer.write_sample(sample_to_i16(ch[i])).map_err(encode_err)?;
        }
    }
    writer.finalize().map_err(encode_err)?;

    Ok(out)
}
