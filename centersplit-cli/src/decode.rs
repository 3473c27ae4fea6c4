use std::io::Cursor;

use centersplit_core::{AudioDecoder, Result, SampleBuffer, SeparationError};
use symphonia::core::audio::SampleBuffer as PcmBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decodes WAV, AIFF, FLAC, MP3, OGG Vorbis and AAC/M4A via Symphonia.
///
/// Mono and stereo input keep their channel count. Anything wider is
/// rejected.
pub struct SymphoniaDecoder;

fn decode_err(what: &str, e: impl std::fmt::Display) -> SeparationError {
    SeparationError::Decode(format!("{what}: {e}"))
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, bytes: &[u8], extension: Option<&str>) -> Result<SampleBuffer> {
        let source = Cursor::new(bytes.to_vec());
        let mss = MediaSourceStream::new(Box::new(source), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = extension {
            hint.with_extension(ext);
        }

        let detected = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| decode_err("unsupported audio format", e))?;

        let mut format = detected.format;

        let track = format
            .default_track()
            .ok_or_else(|| SeparationError::Decode("no audio track found".into()))?
            .clone();

        // Channel count may be unknown upfront for some codecs (e.g. AAC/M4A).
        // We'll detect it from the first decoded packet if needed.
        let mut num_channels = track.codec_params.channels.map(|c| c.count());
        if let Some(ch) = num_channels {
            check_channels(ch)?;
        }

        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| SeparationError::Decode("could not determine sample rate".into()))?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| decode_err("failed to create audio decoder", e))?;

        let mut channels: Vec<Vec<f32>> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => return Err(decode_err("error reading audio packet", e)),
            };

            if packet.track_id() != track.id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                Err(symphonia::core::errors::Error::DecodeError(e)) => {
                    log::debug!("skipping undecodable packet: {e}");
                    continue;
                }
                Err(e) => return Err(decode_err("error decoding audio", e)),
            };

            let spec = *decoded.spec();
            let ch = spec.channels.count();
            let expected = match num_channels {
                Some(n) => n,
                None => {
                    check_channels(ch)?;
                    num_channels = Some(ch);
                    ch
                }
            };
            if ch != expected {
                return Err(SeparationError::Decode(format!(
                    "channel count changed mid-stream from {expected} to {ch}"
                )));
            }
            if channels.is_empty() {
                channels = vec![Vec::new(); ch];
            }

            let mut pcm = PcmBuffer::<f32>::new(decoded.capacity() as u64, spec);
            pcm.copy_interleaved_ref(decoded);
            for frame in pcm.samples().chunks_exact(ch) {
                for (out, &s) in channels.iter_mut().zip(frame) {
                    out.push(s);
                }
            }
        }

        // A stream with a known layout but no frames is valid, just empty.
        if channels.is_empty() {
            match num_channels {
                Some(n) => channels = vec![Vec::new(); n],
                None => {
                    return Err(SeparationError::Decode("no audio samples decoded".into()));
                }
            }
        }

        log::debug!(
            "decoded {} channel(s), {} samples at {} Hz",
            channels.len(),
            channels[0].len(),
            sample_rate
        );
        SampleBuffer::new(channels, sample_rate)
    }
}

fn check_channels(count: usize) -> Result<()> {
    if count == 0 || count > 2 {
        return Err(SeparationError::Decode(format!(
            "expected mono or stereo audio, got {count} channel(s)"
        )));
    }
    Ok(())
}
