use crate::buffer::SampleBuffer;
use crate::Result;

/// Host-provided audio decoding.
///
/// Turns an encoded file (MP3, WAV, OGG, FLAC, M4A, ...) into PCM. The
/// separator never decodes on its own; callers pass a decoder explicitly.
/// Implementations report failures as [`crate::SeparationError::Decode`].
pub trait AudioDecoder {
    /// `extension` is a file-extension hint such as `"mp3"`, if known.
    fn decode(&self, bytes: &[u8], extension: Option<&str>) -> Result<SampleBuffer>;
}
