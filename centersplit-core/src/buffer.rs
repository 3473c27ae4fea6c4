use crate::{Result, SeparationError};

/// Decoded multichannel PCM audio.
///
/// Every channel has the same length and shares one sample rate. Samples are
/// nominally in `[-1, 1]` but may exceed that range while processing; they are
/// only clipped when encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Build a buffer from per-channel sample vectors.
    ///
    /// Fails if there are no channels, the sample rate is zero, or the
    /// channels disagree on length. Zero-length channels are allowed.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if channels.is_empty() {
            return Err(SeparationError::InvalidInput(
                "sample buffer needs at least one channel".into(),
            ));
        }
        if sample_rate == 0 {
            return Err(SeparationError::InvalidInput(
                "sample rate must be positive".into(),
            ));
        }
        let len = channels[0].len();
        if let Some((i, ch)) = channels.iter().enumerate().find(|(_, c)| c.len() != len) {
            return Err(SeparationError::InvalidInput(format!(
                "channel {} has {} samples, expected {}",
                i,
                ch.len(),
                len
            )));
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::new(vec![samples], sample_rate)
    }

    pub fn stereo(left: Vec<f32>, right: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::new(vec![left, right], sample_rate)
    }

    /// An all-zero buffer with the given shape.
    pub fn silent(num_channels: usize, len: usize, sample_rate: u32) -> Result<Self> {
        Self::new(vec![vec![0.0; len]; num_channels], sample_rate)
    }

    /// A zeroed buffer with the same shape and rate as `self`.
    pub(crate) fn zeroed_like(&self) -> Self {
        Self {
            channels: vec![vec![0.0; self.len()]; self.num_channels()],
            sample_rate: self.sample_rate,
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_secs(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.channels[index]
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Largest absolute sample value in a channel (0.0 when empty).
    pub fn peak(&self, index: usize) -> f32 {
        self.channels[index]
            .iter()
            .fold(0.0f32, |acc, s| acc.max(s.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_channel_lengths() {
        let err = SampleBuffer::stereo(vec![0.0; 4], vec![0.0; 3], 44100).unwrap_err();
        assert!(matches!(err, SeparationError::InvalidInput(_)));
    }

    #[test]
    fn rejects_zero_channels_and_zero_rate() {
        assert!(SampleBuffer::new(Vec::new(), 44100).is_err());
        assert!(SampleBuffer::mono(vec![0.0; 4], 0).is_err());
    }

    #[test]
    fn empty_channels_are_valid() {
        let buf = SampleBuffer::stereo(Vec::new(), Vec::new(), 48000).unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.num_channels(), 2);
        assert_eq!(buf.peak(0), 0.0);
        assert_eq!(buf.duration_secs(), 0.0);
    }

    #[test]
    fn peak_uses_absolute_value() {
        let buf = SampleBuffer::mono(vec![0.25, -0.75, 0.5], 8000).unwrap();
        assert_eq!(buf.peak(0), 0.75);
    }

    #[test]
    fn zeroed_like_matches_shape() {
        let buf = SampleBuffer::stereo(vec![1.0; 5], vec![-1.0; 5], 22050).unwrap();
        let zero = buf.zeroed_like();
        assert_eq!(zero.num_channels(), 2);
        assert_eq!(zero.len(), 5);
        assert_eq!(zero.sample_rate(), 22050);
        assert!(zero.channels().iter().flatten().all(|&s| s == 0.0));
    }
}
