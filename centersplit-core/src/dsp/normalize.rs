use crate::buffer::SampleBuffer;

/// Scales `samples` so the absolute peak equals `headroom`.
///
/// Returns the gain applied. Silent input is left untouched (gain 1.0).
pub fn normalize_peak(samples: &mut [f32], headroom: f32) -> f32 {
    let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    if peak <= 0.0 {
        return 1.0;
    }
    let gain = headroom / peak;
    samples.iter_mut().for_each(|s| *s *= gain);
    gain
}

/// Peak-normalizes each channel of `buffer` independently.
pub fn normalize_buffer(buffer: &mut SampleBuffer, headroom: f32) -> Vec<f32> {
    (0..buffer.num_channels())
        .map(|ch| normalize_peak(buffer.channel_mut(ch), headroom))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_peak_to_headroom() {
        let mut samples = vec![0.1, -0.4, 0.2];
        let gain = normalize_peak(&mut samples, 0.95);
        assert!((gain - 0.95 / 0.4).abs() < 1e-6);
        let peak = samples.iter().fold(0.0f32, |a, s| a.max(s.abs()));
        assert!((peak - 0.95).abs() < 1e-6);
    }

    #[test]
    fn normalizing_twice_is_a_fixed_point() {
        let mut samples: Vec<f32> = (0..500).map(|i| ((i as f32) * 0.013).sin() * 3.0).collect();
        normalize_peak(&mut samples, 0.95);
        let once = samples.clone();
        let gain = normalize_peak(&mut samples, 0.95);
        assert!((gain - 1.0).abs() < 1e-6);
        for (a, b) in once.iter().zip(&samples) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn silent_and_empty_input_is_untouched() {
        let mut silent = vec![0.0f32; 16];
        assert_eq!(normalize_peak(&mut silent, 0.95), 1.0);
        assert!(silent.iter().all(|&s| s == 0.0));

        let mut empty: Vec<f32> = Vec::new();
        assert_eq!(normalize_peak(&mut empty, 0.95), 1.0);
    }

    #[test]
    fn channels_are_normalized_independently() {
        let mut buf = SampleBuffer::stereo(vec![0.5, -0.25], vec![0.0, 0.0], 44100).unwrap();
        let gains = normalize_buffer(&mut buf, 0.95);
        assert_eq!(gains.len(), 2);
        assert!((buf.peak(0) - 0.95).abs() < 1e-6);
        assert_eq!(buf.peak(1), 0.0);
        assert_eq!(gains[1], 1.0);
    }
}
