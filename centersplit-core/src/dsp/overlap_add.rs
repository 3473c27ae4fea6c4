/// Accumulates processed frames into a full-length output with a fixed gain.
///
/// With the default 4x overlap every output sample receives contributions
/// from four frames, so each frame is scaled by `hop / frame`.
#[derive(Debug, Clone, Copy)]
pub struct OverlapAdd {
    gain: f32,
}

impl OverlapAdd {
    pub fn new(frame_size: usize, hop_size: usize) -> Self {
        Self::with_gain(hop_size as f32 / frame_size as f32)
    }

    pub fn with_gain(gain: f32) -> Self {
        Self { gain }
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Adds `frame * gain` into `output[start..]`, dropping positions past the end.
    pub fn accumulate(&self, output: &mut [f32], start: usize, frame: &[f32]) {
        let Some(dst) = output.get_mut(start..) else {
            return;
        };
        dst.iter_mut()
            .zip(frame)
            .for_each(|(o, &s)| *o += s * self.gain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::segmenter::Segmenter;

    #[test]
    fn default_gain_is_quarter_for_four_times_overlap() {
        assert_eq!(OverlapAdd::new(4096, 1024).gain(), 0.25);
    }

    #[test]
    fn drops_samples_past_output_end() {
        let ola = OverlapAdd::with_gain(1.0);
        let mut out = vec![0.0; 5];
        ola.accumulate(&mut out, 3, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(out, vec![0.0, 0.0, 0.0, 1.0, 2.0]);
        ola.accumulate(&mut out, 7, &[1.0]);
        assert_eq!(out, vec![0.0, 0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn windowed_frames_reconstruct_half_scale_interior() {
        // Periodic Hann frames at 4x overlap sum to 2, times the 0.25 gain.
        let frame_size = 256;
        let hop = 64;
        let seg = Segmenter::new(frame_size, hop);
        let ola = OverlapAdd::new(frame_size, hop);
        let signal: Vec<f32> = (0..2048).map(|i| ((i as f32) * 0.05).sin()).collect();
        let mut out = vec![0.0; signal.len()];
        for (start, frame) in seg.frames(&signal) {
            ola.accumulate(&mut out, start, &frame);
        }
        for i in frame_size..signal.len() {
            assert!(
                (out[i] - 0.5 * signal[i]).abs() < 1e-4,
                "sample {i}: {} vs {}",
                out[i],
                0.5 * signal[i]
            );
        }
    }
}
