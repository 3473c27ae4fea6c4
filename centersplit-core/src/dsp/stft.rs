use std::sync::Arc;

use realfft::{num_complex::Complex, ComplexToReal, RealFftPlanner, RealToComplex};

use super::mask::CenterMask;
use crate::{Result, SeparationError};

/// Frequency-domain variant of the center mask.
///
/// Each windowed frame pair is transformed with a real FFT; the mid/side
/// ratio and band weighting are evaluated per bin (`freq = k * rate / F`);
/// vocal and instrumental spectra are transformed back and weighted by the
/// synthesis window. With the per-frame gain from [`Self::overlap_gain`] a
/// unity mask reconstructs the input exactly at 4x overlap.
pub struct SpectralSplitter {
    frame_size: usize,
    window: Vec<f32>,
    forward_plan: Arc<dyn RealToComplex<f32>>,
    inverse_plan: Arc<dyn ComplexToReal<f32>>,
    time_buf: Vec<f32>,
    left_spec: Vec<Complex<f32>>,
    right_spec: Vec<Complex<f32>>,
    vocal_spec: Vec<Complex<f32>>,
    instrumental_spec: Vec<Complex<f32>>,
    forward_scratch: Vec<Complex<f32>>,
    inverse_scratch: Vec<Complex<f32>>,
}

impl SpectralSplitter {
    /// `window` must be the analysis window used to produce the frames.
    pub fn new(window: &[f32]) -> Self {
        let frame_size = window.len();
        let mut planner = RealFftPlanner::<f32>::new();
        let forward_plan = planner.plan_fft_forward(frame_size);
        let inverse_plan = planner.plan_fft_inverse(frame_size);
        SpectralSplitter {
            frame_size,
            window: window.to_vec(),
            time_buf: forward_plan.make_input_vec(),
            left_spec: forward_plan.make_output_vec(),
            right_spec: forward_plan.make_output_vec(),
            vocal_spec: inverse_plan.make_input_vec(),
            instrumental_spec: inverse_plan.make_input_vec(),
            forward_scratch: forward_plan.make_scratch_vec(),
            inverse_scratch: inverse_plan.make_scratch_vec(),
            forward_plan,
            inverse_plan,
        }
    }

    /// Overlap-add gain that makes analysis × synthesis windows sum to one
    /// for the given hop.
    pub fn overlap_gain(&self, hop_size: usize) -> f32 {
        let energy: f32 = self.window.iter().map(|w| w * w).sum();
        hop_size as f32 / energy
    }

    /// Splits one windowed frame pair. `vocals` and `instrumental` receive
    /// time-domain frames ready for overlap-add.
    pub fn split_frame(
        &mut self,
        mask: &CenterMask,
        left: &[f32],
        right: &[f32],
        sample_rate: u32,
        vocals: &mut [f32],
        instrumental: &mut [f32],
    ) -> Result<()> {
        self.time_buf.copy_from_slice(left);
        self.forward_plan
            .process_with_scratch(&mut self.time_buf, &mut self.left_spec, &mut self.forward_scratch)
            .map_err(|e| SeparationError::Dsp(format!("forward FFT failed: {}", e)))?;

        self.time_buf.copy_from_slice(right);
        self.forward_plan
            .process_with_scratch(&mut self.time_buf, &mut self.right_spec, &mut self.forward_scratch)
            .map_err(|e| SeparationError::Dsp(format!("forward FFT failed: {}", e)))?;

        let hz_per_bin = sample_rate as f32 / self.frame_size as f32;
        let residual_gain = mask.config().residual_gain;

        for (k, (&l, &r)) in self.left_spec.iter().zip(self.right_spec.iter()).enumerate() {
            let mid = (l + r) * 0.5;
            let side = (l - r) * 0.5;
            let ratio = mask
                .ratio_from_energies(f64::from(mid.norm_sqr()), f64::from(side.norm_sqr()));
            let weight = mask.band_weight(ratio, k as f32 * hz_per_bin);
            let vocal = mid * weight;
            self.vocal_spec[k] = vocal;
            self.instrumental_spec[k] = l - vocal * residual_gain;
        }

        let bins = self.vocal_spec.len();
        for spec in [&mut self.vocal_spec, &mut self.instrumental_spec] {
            // realfft requires DC and Nyquist to have zero imaginary part
            spec[0].im = 0.0;
            spec[bins - 1].im = 0.0;
        }

        self.inverse_into(Part::Vocal, vocals)?;
        self.inverse_into(Part::Instrumental, instrumental)
    }

    fn inverse_into(&mut self, part: Part, out: &mut [f32]) -> Result<()> {
        let spec = match part {
            Part::Vocal => &mut self.vocal_spec,
            Part::Instrumental => &mut self.instrumental_spec,
        };
        self.inverse_plan
            .process_with_scratch(spec, out, &mut self.inverse_scratch)
            .map_err(|e| SeparationError::Dsp(format!("inverse FFT failed: {}", e)))?;

        // realfft's inverse is unnormalized
        let norm = 1.0 / self.frame_size as f32;
        out.iter_mut()
            .zip(self.window.iter())
            .for_each(|(x, w)| *x *= w * norm);
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum Part {
    Vocal,
    Instrumental,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MaskConfig;
    use crate::dsp::overlap_add::OverlapAdd;
    use crate::dsp::segmenter::Segmenter;

    /// A mask that passes everything through as "vocal" and nothing as residual.
    fn unity_mask() -> CenterMask {
        CenterMask::new(MaskConfig {
            low_exponent: 0,
            mid_exponent: 0,
            high_exponent: 0,
            low_scale: 1.0,
            mid_scale: 1.0,
            high_scale: 1.0,
            residual_gain: 1.0,
            ..Default::default()
        })
    }

    #[test]
    fn unity_mask_reconstructs_interior() {
        let frame_size = 512;
        let hop = frame_size / 4;
        let seg = Segmenter::new(frame_size, hop);
        let mut splitter = SpectralSplitter::new(seg.window());
        let ola = OverlapAdd::with_gain(splitter.overlap_gain(hop));
        let mask = unity_mask();

        let signal: Vec<f32> = (0..8192)
            .map(|i| (i as f32 * 0.031).sin() * 0.7 + (i as f32 * 0.2).cos() * 0.2)
            .collect();

        let mut frame = vec![0.0; frame_size];
        let mut vocals = vec![0.0; frame_size];
        let mut inst = vec![0.0; frame_size];
        let mut out_vocals = vec![0.0; signal.len()];
        let mut out_inst = vec![0.0; signal.len()];

        for start in seg.schedule(signal.len()).starts() {
            seg.frame_into(&signal, start, &mut frame);
            splitter
                .split_frame(&mask, &frame, &frame, 44100, &mut vocals, &mut inst)
                .unwrap();
            ola.accumulate(&mut out_vocals, start, &vocals);
            ola.accumulate(&mut out_inst, start, &inst);
        }

        for i in frame_size..signal.len() - frame_size {
            assert!(
                (out_vocals[i] - signal[i]).abs() < 1e-3,
                "sample {i}: {} vs {}",
                out_vocals[i],
                signal[i]
            );
            assert!(out_inst[i].abs() < 1e-3);
        }
    }

    #[test]
    fn silence_produces_zero_output() {
        let seg = Segmenter::new(256, 64);
        let mut splitter = SpectralSplitter::new(seg.window());
        let zeros = vec![0.0; 256];
        let mut vocals = vec![1.0; 256];
        let mut inst = vec![1.0; 256];
        splitter
            .split_frame(&CenterMask::default(), &zeros, &zeros, 44100, &mut vocals, &mut inst)
            .unwrap();
        assert!(vocals.iter().chain(&inst).all(|&s| s == 0.0));
    }
}
