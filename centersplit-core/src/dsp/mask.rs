//! Frequency-banded mid/side "center" mask.
//!
//! A component is considered vocal-like when its mid (L+R) energy dominates
//! its side (L-R) energy. The proximity-to-center ratio is then raised to a
//! band-dependent power and scaled, suppressing centered bass and highs more
//! aggressively than the vocal formant range.

use crate::config::MaskConfig;

/// Vocal and instrumental estimates for one position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split {
    pub vocal: f32,
    pub instrumental: f32,
}

pub struct CenterMask {
    config: MaskConfig,
}

impl CenterMask {
    pub fn new(config: MaskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    /// `midEnergy / (midEnergy + sideEnergy)` with epsilon added to both
    /// energies.
    ///
    /// Evaluated in f64 so the epsilon survives large energies: the result
    /// stays strictly inside (0, 1) for energies up to about 1e9.
    pub fn ratio_from_energies(&self, mid_energy: f64, side_energy: f64) -> f64 {
        let epsilon = f64::from(self.config.epsilon);
        let mid_energy = mid_energy + epsilon;
        let side_energy = side_energy + epsilon;
        mid_energy / (mid_energy + side_energy)
    }

    pub fn ratio(&self, left: f32, right: f32) -> f64 {
        let mid = (f64::from(left) + f64::from(right)) / 2.0;
        let side = (f64::from(left) - f64::from(right)) / 2.0;
        self.ratio_from_energies(mid * mid, side * side)
    }

    /// Applies the band exponent and scale for `freq_hz` to `ratio`.
    pub fn band_weight(&self, ratio: f64, freq_hz: f32) -> f32 {
        let c = &self.config;
        let (exponent, scale) = if freq_hz < c.low_cutoff_hz {
            (c.low_exponent, c.low_scale)
        } else if freq_hz < c.high_cutoff_hz {
            (c.mid_exponent, c.mid_scale)
        } else {
            (c.high_exponent, c.high_scale)
        };
        (ratio.powi(exponent) * f64::from(scale)) as f32
    }

    /// Splits one windowed stereo position into vocal and instrumental parts.
    pub fn split(&self, left: f32, right: f32, freq_hz: f32) -> Split {
        let mid = (left + right) / 2.0;
        let weight = self.band_weight(self.ratio(left, right), freq_hz);
        let vocal = mid * weight;
        Split {
            vocal,
            instrumental: left - vocal * self.config.residual_gain,
        }
    }

    /// Applies [`Self::split`] to every position of a windowed frame pair.
    ///
    /// The in-frame index stands in for frequency: `freq = i / F * sample_rate`.
    /// For mono input pass the same frame as `left` and `right`.
    pub fn apply_frame(
        &self,
        left: &[f32],
        right: &[f32],
        sample_rate: u32,
        vocals: &mut [f32],
        instrumental: &mut [f32],
    ) {
        let frame_size = left.len();
        debug_assert!(
            right.len() == frame_size
                && vocals.len() == frame_size
                && instrumental.len() == frame_size
        );
        let hz_per_index = sample_rate as f32 / frame_size as f32;

        for (i, ((&l, &r), (v, inst))) in left
            .iter()
            .zip(right)
            .zip(vocals.iter_mut().zip(instrumental.iter_mut()))
            .enumerate()
        {
            let split = self.split(l, r, i as f32 * hz_per_index);
            *v = split.vocal;
            *inst = split.instrumental;
        }
    }
}

impl Default for CenterMask {
    fn default() -> Self {
        Self::new(MaskConfig::default())
    }
}
