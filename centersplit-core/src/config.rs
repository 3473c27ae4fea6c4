//! Tunable parameters for the separator.

use serde::{Deserialize, Serialize};

use crate::{Result, SeparationError};

/// Where the center-channel mask is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskDomain {
    /// Per windowed sample, treating the in-frame index as a frequency proxy.
    #[default]
    Sample,
    /// Per real-FFT bin of each windowed frame, resynthesized with an inverse FFT.
    Spectral,
}

impl MaskDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaskDomain::Sample => "sample",
            MaskDomain::Spectral => "spectral",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sample" => Some(MaskDomain::Sample),
            "spectral" => Some(MaskDomain::Spectral),
            _ => None,
        }
    }
}

/// Shape of the frequency-banded mid/side mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Added to mid and side energies to keep the ratio finite.
    pub epsilon: f32,
    /// Frequencies below this are treated as bass (Hz).
    pub low_cutoff_hz: f32,
    /// Frequencies at or above this are treated as highs (Hz).
    pub high_cutoff_hz: f32,
    pub low_exponent: i32,
    pub low_scale: f32,
    pub mid_exponent: i32,
    pub mid_scale: f32,
    pub high_exponent: i32,
    pub high_scale: f32,
    /// Fraction of the vocal estimate subtracted from the source channel
    /// to form the instrumental.
    pub residual_gain: f32,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-6,
            low_cutoff_hz: 150.0,
            high_cutoff_hz: 5000.0,
            low_exponent: 8,
            low_scale: 0.3,
            mid_exponent: 4,
            mid_scale: 1.0,
            high_exponent: 6,
            high_scale: 0.5,
            residual_gain: 0.95,
        }
    }
}

/// Separator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparatorConfig {
    /// Samples per analysis frame (default: 4096).
    pub frame_size: usize,
    /// Frames overlapping any one sample; hop = frame_size / overlap (default: 4).
    pub overlap: usize,
    /// Peak level each output channel is normalized to (default: 0.95).
    pub headroom: f32,
    /// Frames between progress reports (default: 100).
    pub progress_interval: usize,
    pub mask: MaskConfig,
    pub domain: MaskDomain,
}

impl Default for SeparatorConfig {
    fn default() -> Self {
        Self {
            frame_size: crate::FRAME_SIZE,
            overlap: crate::OVERLAP,
            headroom: crate::HEADROOM,
            progress_interval: 100,
            mask: MaskConfig::default(),
            domain: MaskDomain::Sample,
        }
    }
}

impl SeparatorConfig {
    pub fn hop_size(&self) -> usize {
        self.frame_size / self.overlap
    }

    /// Check that the parameters describe a usable frame schedule and mask.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SeparationError::InvalidInput(msg));

        if self.frame_size < 2 || self.frame_size % 2 != 0 {
            return invalid(format!(
                "frame_size must be an even number >= 2, got {}",
                self.frame_size
            ));
        }
        if self.domain == MaskDomain::Spectral && !self.frame_size.is_power_of_two() {
            return invalid(format!(
                "spectral domain needs a power-of-two frame_size, got {}",
                self.frame_size
            ));
        }
        if self.overlap < 2 || self.frame_size % self.overlap != 0 {
            return invalid(format!(
                "overlap must be >= 2 and divide frame_size {}, got {}",
                self.frame_size, self.overlap
            ));
        }
        if !(self.headroom > 0.0 && self.headroom <= 1.0) {
            return invalid(format!("headroom must be in (0, 1], got {}", self.headroom));
        }
        if self.progress_interval == 0 {
            return invalid("progress_interval must be positive".into());
        }

        let m = &self.mask;
        if !(m.epsilon > 0.0) {
            return invalid(format!("mask epsilon must be positive, got {}", m.epsilon));
        }
        if !(m.low_cutoff_hz >= 0.0 && m.low_cutoff_hz < m.high_cutoff_hz) {
            return invalid(format!(
                "mask cutoffs must satisfy 0 <= low < high, got {} / {}",
                m.low_cutoff_hz, m.high_cutoff_hz
            ));
        }
        if m.low_exponent < 0 || m.mid_exponent < 0 || m.high_exponent < 0 {
            return invalid("mask exponents must be non-negative".into());
        }
        if m.low_scale < 0.0 || m.mid_scale < 0.0 || m.high_scale < 0.0 {
            return invalid("mask scales must be non-negative".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SeparatorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.hop_size(), 1024);
    }

    #[test]
    fn rejects_overlap_that_does_not_divide_frame() {
        let config = SeparatorConfig {
            frame_size: 1000,
            overlap: 3,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn spectral_requires_power_of_two() {
        let config = SeparatorConfig {
            frame_size: 1200,
            overlap: 4,
            domain: MaskDomain::Spectral,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let sample = SeparatorConfig {
            domain: MaskDomain::Sample,
            ..config
        };
        sample.validate().unwrap();
    }

    #[test]
    fn rejects_bad_headroom_and_cutoffs() {
        let config = SeparatorConfig {
            headroom: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = SeparatorConfig::default();
        config.mask.low_cutoff_hz = 6000.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SeparatorConfig =
            serde_json::from_str(r#"{ "frame_size": 2048, "domain": "spectral", "mask": { "residual_gain": 1.0 } }"#)
                .unwrap();
        assert_eq!(config.frame_size, 2048);
        assert_eq!(config.overlap, 4);
        assert_eq!(config.domain, MaskDomain::Spectral);
        assert_eq!(config.mask.residual_gain, 1.0);
        assert_eq!(config.mask.low_cutoff_hz, 150.0);
    }

    #[test]
    fn domain_names_round_trip() {
        for d in [MaskDomain::Sample, MaskDomain::Spectral] {
            assert_eq!(MaskDomain::parse(d.as_str()), Some(d));
        }
        assert_eq!(MaskDomain::parse("fft"), None);
    }
}
