pub mod buffer;
pub mod config;
pub mod decoder;
pub mod dsp;
pub mod error;
pub mod listener;
pub mod separator;
pub mod stem;
pub mod wav;

pub use buffer::SampleBuffer;
pub use config::{MaskConfig, MaskDomain, SeparatorConfig};
pub use decoder::AudioDecoder;
pub use dsp::peaks::WaveformPeaks;
pub use error::{Result, SeparationError};
pub use listener::{LogListener, NoOpListener, SeparationEvent, SeparationListener};
pub use separator::Separator;
pub use stem::{Separation, Stem, StemKind};
pub use wav::encode_wav;

/// Analysis frame length in samples.
pub const FRAME_SIZE: usize = 4096;
/// Frames overlapping any one sample; hop is `FRAME_SIZE / OVERLAP`.
pub const OVERLAP: usize = 4;
/// Peak level the normalizer scales each output channel to.
pub const HEADROOM: f32 = 0.95;
