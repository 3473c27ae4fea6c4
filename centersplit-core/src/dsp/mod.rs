pub mod mask;
pub mod normalize;
pub mod overlap_add;
pub mod peaks;
pub mod segmenter;
pub mod stft;
pub mod window;
