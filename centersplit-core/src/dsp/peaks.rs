/// Downsampled min/max peaks for waveform rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformPeaks {
    /// (min, max) per bucket.
    pub peaks: Vec<(f32, f32)>,
    /// Total number of source samples.
    pub n_source_samples: usize,
}

impl WaveformPeaks {
    /// Compute peaks of one channel, with `ceil(len / num_buckets)` samples per bucket.
    pub fn from_channel(samples: &[f32], num_buckets: usize) -> Self {
        let n = samples.len();
        let bucket_size = n.div_ceil(num_buckets.max(1)).max(1);
        let peaks = samples
            .chunks(bucket_size)
            .map(|chunk| {
                let min = chunk.iter().copied().fold(f32::INFINITY, f32::min);
                let max = chunk.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                (min, max)
            })
            .collect();
        Self {
            peaks,
            n_source_samples: n,
        }
    }

    /// Peaks flattened to `[min0, max0, min1, max1, ...]`.
    pub fn to_interleaved(&self) -> Vec<f32> {
        self.peaks.iter().flat_map(|&(lo, hi)| [lo, hi]).collect()
    }
}
