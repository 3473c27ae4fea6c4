//! Slicing a channel into overlapping Hann-windowed frames.

use super::window::hann_window;

/// Frame start offsets for a signal of `len` samples.
///
/// Covers `ceil(len / hop_size)` frames starting at `k * hop_size`; the tail
/// of the last frames reaches past `len` and is zero-padded by the segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopSchedule {
    len: usize,
    frame_size: usize,
    hop_size: usize,
}

impl HopSchedule {
    pub fn new(len: usize, frame_size: usize, hop_size: usize) -> Self {
        debug_assert!(hop_size > 0 && hop_size < frame_size);
        Self {
            len,
            frame_size,
            hop_size,
        }
    }

    pub fn num_frames(&self) -> usize {
        self.len.div_ceil(self.hop_size)
    }

    pub fn start(&self, frame: usize) -> usize {
        frame * self.hop_size
    }

    pub fn starts(&self) -> impl Iterator<Item = usize> {
        let hop = self.hop_size;
        (0..self.num_frames()).map(move |k| k * hop)
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }
}

/// Produces windowed frames of a fixed size from a channel.
pub struct Segmenter {
    frame_size: usize,
    hop_size: usize,
    window: Vec<f32>,
}

impl Segmenter {
    pub fn new(frame_size: usize, hop_size: usize) -> Self {
        assert!(
            hop_size > 0 && hop_size < frame_size,
            "hop size {hop_size} must be in 1..{frame_size}"
        );
        Self {
            frame_size,
            hop_size,
            window: hann_window(frame_size),
        }
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    pub fn window(&self) -> &[f32] {
        &self.window
    }

    pub fn schedule(&self, len: usize) -> HopSchedule {
        HopSchedule::new(len, self.frame_size, self.hop_size)
    }

    /// Fills `out` with the windowed frame starting at `start`.
    ///
    /// Positions at or beyond `samples.len()` are written as zero, so `out`
    /// always holds exactly `frame_size` valid values.
    pub fn frame_into(&self, samples: &[f32], start: usize, out: &mut [f32]) {
        debug_assert_eq!(out.len(), self.frame_size);
        let end = samples.len().min(start.saturating_add(self.frame_size));
        let src = samples.get(start..end).unwrap_or(&[]);

        let (head, tail) = out.split_at_mut(src.len());
        head.iter_mut()
            .zip(src.iter().zip(self.window.iter()))
            .for_each(|(o, (s, w))| *o = s * w);
        tail.fill(0.0);
    }

    /// Lazily yields `(start, frame)` for every frame in the hop schedule.
    ///
    /// Allocates one vector per frame; the separator uses [`Self::frame_into`]
    /// with reused scratch instead.
    pub fn frames<'a>(&'a self, samples: &'a [f32]) -> Frames<'a> {
        Frames {
            segmenter: self,
            samples,
            schedule: self.schedule(samples.len()),
            next: 0,
        }
    }
}

pub struct Frames<'a> {
    segmenter: &'a Segmenter,
    samples: &'a [f32],
    schedule: HopSchedule,
    next: usize,
}

impl Iterator for Frames<'_> {
    type Item = (usize, Vec<f32>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.schedule.num_frames() {
            return None;
        }
        let start = self.schedule.start(self.next);
        self.next += 1;
        let mut frame = vec![0.0; self.segmenter.frame_size];
        self.segmenter.frame_into(self.samples, start, &mut frame);
        Some((start, frame))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.schedule.num_frames() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_count_is_ceil_of_len_over_hop() {
        let seg = Segmenter::new(4096, 1024);
        for (len, expected) in [(0, 0), (1, 1), (1024, 1), (1025, 2), (44100, 44)] {
            assert_eq!(seg.schedule(len).num_frames(), expected, "len {len}");
            assert_eq!(seg.frames(&vec![0.5; len]).count(), expected, "len {len}");
        }
    }

    #[test]
    fn starts_are_spaced_by_hop() {
        let schedule = HopSchedule::new(5000, 4096, 1024);
        let starts: Vec<usize> = schedule.starts().collect();
        assert_eq!(starts, vec![0, 1024, 2048, 3072, 4096]);
    }

    #[test]
    fn tail_beyond_signal_is_zero() {
        let seg = Segmenter::new(16, 4);
        let samples = vec![1.0f32; 10];
        let frames: Vec<(usize, Vec<f32>)> = seg.frames(&samples).collect();
        let (start, last) = frames.last().unwrap();
        assert_eq!(*start, 8);
        assert_eq!(last.len(), 16);
        assert!(last[2..].iter().all(|&s| s == 0.0));
        assert!(last[1] > 0.0);
    }

    #[test]
    fn frame_is_source_times_window() {
        let seg = Segmenter::new(8, 2);
        let samples: Vec<f32> = (0..8).map(|i| i as f32 + 1.0).collect();
        let mut frame = vec![0.0; 8];
        seg.frame_into(&samples, 0, &mut frame);
        assert_eq!(frame[0], 0.0);
        for i in 0..8 {
            assert!((frame[i] - samples[i] * seg.window()[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn scratch_is_fully_overwritten() {
        let seg = Segmenter::new(8, 2);
        let mut frame = vec![9.0; 8];
        seg.frame_into(&[1.0, 1.0], 0, &mut frame);
        assert!(frame[2..].iter().all(|&s| s == 0.0));
        seg.frame_into(&[1.0, 1.0], 6, &mut frame);
        assert!(frame.iter().all(|&s| s == 0.0));
    }
}
