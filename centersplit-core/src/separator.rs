use crate::buffer::SampleBuffer;
use crate::config::{MaskDomain, SeparatorConfig};
use crate::dsp::mask::CenterMask;
use crate::dsp::normalize::normalize_buffer;
use crate::dsp::overlap_add::OverlapAdd;
use crate::dsp::segmenter::{HopSchedule, Segmenter};
use crate::dsp::stft::SpectralSplitter;
use crate::listener::{NoOpListener, SeparationEvent, SeparationListener};
use crate::stem::{Separation, Stem, StemKind};
use crate::wav::encode_wav;
use crate::{Result, SeparationError};

/// Frame-sized buffers reused across every hop, channel and call.
struct FrameScratch {
    left: Vec<f32>,
    right: Vec<f32>,
    vocals: Vec<f32>,
    instrumental: Vec<f32>,
}

impl FrameScratch {
    fn new(frame_size: usize) -> Self {
        Self {
            left: vec![0.0; frame_size],
            right: vec![0.0; frame_size],
            vocals: vec![0.0; frame_size],
            instrumental: vec![0.0; frame_size],
        }
    }
}

/// Splits a mix into a center (vocal) estimate and a residual (instrumental).
///
/// Holds no state between runs other than its configuration and scratch
/// buffers; one separator can process any number of inputs in sequence.
pub struct Separator {
    config: SeparatorConfig,
    segmenter: Segmenter,
    mask: CenterMask,
    overlap_add: OverlapAdd,
    spectral: Option<SpectralSplitter>,
    scratch: FrameScratch,
}

impl Separator {
    pub fn new(config: SeparatorConfig) -> Result<Self> {
        config.validate()?;
        let segmenter = Segmenter::new(config.frame_size, config.hop_size());
        let (spectral, overlap_add) = match config.domain {
            MaskDomain::Sample => (None, OverlapAdd::new(config.frame_size, config.hop_size())),
            MaskDomain::Spectral => {
                let splitter = SpectralSplitter::new(segmenter.window());
                let gain = splitter.overlap_gain(config.hop_size());
                (Some(splitter), OverlapAdd::with_gain(gain))
            }
        };
        Ok(Self {
            mask: CenterMask::new(config.mask.clone()),
            scratch: FrameScratch::new(config.frame_size),
            config,
            segmenter,
            overlap_add,
            spectral,
        })
    }

    pub fn config(&self) -> &SeparatorConfig {
        &self.config
    }

    pub fn separate(&mut self, input: &SampleBuffer) -> Result<Separation> {
        self.separate_with_listener(input, &mut NoOpListener)
    }

    /// Runs the full pipeline, reporting checkpoints to `listener`.
    ///
    /// On failure the listener receives [`SeparationEvent::Failed`] and any
    /// partially accumulated output is dropped.
    pub fn separate_with_listener<L: SeparationListener>(
        &mut self,
        input: &SampleBuffer,
        listener: &mut L,
    ) -> Result<Separation> {
        let mut reporter = Reporter {
            listener,
            last_progress: 0.0,
        };

        match self.run(input, &mut reporter) {
            Ok(separation) => Ok(separation),
            Err(e) => {
                log::warn!("separation failed: {e}");
                let progress = reporter.last_progress;
                reporter.listener.on_event(SeparationEvent::Failed {
                    message: e.to_string(),
                    progress,
                });
                Err(e)
            }
        }
    }

    fn run<L: SeparationListener>(
        &mut self,
        input: &SampleBuffer,
        reporter: &mut Reporter<'_, L>,
    ) -> Result<Separation> {
        reporter.on_event(SeparationEvent::Initializing);

        let num_channels = input.num_channels();
        let schedule = self.segmenter.schedule(input.len());
        log::debug!(
            "separating {} channel(s), {} samples at {} Hz: {} frames of {} (hop {}), {} mask",
            num_channels,
            input.len(),
            input.sample_rate(),
            schedule.num_frames(),
            schedule.frame_size(),
            schedule.hop_size(),
            self.config.domain.as_str(),
        );
        reporter.on_event(SeparationEvent::Analyzing {
            num_frames: schedule.num_frames(),
            num_channels,
        });

        let mut vocals = input.zeroed_like();
        let mut instrumental = input.zeroed_like();

        for channel in 0..num_channels {
            reporter.on_event(SeparationEvent::ChannelStarted {
                channel,
                num_channels,
            });
            self.process_channel(
                input,
                channel,
                &schedule,
                vocals.channel_mut(channel),
                instrumental.channel_mut(channel),
                reporter,
            )?;
        }

        reporter.on_event(SeparationEvent::GeneratingOutput);

        let headroom = self.config.headroom;
        let vocal_gains = normalize_buffer(&mut vocals, headroom);
        let instrumental_gains = normalize_buffer(&mut instrumental, headroom);
        log::debug!(
            "normalization gains: vocals {vocal_gains:?}, instrumental {instrumental_gains:?}"
        );

        let vocals_wav = encode_wav(&vocals)?;
        let instrumental_wav = encode_wav(&instrumental)?;

        reporter.on_event(SeparationEvent::Completed);
        log::info!(
            "separated {:.1}s of audio into vocals ({} bytes) and instrumental ({} bytes)",
            input.duration_secs(),
            vocals_wav.len(),
            instrumental_wav.len(),
        );

        Ok(Separation {
            vocals: Stem {
                kind: StemKind::Vocals,
                buffer: vocals,
                wav: vocals_wav,
                gains: vocal_gains,
            },
            instrumental: Stem {
                kind: StemKind::Instrumental,
                buffer: instrumental,
                wav: instrumental_wav,
                gains: instrumental_gains,
            },
        })
    }

    /// Segments, masks and overlap-adds every frame of one channel.
    fn process_channel(
        &mut self,
        input: &SampleBuffer,
        channel: usize,
        schedule: &HopSchedule,
        vocals_out: &mut [f32],
        instrumental_out: &mut [f32],
        listener: &mut impl SeparationListener,
    ) -> Result<()> {
        let Self {
            config,
            segmenter,
            mask,
            overlap_add,
            spectral,
            scratch,
        } = self;

        let num_channels = input.num_channels();
        let source = input.channel(channel);
        let partner = partner_channel(channel, num_channels).map(|p| input.channel(p));
        let sample_rate = input.sample_rate();
        let num_frames = schedule.num_frames();

        for (frame, start) in schedule.starts().enumerate() {
            if listener.is_cancelled() {
                return Err(SeparationError::Cancelled);
            }

            segmenter.frame_into(source, start, &mut scratch.left);
            match partner {
                Some(other) => segmenter.frame_into(other, start, &mut scratch.right),
                None => scratch.right.copy_from_slice(&scratch.left),
            }

            match spectral {
                None => mask.apply_frame(
                    &scratch.left,
                    &scratch.right,
                    sample_rate,
                    &mut scratch.vocals,
                    &mut scratch.instrumental,
                ),
                Some(splitter) => splitter.split_frame(
                    mask,
                    &scratch.left,
                    &scratch.right,
                    sample_rate,
                    &mut scratch.vocals,
                    &mut scratch.instrumental,
                )?,
            }

            overlap_add.accumulate(vocals_out, start, &scratch.vocals);
            overlap_add.accumulate(instrumental_out, start, &scratch.instrumental);

            if frame % config.progress_interval == 0 {
                listener.on_event(SeparationEvent::FrameProgress {
                    channel,
                    num_channels,
                    frame,
                    num_frames,
                });
            }
        }
        Ok(())
    }
}

/// Wraps the caller's listener to remember the last reported progress.
struct Reporter<'a, L> {
    listener: &'a mut L,
    last_progress: f32,
}

impl<L: SeparationListener> SeparationListener for Reporter<'_, L> {
    fn on_event(&mut self, event: SeparationEvent) {
        self.last_progress = event.progress();
        self.listener.on_event(event);
    }

    fn is_cancelled(&self) -> bool {
        self.listener.is_cancelled()
    }
}

/// The channel paired with `channel` for mid/side analysis: channel 0 pairs
/// with 1, every other channel with 0. Mono input has no partner.
fn partner_channel(channel: usize, num_channels: usize) -> Option<usize> {
    if num_channels < 2 {
        None
    } else if channel == 0 {
        Some(1)
    } else {
        Some(0)
    }
}
