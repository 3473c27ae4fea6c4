//! Listener for observing a separation run.
//!
//! Emits lightweight events at each pipeline checkpoint, each carrying a
//! progress value in `[0, 100]` and a status line for UI display.

/// Events emitted during separation.
#[derive(Debug, Clone, PartialEq)]
pub enum SeparationEvent {
    /// Input accepted, output buffers about to be allocated.
    Initializing,

    /// Frame schedule computed.
    Analyzing {
        num_frames: usize,
        num_channels: usize,
    },

    /// A channel's frame loop is starting.
    ChannelStarted { channel: usize, num_channels: usize },

    /// Periodic report from inside a channel's frame loop.
    FrameProgress {
        channel: usize,
        num_channels: usize,
        frame: usize,
        num_frames: usize,
    },

    /// All frames accumulated; normalizing and encoding.
    GeneratingOutput,

    /// Both stems are ready.
    Completed,

    /// The run aborted. `progress` is the last value reported before failure.
    Failed { message: String, progress: f32 },
}

impl SeparationEvent {
    /// Overall progress, 0 to 100.
    pub fn progress(&self) -> f32 {
        match self {
            SeparationEvent::Initializing => 0.0,
            SeparationEvent::Analyzing { .. } => 5.0,
            SeparationEvent::ChannelStarted {
                channel,
                num_channels,
            } => channel_base(*channel, *num_channels),
            SeparationEvent::FrameProgress {
                channel,
                num_channels,
                frame,
                num_frames,
            } => {
                let within = if *num_frames == 0 {
                    0.0
                } else {
                    *frame as f32 / *num_frames as f32 * (80.0 / *num_channels as f32)
                };
                channel_base(*channel, *num_channels) + within
            }
            SeparationEvent::GeneratingOutput => 90.0,
            SeparationEvent::Completed => 100.0,
            SeparationEvent::Failed { progress, .. } => *progress,
        }
    }

    /// Short human-readable status.
    pub fn status(&self) -> String {
        match self {
            SeparationEvent::Initializing => "Initializing...".to_string(),
            SeparationEvent::Analyzing { .. } => "Analyzing audio spectrum...".to_string(),
            SeparationEvent::ChannelStarted {
                channel,
                num_channels,
            }
            | SeparationEvent::FrameProgress {
                channel,
                num_channels,
                ..
            } => format!("Processing channel {}/{}...", channel + 1, num_channels),
            SeparationEvent::GeneratingOutput => "Generating audio files...".to_string(),
            SeparationEvent::Completed => "Separation complete".to_string(),
            SeparationEvent::Failed { message, .. } => format!("Separation failed: {message}"),
        }
    }
}

fn channel_base(channel: usize, num_channels: usize) -> f32 {
    10.0 + channel as f32 / num_channels.max(1) as f32 * 80.0
}

/// Trait for observing a separation. Implement this for UI progress, logging, etc.
pub trait SeparationListener {
    /// Called at each checkpoint. The event describes what just happened.
    fn on_event(&mut self, event: SeparationEvent);

    /// Polled before every frame. Return `true` to abort with
    /// [`crate::SeparationError::Cancelled`].
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Ignores every event; the default for [`crate::Separator::separate`].
pub struct NoOpListener;

impl SeparationListener for NoOpListener {
    #[inline(always)]
    fn on_event(&mut self, _event: SeparationEvent) {}
}

/// Forwards every event to the `log` facade at debug level.
pub struct LogListener;

impl SeparationListener for LogListener {
    fn on_event(&mut self, event: SeparationEvent) {
        match &event {
            SeparationEvent::Failed { .. } => log::warn!("{}", event.status()),
            _ => log::debug!("[{:>5.1}%] {}", event.progress(), event.status()),
        }
    }
}
