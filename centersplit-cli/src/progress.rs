use centersplit_core::{SeparationEvent, SeparationListener};
use indicatif::{ProgressBar, ProgressStyle};

/// CLI progress bar driven by the separator's 0-100 progress checkpoints.
pub struct CliListener {
    pb: ProgressBar,
}

impl CliListener {
    pub fn new() -> Self {
        let pb = ProgressBar::new(100);
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg} ({eta})",
        )
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        Self { pb }
    }
}

impl SeparationListener for CliListener {
    fn on_event(&mut self, event: SeparationEvent) {
        self.pb.set_position(event.progress().round() as u64);
        match event {
            SeparationEvent::Completed => self.pb.finish_with_message("done"),
            SeparationEvent::Failed { .. } => self.pb.abandon_with_message(event.status()),
            _ => self.pb.set_message(event.status()),
        }
    }
}
