use crate::buffer::SampleBuffer;

/// The two tracks produced by a separation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StemKind {
    Vocals,
    Instrumental,
}

impl StemKind {
    pub const ALL: [StemKind; 2] = [StemKind::Vocals, StemKind::Instrumental];

    /// Track label used in output file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            StemKind::Vocals => "vocals",
            StemKind::Instrumental => "instrumental",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "vocals" => Some(StemKind::Vocals),
            "instrumental" => Some(StemKind::Instrumental),
            _ => None,
        }
    }

    /// Download name `{label}_{base}.wav`, where `base` is `original_name`
    /// with its final extension removed.
    pub fn file_name(&self, original_name: &str) -> String {
        format!("{}_{}.wav", self.as_str(), strip_extension(original_name))
    }
}

impl std::fmt::Display for StemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Removes a trailing `.ext`, where `ext` is non-empty and holds no `.` or `/`.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() && !name[dot + 1..].contains('/') => &name[..dot],
        _ => name,
    }
}

/// One separated track: its normalized samples and their WAV encoding.
#[derive(Debug, Clone)]
pub struct Stem {
    pub kind: StemKind,
    pub buffer: SampleBuffer,
    pub wav: Vec<u8>,
    /// Per-channel gain the normalizer applied (1.0 for silent channels).
    pub gains: Vec<f32>,
}

impl Stem {
    /// Peak of channel `ch` before normalization.
    pub fn raw_peak(&self, ch: usize) -> f32 {
        self.buffer.peak(ch) / self.gains[ch]
    }
}

/// Output of a completed separation.
#[derive(Debug, Clone)]
pub struct Separation {
    pub vocals: Stem,
    pub instrumental: Stem,
}

impl Separation {
    pub fn stem(&self, kind: StemKind) -> &Stem {
        match kind {
            StemKind::Vocals => &self.vocals,
            StemKind::Instrumental => &self.instrumental,
        }
    }

    pub fn into_stems(self) -> [Stem; 2] {
        [self.vocals, self.instrumental]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_replaces_last_extension() {
        assert_eq!(StemKind::Vocals.file_name("song.mp3"), "vocals_song.wav");
        assert_eq!(
            StemKind::Instrumental.file_name("my.live.take.flac"),
            "instrumental_my.live.take.wav"
        );
    }

    #[test]
    fn file_name_without_extension_is_kept() {
        assert_eq!(StemKind::Vocals.file_name("track"), "vocals_track.wav");
        assert_eq!(StemKind::Vocals.file_name("track."), "vocals_track..wav");
        assert_eq!(StemKind::Vocals.file_name("dir.v2/track"), "vocals_dir.v2/track.wav");
    }

    #[test]
    fn labels_round_trip() {
        for kind in StemKind::ALL {
            assert_eq!(StemKind::parse(kind.as_str()), Some(kind));
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }
}
