mod decode;
mod progress;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use centersplit_core::{
    AudioDecoder, LogListener, MaskDomain, Separation, Separator, SeparatorConfig, StemKind,
};
use clap::Parser;

use crate::decode::SymphoniaDecoder;
use crate::progress::CliListener;

#[derive(Parser)]
#[command(
    name = "centersplit",
    about = "Split a song into vocals and instrumental WAV tracks"
)]
struct Cli {
    /// Input audio file (WAV, MP3, OGG, FLAC, M4A, AIFF; mono or stereo)
    input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// JSON file with separator settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Samples per analysis frame
    #[arg(long)]
    frame_size: Option<usize>,

    /// Frames overlapping each sample (hop = frame size / overlap)
    #[arg(long)]
    overlap: Option<usize>,

    /// Peak level of each normalized output channel
    #[arg(long)]
    headroom: Option<f32>,

    /// Where the center mask is evaluated
    #[arg(long, value_parser = ["sample", "spectral"])]
    domain: Option<String>,

    /// Log every pipeline checkpoint instead of drawing a progress bar
    #[arg(short, long)]
    verbose: bool,
}

fn build_config(cli: &Cli) -> Result<SeparatorConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid config: {}", path.display()))?
        }
        None => SeparatorConfig::default(),
    };

    if let Some(frame_size) = cli.frame_size {
        config.frame_size = frame_size;
    }
    if let Some(overlap) = cli.overlap {
        config.overlap = overlap;
    }
    if let Some(headroom) = cli.headroom {
        config.headroom = headroom;
    }
    if let Some(domain) = &cli.domain {
        config.domain = match MaskDomain::parse(domain) {
            Some(d) => d,
            None => bail!("Unknown mask domain '{}'. Choices: sample, spectral", domain),
        };
    }

    config.validate()?;
    Ok(config)
}

fn write_stems(separation: Separation, output: &Path, original_name: &str) -> Result<()> {
    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    for stem in separation.into_stems() {
        let path = output.join(stem.kind.file_name(original_name));
        std::fs::write(&path, &stem.wav)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("  Wrote {}", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // 1. Resolve settings
    let config = build_config(&cli)?;
    log::debug!("config: {config:?}");

    // 2. Decode input audio
    eprintln!("Reading {}", cli.input.display());
    let bytes = std::fs::read(&cli.input)
        .with_context(|| format!("Failed to open audio file: {}", cli.input.display()))?;
    let extension = cli.input.extension().and_then(|e| e.to_str());
    let input = SymphoniaDecoder
        .decode(&bytes, extension)
        .with_context(|| format!("Failed to decode {}", cli.input.display()))?;
    eprintln!(
        "  {} samples, {:.1}s, {} Hz, {} channel(s)",
        input.len(),
        input.duration_secs(),
        input.sample_rate(),
        input.num_channels(),
    );

    // 3. Run separation
    let mut separator = Separator::new(config)?;
    eprintln!("Separating ({} mask)...", separator.config().domain.as_str());
    let separation = if cli.verbose {
        separator.separate_with_listener(&input, &mut LogListener)?
    } else {
        separator.separate_with_listener(&input, &mut CliListener::new())?
    };
    for kind in StemKind::ALL {
        let stem = separation.stem(kind);
        log::debug!(
            "{}: pre-normalization peaks {:?}",
            stem.kind,
            (0..stem.buffer.num_channels())
                .map(|ch| stem.raw_peak(ch))
                .collect::<Vec<_>>()
        );
    }

    // 4. Write output stems
    let original_name = cli
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string());
    write_stems(separation, &cli.output, &original_name)?;

    eprintln!("Done!");
    Ok(())
}
