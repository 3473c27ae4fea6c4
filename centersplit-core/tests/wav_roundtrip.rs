//! Encoded stems must be readable by an independent WAV parser.

use std::f32::consts::PI;
use std::io::Cursor;

use centersplit_core::{encode_wav, SampleBuffer};

fn decode(bytes: &[u8]) -> (hound::WavSpec, Vec<i16>) {
    let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
    let spec = reader.spec();
    let samples = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
    (spec, samples)
}

/// Inverse of the encoder's asymmetric scaling.
fn to_f32(sample: i16) -> f32 {
    if sample < 0 {
        sample as f32 / 32768.0
    } else {
        sample as f32 / 32767.0
    }
}

#[test]
fn sine_survives_hound_roundtrip() {
    let rate = 44100;
    let tone: Vec<f32> = (0..rate as usize)
        .map(|i| 0.9 * (2.0 * PI * 440.0 * i as f32 / rate as f32).sin())
        .collect();
    let buffer = SampleBuffer::mono(tone.clone(), rate).unwrap();
    let wav = encode_wav(&buffer).unwrap();

    let (spec, samples) = decode(&wav);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, rate);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    assert_eq!(samples.len(), tone.len());

    // Truncation loses at most one quantization step.
    let max_err = tone
        .iter()
        .zip(&samples)
        .map(|(&x, &s)| (x - to_f32(s)).abs())
        .fold(0.0f32, f32::max);
    assert!(max_err <= 1.0 / 32767.0 + 1e-7, "max error {max_err}");
}

#[test]
fn stereo_is_interleaved_left_first() {
    let left = vec![0.5, -0.25, 1.5];
    let right = vec![-0.5, 0.25, -1.5];
    let buffer = SampleBuffer::stereo(left, right, 22050).unwrap();
    let (spec, samples) = decode(&encode_wav(&buffer).unwrap());

    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 22050);
    assert_eq!(samples, vec![16383, -16384, -8192, 8191, 32767, -32768]);
}
