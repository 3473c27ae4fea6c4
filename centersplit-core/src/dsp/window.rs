use std::f32::consts::PI;

/// Generates a periodic Hann window of length `n`.
///
/// `w[i] = 0.5 * (1 - cos(2πi / n))`, so `w[0] == 0` and `w[i] == w[n - i]`.
pub fn hann_window(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / n as f32).cos()))
        .collect()
}
