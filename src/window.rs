/// Compute a periodic Hann (raised cosine) window.
///
/// The Hann window is the analysis window of the loudness stage. The
/// periodic form (`cos(2*pi*i/n)`, not `n - 1`) matches the half-window
/// hop used when framing the signal.
///
/// # Arguments
/// * `n` - Window length
///
/// # Returns
/// Hann window of length `n`
pub fn hann(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![1.0];
    }
    let m = n as f64;
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / m).cos())
        .collect()
}
