//! ERB-domain loudness analysis.
//!
//! One window size of the ladder at a time, the signal is framed with a
//! half-window hop, Hann-windowed, transformed, and the spectral magnitudes
//! are spline-resampled onto the ERB grid. The square root of the
//! interpolated magnitude is the "loudness" the strength kernels are
//! correlated against.

use crate::fft::RealFftPlan;
use crate::numeric;
use crate::window;
use ndarray::Array2;

/// Compute the loudness matrix of a signal for one window size.
///
/// Frame `i` covers samples `[(i - 1) * w/2, (i - 1) * w/2 + w)`; indices
/// outside the signal read as zero, which gives the leading half-window of
/// left padding and the trailing two right-padded frames. The row count is
/// `ceil(N / (w/2)) + 1`.
///
/// Each row is the element-wise square root of the spectral magnitudes
/// interpolated onto `ferbs`, with NaN coerced to zero, and is
/// L2-normalized afterwards (zero rows stay zero).
///
/// # Arguments
/// * `x` - Input signal
/// * `ferbs` - Ascending ERB-spaced frequency grid in Hz
/// * `rate` - Sample rate in Hz
/// * `w` - Window size in samples (a power of two)
///
/// # Returns
/// Loudness matrix of shape `(frames, ferbs.len())`
pub fn loudness(x: &[f64], ferbs: &[f64], rate: u32, w: usize) -> Array2<f64> {
    let w2 = w / 2;
    let hann = window::hann(w);

    // Linear frequency grid of the first w/2 DFT bins
    let fstep = rate as f64 / w as f64;
    let f: Vec<f64> = (0..w2).map(|k| k as f64 * fstep).collect();

    let frames = (x.len() as f64 / w2 as f64).ceil() as usize + 1;
    let mut l = Array2::<f64>::zeros((frames, ferbs.len()));

    let mut plan = RealFftPlan::new(w);
    let mut mag = vec![0.0f64; w2];

    // Every row's query sequence starts at the same bisection index; the
    // ERB grid then advances monotonically, so bisect_from suffices.
    let hi0 = numeric::bisect(&f, ferbs[0]).min(f.len() - 1);

    for i in 0..frames {
        let start = i as isize * w2 as isize - w2 as isize;
        let buf = plan.input_mut();
        for (j, (slot, &win)) in buf.iter_mut().zip(hann.iter()).enumerate() {
            let idx = start + j as isize;
            let sample = if idx >= 0 && (idx as usize) < x.len() {
                x[idx as usize]
            } else {
                0.0
            };
            *slot = sample * win;
        }

        let spectrum = plan.forward();
        for (m, bin) in mag.iter_mut().zip(spectrum.iter()) {
            *m = bin.norm();
        }

        let y2 = numeric::spline(&f, &mag);
        let mut hi = hi0;
        for (j, &fq) in ferbs.iter().enumerate() {
            hi = numeric::bisect_from(&f, fq, hi).min(f.len() - 1);
            let v = numeric::spline_at(&f, &mag, &y2, fq, hi).sqrt();
            l[(i, j)] = if v.is_nan() { 0.0 } else { v };
        }
    }

    // Row normalization
    for i in 0..frames {
        let mut norm = 0.0f64;
        for j in 0..ferbs.len() {
            norm += l[(i, j)] * l[(i, j)];
        }
        if norm != 0.0 {
            let norm = norm.sqrt();
            for j in 0..ferbs.len() {
                l[(i, j)] /= norm;
            }
        }
    }
    l
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert;
    use crate::io;
    use approx::assert_relative_eq;

    fn test_grid(rate: u32) -> Vec<f64> {
        convert::erb_frequencies(25.0, rate as f64 / 2.0, 0.1)
    }

    #[test]
    fn test_shape() {
        let sr = 16000;
        let x = io::tone(250.0, sr, 0.25); // 4000 samples
        let ferbs = test_grid(sr);
        let l = loudness(&x, &ferbs, sr, 512);
        // ceil(4000 / 256) + 1
        assert_eq!(l.shape(), &[17, ferbs.len()]);
    }

    #[test]
    fn test_row_norms_unit_or_zero() {
        let sr = 16000;
        let x = io::tone(250.0, sr, 0.2);
        let ferbs = test_grid(sr);
        let l = loudness(&x, &ferbs, sr, 256);

        for i in 0..l.shape()[0] {
            let energy: f64 = (0..l.shape()[1]).map(|j| l[(i, j)] * l[(i, j)]).sum();
            assert!(
                energy.abs() < 1e-12 || (energy - 1.0).abs() < 1e-9,
                "row {i} has energy {energy}"
            );
        }
    }

    #[test]
    fn test_silence_rows_are_zero() {
        let sr = 16000;
        let x = vec![0.0f64; 2048];
        let ferbs = test_grid(sr);
        let l = loudness(&x, &ferbs, sr, 512);
        for v in l.iter() {
            assert_eq!(*v, 0.0);
        }
    }

    #[test]
    fn test_tone_energy_near_fundamental() {
        let sr = 16000;
        let freq = 500.0;
        let x = io::tone(freq, sr, 0.5);
        let ferbs = test_grid(sr);
        let l = loudness(&x, &ferbs, sr, 512);

        // An interior frame should peak near the tone frequency
        let mid = l.shape()[0] / 2;
        let mut best = (0usize, f64::NEG_INFINITY);
        for j in 0..ferbs.len() {
            if l[(mid, j)] > best.1 {
                best = (j, l[(mid, j)]);
            }
        }
        let peak_hz = ferbs[best.0];
        assert!(
            (peak_hz - freq).abs() / freq < 0.1,
            "loudness peak at {peak_hz} Hz, expected near {freq} Hz"
        );
    }

    #[test]
    fn test_short_signal_is_padded() {
        let sr = 16000;
        let x = io::tone(200.0, sr, 0.005); // 80 samples, shorter than w/2
        let ferbs = test_grid(sr);
        let l = loudness(&x, &ferbs, sr, 512);
        assert_eq!(l.shape()[0], 2);
        // Rows are still finite and normalized
        for i in 0..2 {
            let energy: f64 = (0..l.shape()[1]).map(|j| l[(i, j)] * l[(i, j)]).sum();
            assert!(energy.abs() < 1e-12 || (energy - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_amplitude_scaling_cancels() {
        let sr = 16000;
        let x = io::tone(300.0, sr, 0.1);
        let x2: Vec<f64> = x.iter().map(|&v| 2.0 * v).collect();
        let ferbs = test_grid(sr);
        let a = loudness(&x, &ferbs, sr, 256);
        let b = loudness(&x2, &ferbs, sr, 256);
        for (u, v) in a.iter().zip(b.iter()) {
            assert_relative_eq!(*u, *v, epsilon = 1e-6);
        }
    }
}
