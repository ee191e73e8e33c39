//! Prime-harmonic strength kernels.
//!
//! A kernel is a sparse spectral template for one candidate pitch: cosine
//! lobes reward energy at the candidate's prime-numbered harmonics and
//! half-height inverted lobes penalize the valleys between them. Composite
//! harmonics are left out on purpose: they coincide with harmonics of
//! subharmonic candidates and would pull the strength maximum toward
//! integer-ratio errors. This prime-only weighting is the defining idea of
//! SWIPE' (Camacho 2007).

use std::f64::consts::PI;

/// Half-width of the peak band around each harmonic, in harmonic units.
const PEAK_BAND: f64 = 0.25;

/// Half-width of the valley band, in harmonic units.
const VALLEY_BAND: f64 = 0.75;

/// Build the strength kernel of one candidate pitch over the ERB grid.
///
/// For each harmonic `h` in `{1} ∪ primes` up to
/// `floor(ferbs_max / pitch - 0.75)` and each bin with normalized frequency
/// `q = f / pitch`:
///
/// - `|q - h| < 0.25`: peak, the bin is set to `cos(2*pi*q)`;
/// - `|q - h| < 0.75`: valley, `cos(2*pi*q) / 2` accumulates onto the bin.
///
/// The kernel is then shaped by a `sqrt(1/f)` envelope and L2-normalized
/// using only its positive entries; every entry (positive and negative) is
/// divided by that norm. A candidate too high for even its fundamental to
/// fit under the grid yields an all-zero kernel.
///
/// # Arguments
/// * `pitch` - Candidate pitch in Hz
/// * `ferbs` - Ascending ERB-spaced frequency grid in Hz
/// * `primes` - Harmonic set from [`crate::numeric::primes`]
///
/// # Returns
/// Kernel vector of length `ferbs.len()`
pub fn strength_kernel(pitch: f64, ferbs: &[f64], primes: &[usize]) -> Vec<f64> {
    let mut kernel = vec![0.0f64; ferbs.len()];
    let q: Vec<f64> = ferbs.iter().map(|&f| f / pitch).collect();
    let plim = (ferbs[ferbs.len() - 1] / pitch - VALLEY_BAND).floor();

    for &h in primes {
        let h = h as f64;
        if h > plim {
            break;
        }
        for (k, &qk) in q.iter().enumerate() {
            let delta = (qk - h).abs();
            if delta < PEAK_BAND {
                // Peaks overwrite whatever valleys accumulated here
                kernel[k] = (2.0 * PI * qk).cos();
            } else if delta < VALLEY_BAND {
                kernel[k] += (2.0 * PI * qk).cos() / 2.0;
            }
        }
    }

    let mut norm = 0.0f64;
    for (v, &f) in kernel.iter_mut().zip(ferbs.iter()) {
        *v *= (1.0 / f).sqrt();
        if *v > 0.0 {
            norm += *v * *v;
        }
    }
    let norm = norm.sqrt();
    if norm > 0.0 {
        for v in kernel.iter_mut() {
            *v /= norm;
        }
    }
    kernel
}
