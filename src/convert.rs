//! Frequency-scale conversions.
//!
//! The tracker analyses spectra on the ERB (Equivalent Rectangular
//! Bandwidth) scale, a psychoacoustic frequency scale that spaces bins the
//! way the cochlea does. Mel conversion is provided for the output side
//! only; the analysis itself never touches Mel.

/// Convert a frequency in Hz to ERBs.
///
/// Uses the Glasberg & Moore formulation `21.4 * log10(1 + hz / 229)`.
///
/// # Example
/// ```
/// use sawtooth::convert::hz_to_erb;
///
/// assert!(hz_to_erb(0.0).abs() < 1e-12);
/// assert!(hz_to_erb(1000.0) > hz_to_erb(500.0));
/// ```
pub fn hz_to_erb(hz: f64) -> f64 {
    21.4 * (1.0 + hz / 229.0).log10()
}

/// Convert a frequency in ERBs back to Hz.
///
/// Inverse of [`hz_to_erb`].
pub fn erb_to_hz(erb: f64) -> f64 {
    (10f64.powf(erb / 21.4) - 1.0) * 229.0
}

/// Convert a frequency in Hz to Mel.
///
/// Uses the HTK formulation `1127.01048 * ln(1 + hz / 700)`. NaN passes
/// through, so unvoiced frames stay marked as unvoiced after conversion.
pub fn hz_to_mel(hz: f64) -> f64 {
    1127.01048 * (1.0 + hz / 700.0).ln()
}

/// Build a frequency grid uniformly spaced on the ERB scale.
///
/// The grid starts at `fmin`, advances in steps of `step` ERBs, and stops
/// strictly below `fmax`: the number of points is
/// `ceil((erb(fmax) - erb(fmin)) / step)`.
///
/// # Arguments
/// * `fmin` - Lowest frequency in Hz (inclusive)
/// * `fmax` - Upper bound in Hz (exclusive)
/// * `step` - Grid spacing in ERBs
///
/// # Example
/// ```
/// use sawtooth::convert::erb_frequencies;
///
/// let grid = erb_frequencies(25.0, 8000.0, 0.1);
/// assert!((grid[0] - 25.0).abs() < 1e-9);
/// assert!(*grid.last().unwrap() < 8000.0);
/// assert!(grid.windows(2).all(|w| w[0] < w[1]));
/// ```
pub fn erb_frequencies(fmin: f64, fmax: f64, step: f64) -> Vec<f64> {
    let lo = hz_to_erb(fmin);
    let hi = hz_to_erb(fmax);
    let len = ((hi - lo) / step).ceil() as usize;
    (0..len).map(|i| erb_to_hz(lo + i as f64 * step)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_erb_round_trip() {
        for hz in [10.0, 100.0, 440.0, 4000.0, 8000.0] {
            assert_relative_eq!(erb_to_hz(hz_to_erb(hz)), hz, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_erb_monotonic() {
        let mut prev = hz_to_erb(0.0);
        for i in 1..100 {
            let e = hz_to_erb(i as f64 * 100.0);
            assert!(e > prev);
            prev = e;
        }
    }

    #[test]
    fn test_mel_known_values() {
        assert_eq!(hz_to_mel(0.0), 0.0);
        // 1000 Hz is close to 1000 Mel by construction of the scale
        assert_relative_eq!(hz_to_mel(1000.0), 999.99, epsilon = 0.1);
        assert!(hz_to_mel(f64::NAN).is_nan());
    }

    #[test]
    fn test_erb_frequencies_bounds() {
        let grid = erb_frequencies(25.0, 4000.0, 0.1);
        assert_relative_eq!(grid[0], 25.0, epsilon = 1e-9);
        assert!(*grid.last().unwrap() < 4000.0);

        let expected = ((hz_to_erb(4000.0) - hz_to_erb(25.0)) / 0.1).ceil() as usize;
        assert_eq!(grid.len(), expected);
    }

    #[test]
    fn test_erb_frequencies_spacing() {
        let grid = erb_frequencies(50.0, 8000.0, 0.1);
        for w in grid.windows(2) {
            let d = hz_to_erb(w[1]) - hz_to_erb(w[0]);
            assert_relative_eq!(d, 0.1, epsilon = 1e-9);
        }
    }
}
