//! Pitch-strength matrix assembly.
//!
//! The tracker scores every candidate pitch at every output time frame by
//! correlating its strength kernel with the loudness matrix. Each candidate
//! is "optimal" for one window size of a geometric ladder; candidates that
//! fall between two rungs take contributions from both, weighted
//! triangularly, so the strength surface stays smooth across window
//! boundaries.

use crate::kernel::strength_kernel;
use crate::loudness::loudness;
use crate::numeric;
use ndarray::Array2;

/// Candidate-grid resolution: 1/96 octave between adjacent candidates.
pub const DLOG2P: f64 = 1.0 / 96.0;

/// ERB grid resolution in ERBs.
pub const DERBS: f64 = 0.1;

/// Window "quality" factor: window size `w` is optimal for pitch
/// `4 * K * rate / w`.
pub const K: f64 = 2.0;

/// Geometric grid of candidate pitches, kept alongside its log2 form.
///
/// Both vectors are strictly increasing and built once per invocation.
#[derive(Debug, Clone)]
pub struct CandidateGrid {
    /// Candidate pitches in Hz.
    pub pitches: Vec<f64>,
    /// `log2` of each candidate pitch.
    pub log2_pitches: Vec<f64>,
}

impl CandidateGrid {
    /// Build the candidate grid spanning `[pmin, pmax)` at [`DLOG2P`]
    /// resolution.
    ///
    /// The grid holds `ceil((log2(pmax) - log2(pmin)) / DLOG2P)` candidates
    /// starting exactly at `pmin`.
    pub fn new(pmin: f64, pmax: f64) -> Self {
        let lo = pmin.log2();
        let len = ((pmax.log2() - lo) / DLOG2P).ceil() as usize;
        let mut pitches = Vec::with_capacity(len);
        let mut log2_pitches = Vec::with_capacity(len);
        for i in 0..len {
            let l = lo + i as f64 * DLOG2P;
            log2_pitches.push(l);
            pitches.push(l.exp2());
        }
        Self {
            pitches,
            log2_pitches,
        }
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    /// Whether the grid is empty.
    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }
}

/// Optimal pitch of a window size: `4 * K * rate / w`.
pub fn optimal_pitch(rate: u32, w: usize) -> f64 {
    4.0 * K * rate as f64 / w as f64
}

/// Build the window-size ladder covering `[pmin, pmax]`.
///
/// Sizes are powers of two, strictly decreasing by factors of two, chosen
/// so the first rung's optimal pitch is at or below `pmin` and the last
/// rung's is at or above `pmax`.
pub fn window_ladder(rate: u32, pmin: f64, pmax: f64) -> Vec<usize> {
    let span = 4.0 * K * rate as f64;
    let e0 = (span / pmin).log2().ceil() as u32;
    let elast = (span / pmax).log2().floor() as u32;
    (0..=(e0 - elast))
        .map(|i| 1usize << (e0 - i))
        .collect()
}

/// Fractional window-size index of every candidate.
///
/// `d[i] = 1 + log2(pc[i]) - log2(optimal_pitch(ws[0]))`: a candidate with
/// `d` exactly at an integer `n` belongs wholly to the `n`-th rung
/// (1-based); in between, the two nearest rungs share it with triangular
/// weights `1 - |d - n|`.
pub fn window_assignment(grid: &CandidateGrid, rate: u32, ws0: usize) -> Vec<f64> {
    let base = optimal_pitch(rate, ws0).log2();
    grid.log2_pitches
        .iter()
        .map(|&l| 1.0 + l - base)
        .collect()
}

/// Assemble the full pitch-strength matrix of a signal.
///
/// Iterates the window ladder in order; for each rung computes the loudness
/// matrix, correlates the kernels of the candidates assigned to that rung,
/// linearly resamples the per-frame scores onto the `dt` output grid, and
/// accumulates them with triangular weights. The accumulation order (ladder
/// ascending, then candidate ascending, then frame ascending) is fixed so
/// results are bit-reproducible for a given FFT backend.
///
/// # Arguments
/// * `x` - Input signal (non-empty)
/// * `rate` - Sample rate in Hz
/// * `grid` - Candidate grid from [`CandidateGrid::new`]
/// * `dt` - Output time step in seconds
///
/// # Returns
/// Strength matrix of shape `(grid.len(), ceil((N / rate) / dt))`
pub fn strength_matrix(x: &[f64], rate: u32, grid: &CandidateGrid, dt: f64) -> Array2<f64> {
    let t_frames = ((x.len() as f64 / rate as f64) / dt).ceil() as usize;
    if grid.is_empty() {
        return Array2::<f64>::zeros((0, t_frames));
    }

    let nyquist = rate as f64 / 2.0;
    let pmin = grid.pitches[0];
    let pmax = grid.pitches[grid.len() - 1];

    let ws = window_ladder(rate, pmin, pmax);
    let d = window_assignment(grid, rate, ws[0]);
    let ferbs = crate::convert::erb_frequencies(pmin / 4.0, nyquist, DERBS);
    let plim = (ferbs[ferbs.len() - 1] / pmin - 0.75).floor().max(0.0) as usize;
    let primes = numeric::primes(plim);

    let mut s = Array2::<f64>::zeros((grid.len(), t_frames));

    for (n, &w) in ws.iter().enumerate() {
        accumulate(
            &mut s,
            x,
            rate,
            grid,
            &d,
            &ferbs,
            &primes,
            w,
            n,
            n + 1 == ws.len(),
            dt,
        );
    }
    s
}

/// Accumulate one rung of the window ladder into the strength matrix.
///
/// The first and last rungs widen their candidate slice to the grid edges;
/// interior rungs take the candidates whose fractional index `d` falls in
/// `(n, n + 2)`.
#[allow(clippy::too_many_arguments)]
fn accumulate(
    s: &mut Array2<f64>,
    x: &[f64],
    rate: u32,
    grid: &CandidateGrid,
    d: &[f64],
    ferbs: &[f64],
    primes: &[usize],
    w: usize,
    n: usize,
    last: bool,
    dt: f64,
) {
    let l = loudness(x, ferbs, rate, w);
    let frames = l.shape()[0];

    let lo = if n == 0 {
        0
    } else {
        numeric::bisect(d, n as f64)
    };
    let hi = if last {
        d.len()
    } else {
        numeric::bisect(d, (n + 2) as f64)
    };
    if hi <= lo {
        return;
    }

    let mu: Vec<f64> = (lo..hi)
        .map(|i| 1.0 - (d[i] - (n + 1) as f64).abs())
        .collect();

    // Per-frame kernel scores for this rung's candidate slice
    let mut slocal = Array2::<f64>::zeros((hi - lo, frames));
    for (row, i) in (lo..hi).enumerate() {
        let kernel = strength_kernel(grid.pitches[i], ferbs, primes);
        for j in 0..frames {
            let mut acc = 0.0f64;
            for (k, &kv) in kernel.iter().enumerate() {
                acc += kv * l[(j, k)];
            }
            slocal[(row, j)] = acc;
        }
    }

    // Resample from the frame grid (spacing w/2 / rate) onto the output
    // grid (spacing dt): linear interpolation between frames k-1 and k,
    // where k is the first frame time strictly past t.
    let dtp = w as f64 / 2.0 / rate as f64;
    let mut k = 0usize;
    let mut t = 0.0f64;
    let mut tp = 0.0f64;
    for j in 0..s.shape()[1] {
        let mut td = t - tp;
        while td >= 0.0 {
            k += 1;
            tp += dtp;
            td -= dtp;
        }
        let kc = k.min(frames - 1);
        for (row, i) in (lo..hi).enumerate() {
            let interp =
                slocal[(row, kc)] + td * (slocal[(row, kc)] - slocal[(row, kc - 1)]) / dtp;
            s[(i, j)] += mu[row] * interp;
        }
        t += dt;
    }
}
