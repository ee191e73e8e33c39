use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// Cached real-to-complex FFT plan with owned input and output buffers.
///
/// The loudness analyzer creates one plan per window size, refills the
/// input buffer for every frame, and drops the plan (and its scratch)
/// before moving on to the next rung of the window ladder.
///
/// # Example
/// ```
/// use sawtooth::fft::RealFftPlan;
///
/// let mut plan = RealFftPlan::new(8);
/// plan.input_mut().fill(1.0);
/// let spectrum = plan.forward();
/// assert_eq!(spectrum.len(), 5); // 8/2 + 1 bins
/// assert!((spectrum[0].re - 8.0).abs() < 1e-12); // DC carries the sum
/// ```
pub struct RealFftPlan {
    r2c: Arc<dyn RealToComplex<f64>>,
    input: Vec<f64>,
    output: Vec<Complex<f64>>,
}

impl RealFftPlan {
    /// Create a new plan for a given transform size.
    ///
    /// # Arguments
    /// * `len` - Size of the transform (a power of two throughout this crate)
    pub fn new(len: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(len);
        let input = r2c.make_input_vec();
        let output = r2c.make_output_vec();
        Self { r2c, input, output }
    }

    /// Transform size.
    pub fn len(&self) -> usize {
        self.input.len()
    }

    /// Whether the transform size is zero.
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Mutable access to the real input buffer.
    pub fn input_mut(&mut self) -> &mut [f64] {
        &mut self.input
    }

    /// Run the forward transform over the current input buffer.
    ///
    /// Returns the `len/2 + 1` non-redundant spectrum bins. The input
    /// buffer is used as scratch and must be refilled before the next call.
    pub fn forward(&mut self) -> &[Complex<f64>] {
        // The buffers come from the plan itself, so the length check
        // inside process() cannot fail.
        let _ = self.r2c.process(&mut self.input, &mut self.output);
        &self.output
    }
}
