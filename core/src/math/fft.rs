use std::sync::Arc;

use num_complex::Complex64;
use rustfft::{num_traits::Zero, Fft, FftPlanner};

/// Helper that wraps a planned `rustfft` transform for reuse.
pub struct FftHelper {
    fft: Arc<dyn Fft<f64>>,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        Self { fft }
    }

    /// Unnormalized inverse transform of the given size.
    pub fn inverse(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_inverse(size);
        Self { fft }
    }

    pub fn len(&self) -> usize {
        self.fft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fft.len() == 0
    }

    /// Unnormalized transform in place. `buffer` must have the planned length.
    pub fn process(&self, buffer: &mut [Complex64]) {
        self.fft.process(buffer);
    }

    /// Transform of `input`, zero-padded or truncated to the planned length.
    pub fn forward(&self, input: &[Complex64]) -> Vec<Complex64> {
        let mut buffer = input.to_vec();
        buffer.resize(self.len(), Complex64::zero());
        self.fft.process(&mut buffer);
        buffer
    }
}
