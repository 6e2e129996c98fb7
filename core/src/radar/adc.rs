use num_complex::Complex64;

use crate::config::AdcConfig;
use crate::prelude::Sampler;

/// Uniform quantizer applied independently to I and Q.
///
/// Each component is normalized by `v_ref`, clipped to `[-1, 1]`, rounded to
/// one of `2^bits - 1` steps per unit and scaled back. Clipping is expected
/// lossy behaviour and never an error.
#[derive(Debug, Clone)]
pub struct AdcSampler {
    v_ref: f64,
    levels: f64,
}

impl AdcSampler {
    /// Validated configs have `1 <= num_bits <= 32`; other bit depths still
    /// yield at least one step per unit.
    pub fn new(config: &AdcConfig) -> Self {
        let bits = config.num_bits.min(f64::MAX_EXP as u32 - 1) as i32;
        Self {
            v_ref: config.v_ref,
            levels: (2f64.powi(bits) - 1.0).max(1.0),
        }
    }

    pub fn quantize(&self, value: f64) -> f64 {
        let normalized = (value / self.v_ref).clamp(-1.0, 1.0);
        (normalized * self.levels).round() / self.levels * self.v_ref
    }

    fn is_clipped(&self, value: f64) -> bool {
        value.abs() > self.v_ref
    }
}

impl Default for AdcSampler {
    fn default() -> Self {
        Self::new(&AdcConfig::default())
    }
}

impl Sampler for AdcSampler {
    fn sample(&self, analog: &[Complex64]) -> Vec<Complex64> {
        analog
            .iter()
            .map(|s| Complex64::new(self.quantize(s.re), self.quantize(s.im)))
            .collect()
    }

    fn clipped_components(&self, analog: &[Complex64]) -> usize {
        analog
            .iter()
            .map(|s| usize::from(self.is_clipped(s.re)) + usize::from(self.is_clipped(s.im)))
            .sum()
    }
}
