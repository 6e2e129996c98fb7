use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Symmetric tapering windows applied before each FFT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    #[default]
    Hann,
    Hamming,
    Blackman,
    Rectangular,
}

impl WindowKind {
    pub fn coefficients(self, len: usize) -> Vec<f64> {
        if len == 1 {
            return vec![1.0];
        }
        let denom = len.saturating_sub(1) as f64;
        (0..len)
            .map(|n| {
                let x = TAU * n as f64 / denom;
                match self {
                    WindowKind::Hann => 0.5 - 0.5 * x.cos(),
                    WindowKind::Hamming => 0.54 - 0.46 * x.cos(),
                    WindowKind::Blackman => 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos(),
                    WindowKind::Rectangular => 1.0,
                }
            })
            .collect()
    }

    /// Mean coefficient; the amplitude a pure tone keeps after windowing.
    pub fn coherent_gain(self, len: usize) -> f64 {
        if len == 0 {
            return 0.0;
        }
        self.coefficients(len).iter().sum::<f64>() / len as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn hann_is_symmetric_with_zero_edges() {
        let w = WindowKind::Hann.coefficients(9);
        assert_abs_diff_eq!(w[0], 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(w[8], 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(w[4], 1.0, epsilon = 1e-15);
        for n in 0..9 {
            assert_abs_diff_eq!(w[n], w[8 - n], epsilon = 1e-15);
        }
    }

    #[test]
    fn degenerate_lengths() {
        assert!(WindowKind::Hamming.coefficients(0).is_empty());
        assert_eq!(WindowKind::Blackman.coefficients(1), vec![1.0]);
        assert_eq!(WindowKind::Rectangular.coherent_gain(0), 0.0);
    }

    #[test]
    fn rectangular_has_unit_gain() {
        assert_eq!(WindowKind::Rectangular.coefficients(5), vec![1.0; 5]);
        assert_abs_diff_eq!(WindowKind::Rectangular.coherent_gain(5), 1.0);
        assert!(WindowKind::Hann.coherent_gain(64) < 0.5);
    }
}
