use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::math::{FftHelper, StatsHelper};
use crate::prelude::{BasebandFilter, BeatMatrix};

/// Floor added to the mean power before normalizing.
const POWER_EPSILON: f64 = 1e-12;

/// Receiver I/Q gain and quadrature mismatch.
///
/// `I' = (1 + g)·I`, `Q' = (1 - g)·(Q·cos ε + I·sin ε)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqImbalance {
    pub gain_mismatch: f64,
    pub phase_error_rad: f64,
}

impl IqImbalance {
    pub fn new(gain_mismatch: f64, phase_error_deg: f64) -> Self {
        Self {
            gain_mismatch,
            phase_error_rad: phase_error_deg.to_radians(),
        }
    }

    pub fn distort(&self, sample: Complex64) -> Complex64 {
        let (sin, cos) = self.phase_error_rad.sin_cos();
        Complex64::new(
            (1.0 + self.gain_mismatch) * sample.re,
            (1.0 - self.gain_mismatch) * (sample.im * cos + sample.re * sin),
        )
    }
}

impl BasebandFilter for IqImbalance {
    fn name(&self) -> &'static str {
        "iq_imbalance"
    }

    fn apply(&mut self, beat: &mut BeatMatrix) {
        beat.mapv_inplace(|s| self.distort(s));
    }
}

/// Constant offset from LO leakage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DcOffset {
    pub offset: Complex64,
}

impl DcOffset {
    pub fn new(offset: Complex64) -> Self {
        Self { offset }
    }
}

impl BasebandFilter for DcOffset {
    fn name(&self) -> &'static str {
        "dc_offset"
    }

    fn apply(&mut self, beat: &mut BeatMatrix) {
        let offset = self.offset;
        beat.mapv_inplace(|s| s + offset);
    }
}

/// Random phase jitter, `x·exp(j·N(0, σ))` per sample.
#[derive(Debug, Clone)]
pub struct PhaseNoise {
    std_rad: f64,
    rng: StdRng,
}

impl PhaseNoise {
    pub fn new(std_rad: f64, seed: u64) -> Self {
        Self {
            std_rad,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl BasebandFilter for PhaseNoise {
    fn name(&self) -> &'static str {
        "phase_noise"
    }

    fn apply(&mut self, beat: &mut BeatMatrix) {
        let Ok(jitter) = Normal::new(0.0, self.std_rad) else {
            return;
        };
        for sample in beat.iter_mut() {
            *sample *= Complex64::cis(jitter.sample(&mut self.rng));
        }
    }
}

/// Scales the whole frame to unit mean power, `x / √(mean|x|² + ε)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Normalize;

impl BasebandFilter for Normalize {
    fn name(&self) -> &'static str {
        "normalize"
    }

    fn apply(&mut self, beat: &mut BeatMatrix) {
        let scale = (StatsHelper::mean_power(beat.iter()) + POWER_EPSILON).sqrt().recip();
        beat.mapv_inplace(|s| s * scale);
    }
}

/// Analytic signal of a real record: negative frequencies removed, positive ones doubled.
///
/// The real part of the result equals the input.
pub fn analytic_signal(real: &[f64]) -> Vec<Complex64> {
    let n = real.len();
    if n == 0 {
        return Vec::new();
    }
    let input: Vec<Complex64> = real.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    let mut spectrum = FftHelper::new(n).forward(&input);
    for (k, bin) in spectrum.iter_mut().enumerate() {
        let weight = if k == 0 || 2 * k == n {
            1.0
        } else if 2 * k < n {
            2.0
        } else {
            0.0
        };
        *bin *= weight;
    }
    FftHelper::inverse(n)
        .forward(&spectrum)
        .into_iter()
        .map(|s| s / n as f64)
        .collect()
}
