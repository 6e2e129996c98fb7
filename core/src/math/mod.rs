pub mod fft;
pub mod stats;

pub use fft::FftHelper;
pub use stats::StatsHelper;

use num_complex::Complex64;

/// `exp(j·2π·cycles)`, reducing `cycles` modulo one first so large carrier
/// phases keep full precision.
pub fn phasor(cycles: f64) -> Complex64 {
    let fraction = cycles - cycles.floor();
    Complex64::cis(std::f64::consts::TAU * fraction)
}
