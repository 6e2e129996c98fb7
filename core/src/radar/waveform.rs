use num_complex::Complex64;

use crate::config::RadarParameters;
use crate::math::phasor;
use crate::prelude::WaveformSource;

/// Linear FMCW chirp `s(t) = exp(j·2π·(fc·t + ½·S·t²))`.
///
/// Every chirp starts at phase zero; no phase continuity between chirps is
/// modelled, so the same samples are valid for every row of a frame.
#[derive(Debug, Clone)]
pub struct FmcwWaveform {
    params: RadarParameters,
}

impl FmcwWaveform {
    pub fn new(params: RadarParameters) -> Self {
        Self { params }
    }

    /// Samples in one chirp, `floor(Tc·fs)`.
    pub fn num_samples(&self) -> usize {
        self.params.chirp_samples()
    }

    pub fn time_axis(&self) -> Vec<f64> {
        let fs = self.params.sampling_rate();
        (0..self.num_samples()).map(|n| n as f64 / fs).collect()
    }

    /// Phase at `t`, in cycles.
    pub fn phase_cycles(&self, t: f64) -> f64 {
        self.params.fc() * t + 0.5 * self.params.slope() * t * t
    }

    pub fn instantaneous_frequency(&self, t: f64) -> f64 {
        self.params.fc() + self.params.slope() * t
    }
}

impl WaveformSource for FmcwWaveform {
    fn generate(&self) -> Vec<Complex64> {
        self.time_axis()
            .into_iter()
            .map(|t| phasor(self.phase_cycles(t)))
            .collect()
    }
}
