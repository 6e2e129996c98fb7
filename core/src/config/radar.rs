use serde::{Deserialize, Serialize};

use crate::constants::PhysicalConstants;
use crate::prelude::ConfigError;

/// Primary FMCW radar parameters as supplied by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    /// Carrier frequency [Hz].
    pub fc: f64,
    /// Chirp bandwidth [Hz].
    pub bandwidth: f64,
    /// Chirp duration [s].
    pub chirp_duration: f64,
    /// Chirps per frame.
    pub num_chirps: usize,
    /// ADC samples kept per chirp.
    pub num_samples: usize,
    /// ADC sampling rate [Hz].
    pub sampling_rate: f64,
    /// Per-sample SNR used by the AWGN filter, if noise is enabled.
    pub snr_db: Option<f64>,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            fc: 77e9,
            bandwidth: 1e9,
            chirp_duration: 60e-6,
            num_chirps: 128,
            num_samples: 256,
            sampling_rate: 5e6,
            snr_db: None,
        }
    }
}

impl RadarConfig {
    /// Checks physical consistency and freezes the parameters.
    pub fn validate(&self) -> Result<RadarParameters, ConfigError> {
        self.validate_with(PhysicalConstants::default())
    }

    pub fn validate_with(&self, constants: PhysicalConstants) -> Result<RadarParameters, ConfigError> {
        require_positive("fc", self.fc)?;
        require_positive("bandwidth", self.bandwidth)?;
        require_positive("chirp_duration", self.chirp_duration)?;
        require_positive("sampling_rate", self.sampling_rate)?;
        require_positive("num_chirps", self.num_chirps as f64)?;
        require_positive("num_samples", self.num_samples as f64)?;
        require_positive("speed_of_light", constants.speed_of_light)?;
        if let Some(snr) = self.snr_db {
            if !snr.is_finite() {
                return Err(ConfigError::InvalidNoise(format!("snr_db must be finite, got {}", snr)));
            }
        }

        if samples_in(self.chirp_duration, self.sampling_rate) < self.num_samples {
            return Err(ConfigError::InsufficientSamples {
                sample_rate: self.sampling_rate,
                chirp_duration: self.chirp_duration,
                num_samples: self.num_samples,
            });
        }

        Ok(RadarParameters {
            fc: self.fc,
            bandwidth: self.bandwidth,
            chirp_duration: self.chirp_duration,
            num_chirps: self.num_chirps,
            num_samples: self.num_samples,
            sampling_rate: self.sampling_rate,
            constants,
        })
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// Whole samples that fit in `duration` at `rate`, tolerating the rounding
/// error of products such as `60e-6 * 5e6`.
pub(crate) fn samples_in(duration: f64, rate: f64) -> usize {
    let exact = duration * rate;
    let nearest = exact.round();
    if (exact - nearest).abs() <= 1e-9 * nearest.max(1.0) {
        nearest as usize
    } else {
        exact.floor() as usize
    }
}

/// Validated radar parameters and the quantities derived from them.
///
/// Only [`RadarConfig::validate`] builds this type, so every instance
/// satisfies the positivity and `fs·Tc ≥ Ns` invariants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarParameters {
    fc: f64,
    bandwidth: f64,
    chirp_duration: f64,
    num_chirps: usize,
    num_samples: usize,
    sampling_rate: f64,
    constants: PhysicalConstants,
}

impl RadarParameters {
    pub fn fc(&self) -> f64 {
        self.fc
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn chirp_duration(&self) -> f64 {
        self.chirp_duration
    }

    pub fn num_chirps(&self) -> usize {
        self.num_chirps
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    pub fn constants(&self) -> PhysicalConstants {
        self.constants
    }

    pub fn speed_of_light(&self) -> f64 {
        self.constants.speed_of_light
    }

    /// Chirp slope `S = B / Tc` [Hz/s].
    pub fn slope(&self) -> f64 {
        self.bandwidth / self.chirp_duration
    }

    /// Carrier wavelength `λ = c / fc` [m].
    pub fn wavelength(&self) -> f64 {
        self.speed_of_light() / self.fc
    }

    /// `c / (2B)` [m].
    pub fn range_resolution(&self) -> f64 {
        self.speed_of_light() / (2.0 * self.bandwidth)
    }

    /// Range whose beat frequency equals the sampling rate, `c·fs / (2S)` [m].
    pub fn max_range(&self) -> f64 {
        self.speed_of_light() * self.sampling_rate / (2.0 * self.slope())
    }

    /// `λ / (2·Nc·Tc)` [m/s].
    pub fn velocity_resolution(&self) -> f64 {
        self.wavelength() / (2.0 * self.num_chirps as f64 * self.chirp_duration)
    }

    /// Largest unambiguous radial speed, `λ / (4·Tc)` [m/s].
    pub fn max_velocity(&self) -> f64 {
        self.wavelength() / (4.0 * self.chirp_duration)
    }

    /// Spacing of the range FFT bins, `max_range / Ns` [m].
    pub fn range_bin_spacing(&self) -> f64 {
        self.max_range() / self.num_samples as f64
    }

    /// Samples in one full chirp, `floor(Tc·fs)`.
    pub fn chirp_samples(&self) -> usize {
        samples_in(self.chirp_duration, self.sampling_rate)
    }

    /// Duration of the chirp train, `Nc·Tc` [s].
    pub fn frame_duration(&self) -> f64 {
        self.num_chirps as f64 * self.chirp_duration
    }
}
