use serde::{Deserialize, Serialize};

use crate::config::radar::{RadarConfig, RadarParameters};
use crate::config::target::TargetScenario;
use crate::prelude::ConfigError;
use crate::processing::window::WindowKind;
use crate::radar::channel::{DelayModel, PathLoss};
use crate::radar::sensor::DopplerModel;

/// ADC bit depth and reference voltage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdcConfig {
    pub num_bits: u32,
    pub v_ref: f64,
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            num_bits: 12,
            v_ref: 1.0,
        }
    }
}

impl AdcConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=32).contains(&self.num_bits) {
            return Err(ConfigError::InvalidAdc(format!(
                "num_bits must be within 1..=32, got {}",
                self.num_bits
            )));
        }
        if !(self.v_ref.is_finite() && self.v_ref > 0.0) {
            return Err(ConfigError::InvalidAdc(format!(
                "v_ref must be positive, got {}",
                self.v_ref
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub delay_model: DelayModel,
    pub path_loss: PathLoss,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IqImbalanceConfig {
    pub gain_mismatch: f64,
    pub phase_error_deg: f64,
}

/// Optional baseband impairments applied to each captured frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Adds AWGN at `radar.snr_db` when set.
    pub enable_noise: bool,
    pub enable_clutter: bool,
    pub clutter_level_db: f64,
    pub seed: u64,
    pub iq_imbalance: Option<IqImbalanceConfig>,
    pub dc_offset: Option<f64>,
    pub phase_noise_std: Option<f64>,
    /// Rescales each impaired frame to unit mean power.
    pub normalize: bool,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            enable_noise: true,
            enable_clutter: false,
            clutter_level_db: -40.0,
            seed: 0,
            iq_imbalance: None,
            dc_offset: None,
            phase_noise_std: None,
            normalize: false,
        }
    }
}

impl NoiseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.clutter_level_db.is_finite() {
            return Err(ConfigError::InvalidNoise("clutter_level_db must be finite".into()));
        }
        if let Some(iq) = &self.iq_imbalance {
            if !(iq.gain_mismatch.is_finite() && iq.phase_error_deg.is_finite()) {
                return Err(ConfigError::InvalidNoise("IQ imbalance must be finite".into()));
            }
        }
        if let Some(offset) = self.dc_offset {
            if !offset.is_finite() {
                return Err(ConfigError::InvalidNoise("dc_offset must be finite".into()));
            }
        }
        if let Some(std) = self.phase_noise_std {
            if !(std.is_finite() && std >= 0.0) {
                return Err(ConfigError::InvalidNoise(format!(
                    "phase_noise_std must be non-negative, got {}",
                    std
                )));
            }
        }
        Ok(())
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub radar: RadarConfig,
    pub scenario: TargetScenario,
    pub adc: AdcConfig,
    pub channel: ChannelConfig,
    pub doppler_model: DopplerModel,
    pub window: WindowKind,
    pub noise: NoiseConfig,
    /// Time between frame starts [s].
    pub frame_time: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            radar: RadarConfig::default(),
            scenario: TargetScenario::default(),
            adc: AdcConfig::default(),
            channel: ChannelConfig::default(),
            doppler_model: DopplerModel::default(),
            window: WindowKind::default(),
            noise: NoiseConfig::default(),
            frame_time: 0.05,
        }
    }
}

impl SimulationConfig {
    /// Validates every section and returns the frozen radar parameters.
    pub fn validate(&self) -> Result<RadarParameters, ConfigError> {
        let params = self.radar.validate()?;
        self.scenario.validate()?;
        self.adc.validate()?;
        self.noise.validate()?;

        let frame_duration = params.frame_duration();
        // One part in 1e9 of slack for Nc·Tc rounding.
        if !self.frame_time.is_finite() || self.frame_time < frame_duration * (1.0 - 1e-9) {
            return Err(ConfigError::InvalidFrameTime {
                frame_time: self.frame_time,
                frame_duration,
            });
        }
        Ok(params)
    }
}
