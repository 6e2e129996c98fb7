use log::warn;
use num_complex::Complex64;
use rustfft::num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::config::{ChannelConfig, RadarParameters};
use crate::math::phasor;
use crate::prelude::Channel;
use crate::scene::TargetState;

/// Guard added to `R²` so the inverse-square model stays finite at zero range.
pub const RANGE_EPSILON: f64 = 1e-6;

/// How the round-trip delay is applied to the transmit chirp.
///
/// Both variants shift circularly: the first `floor(τ·fs)` samples of the
/// echo are taken from the tail of the chirp. Delays must stay small against
/// the chirp duration for the echo to be meaningful.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayModel {
    /// Shift by `round(τ·fs)` whole samples. Range and carrier phase are
    /// quantized to whole samples, so motion below one sample is invisible.
    IntegerShift,
    /// Shift by `floor(τ·fs)` samples and apply the remaining sub-sample
    /// delay exactly through the chirp phase law.
    #[default]
    Fractional,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathLoss {
    /// Amplitude `√RCS`.
    #[default]
    None,
    /// Amplitude `√RCS / (R² + ε)`.
    InverseSquare,
}

/// Multi-target propagation channel: delay, Doppler shift and attenuation
/// per target, echoes summed.
#[derive(Debug, Clone)]
pub struct PropagationChannel {
    params: RadarParameters,
    delay_model: DelayModel,
    path_loss: PathLoss,
}

impl PropagationChannel {
    pub fn new(params: RadarParameters, config: &ChannelConfig) -> Self {
        Self::with_models(params, config.delay_model, config.path_loss)
    }

    pub fn with_models(params: RadarParameters, delay_model: DelayModel, path_loss: PathLoss) -> Self {
        Self {
            params,
            delay_model,
            path_loss,
        }
    }

    pub fn delay_model(&self) -> DelayModel {
        self.delay_model
    }

    /// `τ = 2R / c` [s].
    pub fn round_trip_delay(&self, range: f64) -> f64 {
        2.0 * range / self.params.speed_of_light()
    }

    /// `f_d = 2v / λ` [Hz], positive for a receding target.
    pub fn doppler_frequency(&self, velocity: f64) -> f64 {
        2.0 * velocity / self.params.wavelength()
    }

    pub fn attenuation(&self, target: &TargetState) -> f64 {
        let amplitude = target.rcs.max(0.0).sqrt();
        match self.path_loss {
            PathLoss::None => amplitude,
            PathLoss::InverseSquare => amplitude / (target.range * target.range + RANGE_EPSILON),
        }
    }

    /// Adds one target's echo into `out`.
    fn accumulate_echo(
        &self,
        tx: &[Complex64],
        target: &TargetState,
        slow_time: f64,
        out: &mut [Complex64],
    ) {
        let len = tx.len();
        let fs = self.params.sampling_rate();
        let tau = self.round_trip_delay(target.range);
        let delay_samples = tau * fs;

        let (whole, residual) = match self.delay_model {
            DelayModel::IntegerShift => (delay_samples.round(), None),
            DelayModel::Fractional => {
                let whole = delay_samples.floor();
                (whole, Some(tau - whole / fs))
            }
        };
        let shift = (whole as i64).rem_euclid(len as i64) as usize;

        let fc = self.params.fc();
        let slope = self.params.slope();
        let doppler = self.doppler_frequency(target.velocity);
        let reflection = Complex64::cis(target.phase) * self.attenuation(target);

        for (n, acc) in out.iter_mut().enumerate() {
            let src = (n + len - shift) % len;
            let mut echo = tx[src];
            if let Some(delta) = residual {
                // s(t - δ) = s(t)·exp(-j2π((fc + S·t)·δ - ½·S·δ²))
                let t_src = src as f64 / fs;
                echo *= phasor(-((fc + slope * t_src) * delta - 0.5 * slope * delta * delta));
            }
            // Receding targets return at a lower frequency, so the echo carries
            // exp(-j2π f_d t) and the dechirped beat tx·conj(rx) sees +f_d.
            // Positive velocity (receding) must land on the positive velocity axis.
            echo *= phasor(-doppler * (n as f64 / fs + slow_time));
            *acc += echo * reflection;
        }
    }
}

impl Channel for PropagationChannel {
    fn propagate_at(
        &self,
        tx: &[Complex64],
        targets: &[TargetState],
        slow_time: f64,
    ) -> Vec<Complex64> {
        let mut rx = vec![Complex64::zero(); tx.len()];
        if tx.is_empty() {
            return rx;
        }

        let max_range = self.params.max_range();
        if targets.iter().any(|t| t.range < 0.0 || t.range > max_range) {
            warn!(
                "target outside the unambiguous interval [0, {:.2}] m; its echo wraps around the chirp",
                max_range
            );
        }

        for target in targets {
            self.accumulate_echo(tx, target, slow_time, &mut rx);
        }
        rx
    }
}
