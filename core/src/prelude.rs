use ndarray::Array2;
use num_complex::Complex64;

use crate::scene::TargetState;

/// Complex beat samples, `[num_chirps × num_samples]`.
///
/// Rows are slow time (chirp index), columns are fast time (sample index).
pub type BeatMatrix = Array2<Complex64>;

/// Invalid or physically inconsistent configuration, reported before any
/// simulation runs.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be strictly positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error(
        "sampling window does not fit the chirp: {sample_rate} Hz x {chirp_duration} s < {num_samples} samples"
    )]
    InsufficientSamples {
        sample_rate: f64,
        chirp_duration: f64,
        num_samples: usize,
    },
    #[error("invalid ADC configuration: {0}")]
    InvalidAdc(String),
    #[error("invalid target {index}: {reason}")]
    InvalidTarget { index: usize, reason: String },
    #[error("frame time {frame_time} s is shorter than the chirp train ({frame_duration} s)")]
    InvalidFrameTime { frame_time: f64, frame_duration: f64 },
    #[error("invalid noise configuration: {0}")]
    InvalidNoise(String),
}

/// Common error type for simulation and processing.
#[derive(thiserror::Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("beat matrix shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("waveform produced {actual} samples, acquisition window needs {expected}")]
    ShortChirp { expected: usize, actual: usize },
}

pub type SimResult<T> = Result<T, SimError>;

/// Source of one chirp of complex transmit samples.
pub trait WaveformSource {
    fn generate(&self) -> Vec<Complex64>;
}

/// Propagation from the transmitter to the targets and back.
pub trait Channel {
    /// Echo of `tx` off every target, evaluated at `slow_time` seconds into
    /// the frame. Channels that only model kinematic Doppler ignore
    /// `slow_time`.
    fn propagate_at(
        &self,
        tx: &[Complex64],
        targets: &[TargetState],
        slow_time: f64,
    ) -> Vec<Complex64>;

    fn propagate(&self, tx: &[Complex64], targets: &[TargetState]) -> Vec<Complex64> {
        self.propagate_at(tx, targets, 0.0)
    }
}

/// Combines transmit and received samples into a beat signal.
pub trait Mixer {
    fn mix(&self, tx: &[Complex64], rx: &[Complex64]) -> Vec<Complex64>;
}

/// Converts an analog beat row into digital samples.
pub trait Sampler {
    fn sample(&self, analog: &[Complex64]) -> Vec<Complex64>;

    /// Number of I/Q components that would be clipped by [`Sampler::sample`].
    fn clipped_components(&self, _analog: &[Complex64]) -> usize {
        0
    }
}

/// Post-pass impairment applied in place to a beat matrix.
///
/// Implementations must preserve the matrix shape.
pub trait BasebandFilter {
    fn name(&self) -> &'static str;
    fn apply(&mut self, beat: &mut BeatMatrix);
}
