//! Transmit → propagate → dechirp → sample chain and the frame loop that drives it.

pub mod adc;
pub mod channel;
pub mod mixer;
pub mod sensor;
pub mod waveform;

pub use adc::AdcSampler;
pub use channel::{DelayModel, PathLoss, PropagationChannel};
pub use mixer::DechirpMixer;
pub use sensor::{DopplerModel, RadarSensor};
pub use waveform::FmcwWaveform;
