//! Signal-chain and range-Doppler processing core for the FMCW radar simulator.
//!
//! The modules follow the physical chain of a frame: a scene of point targets
//! feeds the transmit/propagate/dechirp/sample loop in [`radar`], which yields
//! a beat matrix that [`processing`] turns into a Range-Doppler Map.

pub mod baseband;
pub mod config;
pub mod constants;
pub mod math;
pub mod pipeline;
pub mod prelude;
pub mod processing;
pub mod radar;
pub mod scene;
pub mod telemetry;

pub use config::{RadarConfig, RadarParameters, SimulationConfig};
pub use prelude::{BeatMatrix, ConfigError, SimError, SimResult};
