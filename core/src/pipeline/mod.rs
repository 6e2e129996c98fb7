pub mod runner;

pub use runner::{FmcwSensor, FrameOutput, SimulationRunner};
