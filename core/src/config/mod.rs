pub mod radar;
pub mod simulation;
pub mod target;

pub use radar::{RadarConfig, RadarParameters};
pub use simulation::{AdcConfig, ChannelConfig, IqImbalanceConfig, NoiseConfig, SimulationConfig};
pub use target::{TargetConfig, TargetScenario};
