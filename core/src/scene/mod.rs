pub mod scenario;
pub mod target;

pub use scenario::Scene;
pub use target::TargetState;
