pub mod peaks;
pub mod rdm;
pub mod window;

pub use peaks::Peak;
pub use rdm::{RangeDopplerMap, RangeDopplerProcessor};
pub use window::WindowKind;
