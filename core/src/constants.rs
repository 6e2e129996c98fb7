use serde::{Deserialize, Serialize};

/// Speed of light in vacuum [m/s].
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Physical constants shared by every component of the chain.
///
/// Components never hard-code these values; they read them from the
/// [`RadarParameters`](crate::config::RadarParameters) they were built with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    pub speed_of_light: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            speed_of_light: SPEED_OF_LIGHT,
        }
    }
}
