use serde::{Deserialize, Serialize};

use crate::prelude::ConfigError;
use crate::scene::TargetState;

/// Single point-target definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Initial range [m].
    pub range_m: f64,
    /// Radial velocity [m/s], positive when receding.
    pub velocity_mps: f64,
    #[serde(default = "default_rcs")]
    pub rcs: f64,
    #[serde(default)]
    pub phase_rad: f64,
}

fn default_rcs() -> f64 {
    1.0
}

impl TargetConfig {
    pub fn new(range_m: f64, velocity_mps: f64, rcs: f64) -> Self {
        Self {
            range_m,
            velocity_mps,
            rcs,
            phase_rad: 0.0,
        }
    }

    pub fn to_state(&self) -> TargetState {
        TargetState::new(self.range_m, self.velocity_mps, self.rcs, self.phase_rad)
    }
}

/// Collection of targets for one simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetScenario {
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

impl TargetScenario {
    pub fn new(targets: Vec<TargetConfig>) -> Self {
        Self { targets }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, target) in self.targets.iter().enumerate() {
            let finite = target.range_m.is_finite()
                && target.velocity_mps.is_finite()
                && target.rcs.is_finite()
                && target.phase_rad.is_finite();
            if !finite {
                return Err(ConfigError::InvalidTarget {
                    index,
                    reason: "all fields must be finite".into(),
                });
            }
            if target.rcs < 0.0 {
                return Err(ConfigError::InvalidTarget {
                    index,
                    reason: format!("rcs must be non-negative, got {}", target.rcs),
                });
            }
        }
        Ok(())
    }

    pub fn states(&self) -> Vec<TargetState> {
        self.targets.iter().map(TargetConfig::to_state).collect()
    }
}
