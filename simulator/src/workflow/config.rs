use anyhow::Context;
use fmcwcore::SimulationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::generator::scenario::{preset_config, Preset};

/// Simulation plus the reporting options of one offline run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub simulation: SimulationConfig,
    pub frames: usize,
    /// Peaks reported per frame.
    pub peaks: usize,
    /// Suppression radius around each reported peak, in bins.
    pub guard_bins: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            frames: 1,
            peaks: 3,
            guard_bins: 4,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_preset(preset: Preset, seed: u64) -> anyhow::Result<Self> {
        Ok(Self {
            simulation: preset_config(preset, seed)?,
            ..Self::default()
        })
    }
}
