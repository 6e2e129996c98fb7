use crate::workflow::config::WorkflowConfig;
use anyhow::{bail, Context};
use fmcwcore::pipeline::SimulationRunner;
use fmcwcore::processing::{Peak, RangeDopplerMap};
use fmcwcore::telemetry::Metrics;
use fmcwcore::SimulationConfig;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FrameSummary {
    pub index: usize,
    pub start_time: f64,
    pub peaks: Vec<Peak>,
}

pub struct WorkflowResult {
    pub frames: Vec<FrameSummary>,
    /// Map of the last frame.
    pub rdm: RangeDopplerMap,
    pub metrics: Metrics,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        self.execute_config(self.config.simulation.clone())
    }

    /// Runs `simulation` with this workflow's frame count and peak settings.
    pub fn execute_config(&self, simulation: SimulationConfig) -> anyhow::Result<WorkflowResult> {
        if self.config.frames == 0 {
            bail!("workflow requests zero frames; at least one is required");
        }
        let mut simulation =
            SimulationRunner::new(simulation).context("building simulation from config")?;
        let outputs = simulation
            .run_frames(self.config.frames)
            .context("simulating frames")?;

        let frames = outputs
            .iter()
            .map(|frame| FrameSummary {
                index: frame.index,
                start_time: frame.start_time,
                peaks: frame.rdm.peaks(self.config.peaks, self.config.guard_bins),
            })
            .collect();
        let rdm = outputs
            .into_iter()
            .last()
            .map(|frame| frame.rdm)
            .context("simulation produced no frames")?;

        Ok(WorkflowResult {
            frames,
            rdm,
            metrics: simulation.metrics(),
        })
    }
}
