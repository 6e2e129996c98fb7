use crate::workflow::runner::WorkflowResult;
use fmcwcore::processing::Peak;
use serde::{Deserialize, Serialize};

/// Snapshot served to GUI clients: the last range-Doppler map in dB plus its peaks.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VisualizationModel {
    pub range_axis: Vec<f64>,
    pub velocity_axis: Vec<f64>,
    /// One row per Doppler bin.
    pub magnitude_db: Vec<Vec<f64>>,
    pub peaks: Vec<Peak>,
    pub frames: usize,
    pub clipped_components: usize,
}

impl VisualizationModel {
    pub fn from_result(result: &WorkflowResult) -> Self {
        let magnitude_db = result
            .rdm
            .to_db()
            .outer_iter()
            .map(|row| row.to_vec())
            .collect();
        Self {
            range_axis: result.rdm.range_axis().to_vec(),
            velocity_axis: result.rdm.velocity_axis().to_vec(),
            magnitude_db,
            peaks: result
                .frames
                .last()
                .map(|frame| frame.peaks.clone())
                .unwrap_or_default(),
            frames: result.metrics.frames,
            clipped_components: result.metrics.clipped_components,
        }
    }
}
