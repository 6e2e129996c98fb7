use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Running counters for a simulation.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub frames: usize,
    pub chirps: usize,
    pub clipped_components: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_frame(&self, chirps: usize, clipped_components: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.frames += 1;
            metrics.chirps += chirps;
            metrics.clipped_components += clipped_components;
        }
    }

    pub fn snapshot(&self) -> Metrics {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            Metrics::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
