use log::debug;

use crate::scene::target::TargetState;

/// Ordered set of targets plus a scene clock.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    targets: Vec<TargetState>,
    time: f64,
}

impl Scene {
    pub fn new(targets: Vec<TargetState>) -> Self {
        Self { targets, time: 0.0 }
    }

    pub fn add_target(&mut self, target: TargetState) {
        self.targets.push(target);
    }

    /// Advances every target by `dt` seconds of constant-velocity motion.
    pub fn step(&mut self, dt: f64) {
        for target in &mut self.targets {
            target.propagate(dt);
        }
        self.time += dt;
    }

    /// Copy of the current target states.
    pub fn snapshot(&self) -> Vec<TargetState> {
        self.targets.clone()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn log_state(&self) {
        for (idx, target) in self.targets.iter().enumerate() {
            debug!(
                "t={:.6}s target {} range {:.4} m velocity {:.3} m/s",
                self.time, idx, target.range, target.velocity
            );
        }
    }
}
