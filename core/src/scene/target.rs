/// Kinematic and reflective state of a point target.
///
/// Snapshots of this type are what the propagation channel consumes; only
/// [`Scene::step`](crate::scene::Scene::step) mutates the live copies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetState {
    /// Range [m].
    pub range: f64,
    /// Radial velocity [m/s], positive when receding.
    pub velocity: f64,
    /// Radar cross section scale.
    pub rcs: f64,
    /// Reflection phase [rad].
    pub phase: f64,
}

impl TargetState {
    pub fn new(range: f64, velocity: f64, rcs: f64, phase: f64) -> Self {
        Self {
            range,
            velocity,
            rcs,
            phase,
        }
    }

    /// Constant-velocity update over `dt` seconds.
    pub fn propagate(&mut self, dt: f64) {
        self.range += self.velocity * dt;
    }
}
