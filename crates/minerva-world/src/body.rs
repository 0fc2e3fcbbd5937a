//! Rigid sphere state.

use minerva_math::Vec3;

/// A rigid sphere.
///
/// Bodies with `mass <= 0` or `kinematic = true` are treated as having
/// infinite mass: the solver never integrates or pushes them.
#[derive(Clone, Copy, Debug)]
pub struct RigidBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f64,
    pub radius: f64,
    /// If true, dynamics are ignored for this body.
    pub kinematic: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            position: Vec3::zero(),
            velocity: Vec3::zero(),
            mass: 1.0,
            radius: 0.5,
            kinematic: false,
        }
    }
}

impl RigidBody {
    /// True when the solver should integrate and push this body.
    pub fn is_dynamic(&self) -> bool {
        !self.kinematic && self.mass > 0.0
    }

    /// Kinetic energy: 0.5 * m * v^2.
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.norm2()
    }
}
