//! The shared world state.

use crate::particle::ParticleSet;
use crate::scheduler::{Scheduler, System};
use crate::RigidBody;
use minerva_math::{Vec3, STANDARD_GRAVITY};

/// Shared simulation state plus the scheduler that advances it.
pub struct World {
    pub time: f64,
    pub gravity: Vec3,
    pub rigid_bodies: Vec<RigidBody>,
    pub md_particles: ParticleSet,
    pub scheduler: Scheduler,
}

impl Default for World {
    fn default() -> Self {
        Self {
            time: 0.0,
            gravity: Vec3::new(0.0, -STANDARD_GRAVITY, 0.0),
            rigid_bodies: Vec::new(),
            md_particles: ParticleSet::new(),
            scheduler: Scheduler::new(),
        }
    }
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a system with a single substep.
    pub fn add_system(&mut self, system: Box<dyn System>) {
        self.scheduler.add(system);
    }

    /// Register a system that runs `substeps` times per world step.
    pub fn add_system_with_substeps(&mut self, system: Box<dyn System>, substeps: usize) {
        self.scheduler.add_with_substeps(system, substeps);
    }

    /// Advance the world by `dt`: tick every scheduled system in order,
    /// then advance `time` by exactly `dt`.
    pub fn step(&mut self, dt: f64) {
        // Systems borrow the world mutably, so the scheduler is moved out
        // for the duration of the tick.
        let mut scheduler = std::mem::take(&mut self.scheduler);
        scheduler.tick(self, dt);
        self.scheduler = scheduler;
        self.time += dt;
    }
}
