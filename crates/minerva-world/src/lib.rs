//! World state and orchestration for the minerva engine.
//!
//! A [`World`] owns the simulated state (rigid spheres and MD particles)
//! plus a [`Scheduler`] of pluggable [`System`]s. Each call to
//! [`World::step`] runs every scheduled system in insertion order, with the
//! per-system substep count dividing the world timestep, then advances
//! `time` by exactly `dt`.

pub mod body;
pub mod particle;
pub mod scheduler;
pub mod world;

pub use body::RigidBody;
pub use particle::{Particle, ParticleSet};
pub use scheduler::{Scheduler, System};
pub use world::World;
