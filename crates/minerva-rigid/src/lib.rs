//! Rigid sphere dynamics for the minerva engine.
//!
//! The [`RigidBodySystem`] advances `world.rigid_bodies` with semi-implicit
//! Euler, a ground plane, and an iterative position-and-impulse pair solver
//! fed by a spatial hash broad phase. Each substep runs four phases:
//! integrate + ground, grid build, pair resolution, ground re-projection.

pub mod broad_phase;
pub mod overlap;
pub mod solver;

pub use broad_phase::SpatialHashGrid;
pub use overlap::{count_overlaps, resolve_initial_overlaps};
pub use solver::{RigidBodySystem, RigidBodySystemConfig};
