//! minerva — modular particle-dynamics engine.
//!
//! A [`World`] holds rigid spheres and MD particles; a scheduler of
//! pluggable systems advances it. The [`RigidBodySystem`] resolves gravity,
//! ground contact, and sphere-sphere collisions; the [`MdSystem`]
//! integrates a Lennard-Jones fluid with velocity-Verlet, a cell-list
//! neighbor list, and an optional Berendsen thermostat. This umbrella crate
//! re-exports the public surface of the sub-crates.
//!
//! # Example
//!
//! ```
//! use minerva::{RigidBody, RigidBodySystem, RigidBodySystemConfig, Vec3, World};
//!
//! let mut world = World::new();
//! world.rigid_bodies.push(RigidBody {
//!     position: Vec3::new(0.0, 1.0, 0.0),
//!     radius: 0.25,
//!     ..Default::default()
//! });
//! world.add_system(Box::new(RigidBodySystem::new(
//!     RigidBodySystemConfig::default(),
//! )));
//!
//! for _ in 0..240 {
//!     world.step(1.0 / 120.0);
//! }
//!
//! // The sphere has landed and stays above the ground plane.
//! assert!(world.rigid_bodies[0].position.y >= 0.25);
//! ```

pub use minerva_io::{self};
pub use minerva_math::{self};
pub use minerva_md::{self};
pub use minerva_rigid::{self};
pub use minerva_spatial::{self};
pub use minerva_world::{self};

pub use minerva_io::{CsvWriter, CsvWriterConfig, FrameWriter, VtkWriter, VtkWriterConfig};
pub use minerva_math::Vec3;
pub use minerva_md::{
    kinetic_energy, maxwell_boltzmann_velocities, temperature, LennardJones, MdConfig, MdSystem,
};
pub use minerva_rigid::{
    count_overlaps, resolve_initial_overlaps, RigidBodySystem, RigidBodySystemConfig,
};
pub use minerva_spatial::{NeighborList, NeighborListConfig, NeighborListStats};
pub use minerva_world::{Particle, ParticleSet, RigidBody, Scheduler, System, World};
