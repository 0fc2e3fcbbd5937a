//! Molecular dynamics for the minerva engine.
//!
//! Implements velocity-Verlet integration of a truncated Lennard-Jones
//! fluid with:
//! - a cell-list + Verlet-skin neighbor list (from `minerva-spatial`) with
//!   lazy rebuilds and automatic domain growth
//! - an optional Berendsen velocity-rescaling thermostat
//! - Maxwell-Boltzmann velocity initialization and energy diagnostics
//!
//! The [`MdSystem`] plugs into the world scheduler and advances
//! `world.md_particles`; rigid bodies are untouched.

pub mod forcefield;
pub mod system;
pub mod velocities;

pub use forcefield::LennardJones;
pub use system::{kinetic_energy, temperature, MdConfig, MdSystem};
pub use velocities::{maxwell_boltzmann_velocities, remove_com_drift};
