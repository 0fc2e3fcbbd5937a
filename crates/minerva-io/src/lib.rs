//! Simulation output for the minerva engine.
//!
//! Frame writers consume read-only world state between world steps and
//! produce per-frame files in a configured output directory. The core
//! never calls them; client code drives the cadence.

pub mod csv;
pub mod error;
pub mod vtk;

pub use csv::{CsvWriter, CsvWriterConfig};
pub use error::{Result, WriterError};
pub use vtk::{VtkWriter, VtkWriterConfig};

use minerva_world::World;

/// Writes one frame of simulation output per call.
pub trait FrameWriter {
    /// Write a single frame of simulation data.
    fn write(&mut self, world: &World, frame: usize) -> Result<()>;

    /// Flush any multi-frame index.
    fn finalize(&mut self) -> Result<()> {
        Ok(())
    }
}
