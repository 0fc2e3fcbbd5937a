//! Per-frame CSV snapshots of world state.

use crate::error::Result;
use crate::FrameWriter;
use minerva_world::World;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct CsvWriterConfig {
    pub output_dir: PathBuf,
    pub prefix: String,
    pub write_rigid_bodies: bool,
    pub write_md_particles: bool,
}

impl Default for CsvWriterConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            prefix: "sim".to_string(),
            write_rigid_bodies: true,
            write_md_particles: true,
        }
    }
}

/// Writes `{prefix}_rb_{frame:06}.csv` / `{prefix}_md_{frame:06}.csv`
/// files, one row per body or particle.
pub struct CsvWriter {
    cfg: CsvWriterConfig,
    initialized: bool,
}

impl CsvWriter {
    pub fn new(cfg: CsvWriterConfig) -> Self {
        Self {
            cfg,
            initialized: false,
        }
    }

    fn ensure_output_dir(&mut self) -> Result<()> {
        if !self.initialized {
            fs::create_dir_all(&self.cfg.output_dir)?;
            self.initialized = true;
            log::info!("CSV output directory: {}", self.cfg.output_dir.display());
        }
        Ok(())
    }

    fn frame_path(&self, kind: &str, frame: usize) -> PathBuf {
        self.cfg
            .output_dir
            .join(format!("{}_{}_{:06}.csv", self.cfg.prefix, kind, frame))
    }

    fn write_rigid_bodies(&self, world: &World, frame: usize) -> Result<()> {
        let mut out = BufWriter::new(File::create(self.frame_path("rb", frame))?);

        writeln!(out, "id,x,y,z,vx,vy,vz,mass,radius,kinematic")?;
        for (i, rb) in world.rigid_bodies.iter().enumerate() {
            writeln!(
                out,
                "{},{},{},{},{},{},{},{},{},{}",
                i,
                rb.position.x,
                rb.position.y,
                rb.position.z,
                rb.velocity.x,
                rb.velocity.y,
                rb.velocity.z,
                rb.mass,
                rb.radius,
                rb.kinematic as u8
            )?;
        }

        out.flush()?;
        Ok(())
    }

    fn write_md_particles(&self, world: &World, frame: usize) -> Result<()> {
        let mut out = BufWriter::new(File::create(self.frame_path("md", frame))?);

        writeln!(out, "id,x,y,z,vx,vy,vz,mass")?;
        for (i, p) in world.md_particles.iter().enumerate() {
            writeln!(
                out,
                "{},{},{},{},{},{},{},{}",
                i,
                p.position.x,
                p.position.y,
                p.position.z,
                p.velocity.x,
                p.velocity.y,
                p.velocity.z,
                p.mass
            )?;
        }

        out.flush()?;
        Ok(())
    }
}

impl FrameWriter for CsvWriter {
    fn write(&mut self, world: &World, frame: usize) -> Result<()> {
        self.ensure_output_dir()?;

        if self.cfg.write_rigid_bodies {
            self.write_rigid_bodies(world, frame)?;
        }
        if self.cfg.write_md_particles {
            self.write_md_particles(world, frame)?;
        }
        Ok(())
    }
}
