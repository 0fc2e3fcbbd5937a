//! VTK unstructured-grid output for ParaView.
//!
//! Each frame becomes an ASCII `.vtu` file with one `VTK_VERTEX` cell per
//! body or particle; `finalize` writes `.pvd` collection files indexing
//! the emitted frames over time.

use crate::error::Result;
use crate::FrameWriter;
use minerva_world::World;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct VtkWriterConfig {
    pub output_dir: PathBuf,
    pub prefix: String,
    pub write_rigid_bodies: bool,
    pub write_md_particles: bool,
}

impl Default for VtkWriterConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            prefix: "sim".to_string(),
            write_rigid_bodies: true,
            write_md_particles: true,
        }
    }
}

pub struct VtkWriter {
    cfg: VtkWriterConfig,
    initialized: bool,
    rb_frames: Vec<usize>,
    md_frames: Vec<usize>,
}

impl VtkWriter {
    pub fn new(cfg: VtkWriterConfig) -> Self {
        Self {
            cfg,
            initialized: false,
            rb_frames: Vec::new(),
            md_frames: Vec::new(),
        }
    }

    fn ensure_output_dir(&mut self) -> Result<()> {
        if !self.initialized {
            fs::create_dir_all(&self.cfg.output_dir)?;
            self.initialized = true;
            log::info!("VTK output directory: {}", self.cfg.output_dir.display());
        }
        Ok(())
    }

    fn vtu_name(&self, kind: &str, frame: usize) -> String {
        format!("{}_{}_{:06}.vtu", self.cfg.prefix, kind, frame)
    }

    fn write_vtu_header(out: &mut impl Write, n: usize) -> Result<()> {
        writeln!(out, "<?xml version=\"1.0\"?>")?;
        writeln!(
            out,
            "<VTKFile type=\"UnstructuredGrid\" version=\"0.1\" byte_order=\"LittleEndian\">"
        )?;
        writeln!(out, "  <UnstructuredGrid>")?;
        writeln!(
            out,
            "    <Piece NumberOfPoints=\"{}\" NumberOfCells=\"{}\">",
            n, n
        )?;
        Ok(())
    }

    /// One `VTK_VERTEX` cell per point.
    fn write_vtu_cells(out: &mut impl Write, n: usize) -> Result<()> {
        writeln!(out, "      <Cells>")?;
        writeln!(
            out,
            "        <DataArray type=\"Int32\" Name=\"connectivity\" format=\"ascii\">"
        )?;
        for i in 0..n {
            writeln!(out, "          {}", i)?;
        }
        writeln!(out, "        </DataArray>")?;
        writeln!(
            out,
            "        <DataArray type=\"Int32\" Name=\"offsets\" format=\"ascii\">"
        )?;
        for i in 1..=n {
            writeln!(out, "          {}", i)?;
        }
        writeln!(out, "        </DataArray>")?;
        writeln!(
            out,
            "        <DataArray type=\"UInt8\" Name=\"types\" format=\"ascii\">"
        )?;
        for _ in 0..n {
            writeln!(out, "          1")?;
        }
        writeln!(out, "        </DataArray>")?;
        writeln!(out, "      </Cells>")?;
        Ok(())
    }

    fn write_vtu_footer(out: &mut impl Write) -> Result<()> {
        writeln!(out, "    </Piece>")?;
        writeln!(out, "  </UnstructuredGrid>")?;
        writeln!(out, "</VTKFile>")?;
        Ok(())
    }

    fn write_rigid_bodies_vtu(&self, world: &World, frame: usize) -> Result<()> {
        let path = self.cfg.output_dir.join(self.vtu_name("rb", frame));
        let mut out = BufWriter::new(File::create(path)?);
        let n = world.rigid_bodies.len();

        Self::write_vtu_header(&mut out, n)?;

        writeln!(out, "      <Points>")?;
        writeln!(
            out,
            "        <DataArray type=\"Float32\" NumberOfComponents=\"3\" format=\"ascii\">"
        )?;
        for rb in &world.rigid_bodies {
            writeln!(
                out,
                "          {} {} {}",
                rb.position.x, rb.position.y, rb.position.z
            )?;
        }
        writeln!(out, "        </DataArray>")?;
        writeln!(out, "      </Points>")?;

        Self::write_vtu_cells(&mut out, n)?;

        writeln!(
            out,
            "      <PointData Vectors=\"velocity\" Scalars=\"mass\">"
        )?;
        writeln!(
            out,
            "        <DataArray type=\"Float32\" Name=\"velocity\" NumberOfComponents=\"3\" format=\"ascii\">"
        )?;
        for rb in &world.rigid_bodies {
            writeln!(
                out,
                "          {} {} {}",
                rb.velocity.x, rb.velocity.y, rb.velocity.z
            )?;
        }
        writeln!(out, "        </DataArray>")?;
        writeln!(
            out,
            "        <DataArray type=\"Float32\" Name=\"mass\" format=\"ascii\">"
        )?;
        for rb in &world.rigid_bodies {
            writeln!(out, "          {}", rb.mass)?;
        }
        writeln!(out, "        </DataArray>")?;
        writeln!(
            out,
            "        <DataArray type=\"Float32\" Name=\"radius\" format=\"ascii\">"
        )?;
        for rb in &world.rigid_bodies {
            writeln!(out, "          {}", rb.radius)?;
        }
        writeln!(out, "        </DataArray>")?;
        writeln!(
            out,
            "        <DataArray type=\"Int32\" Name=\"kinematic\" format=\"ascii\">"
        )?;
        for rb in &world.rigid_bodies {
            writeln!(out, "          {}", rb.kinematic as u8)?;
        }
        writeln!(out, "        </DataArray>")?;
        writeln!(out, "      </PointData>")?;

        Self::write_vtu_footer(&mut out)?;
        out.flush()?;
        Ok(())
    }

    fn write_md_particles_vtu(&self, world: &World, frame: usize) -> Result<()> {
        let path = self.cfg.output_dir.join(self.vtu_name("md", frame));
        let mut out = BufWriter::new(File::create(path)?);
        let n = world.md_particles.len();

        Self::write_vtu_header(&mut out, n)?;

        writeln!(out, "      <Points>")?;
        writeln!(
            out,
            "        <DataArray type=\"Float32\" NumberOfComponents=\"3\" format=\"ascii\">"
        )?;
        for p in world.md_particles.iter() {
            writeln!(
                out,
                "          {} {} {}",
                p.position.x, p.position.y, p.position.z
            )?;
        }
        writeln!(out, "        </DataArray>")?;
        writeln!(out, "      </Points>")?;

        Self::write_vtu_cells(&mut out, n)?;

        writeln!(
            out,
            "      <PointData Vectors=\"velocity\" Scalars=\"mass\">"
        )?;
        writeln!(
            out,
            "        <DataArray type=\"Float32\" Name=\"velocity\" NumberOfComponents=\"3\" format=\"ascii\">"
        )?;
        for p in world.md_particles.iter() {
            writeln!(
                out,
                "          {} {} {}",
                p.velocity.x, p.velocity.y, p.velocity.z
            )?;
        }
        writeln!(out, "        </DataArray>")?;
        writeln!(
            out,
            "        <DataArray type=\"Float32\" Name=\"mass\" format=\"ascii\">"
        )?;
        for p in world.md_particles.iter() {
            writeln!(out, "          {}", p.mass)?;
        }
        writeln!(out, "        </DataArray>")?;
        writeln!(out, "      </PointData>")?;

        Self::write_vtu_footer(&mut out)?;
        out.flush()?;
        Ok(())
    }

    fn write_pvd_collection(&self, kind: &str, frames: &[usize]) -> Result<()> {
        if frames.is_empty() {
            return Ok(());
        }

        let path = self
            .cfg
            .output_dir
            .join(format!("{}_{}.pvd", self.cfg.prefix, kind));
        let mut out = BufWriter::new(File::create(path)?);

        writeln!(out, "<?xml version=\"1.0\"?>")?;
        writeln!(
            out,
            "<VTKFile type=\"Collection\" version=\"0.1\" byte_order=\"LittleEndian\">"
        )?;
        writeln!(out, "  <Collection>")?;
        for &frame in frames {
            writeln!(
                out,
                "    <DataSet timestep=\"{}\" file=\"{}\"/>",
                frame,
                self.vtu_name(kind, frame)
            )?;
        }
        writeln!(out, "  </Collection>")?;
        writeln!(out, "</VTKFile>")?;

        out.flush()?;
        Ok(())
    }
}

impl FrameWriter for VtkWriter {
    fn write(&mut self, world: &World, frame: usize) -> Result<()> {
        self.ensure_output_dir()?;

        if self.cfg.write_rigid_bodies && !world.rigid_bodies.is_empty() {
            self.write_rigid_bodies_vtu(world, frame)?;
            self.rb_frames.push(frame);
        }
        if self.cfg.write_md_particles && !world.md_particles.is_empty() {
            self.write_md_particles_vtu(world, frame)?;
            self.md_frames.push(frame);
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        if !self.initialized {
            return Ok(());
        }

        self.write_pvd_collection("rb", &self.rb_frames)?;
        self.write_pvd_collection("md", &self.md_frames)?;
        log::info!("VTK output finalized; open the .pvd files in ParaView");
        Ok(())
    }
}
