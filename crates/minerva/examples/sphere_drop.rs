//! A single sphere dropped onto the ground plane, with CSV and VTK output.
//!
//! Run with `RUST_LOG=debug` to see scheduler and writer activity.

use minerva::{
    CsvWriter, CsvWriterConfig, FrameWriter, RigidBody, RigidBodySystem, RigidBodySystemConfig,
    Vec3, VtkWriter, VtkWriterConfig, World,
};

fn main() -> minerva::minerva_io::Result<()> {
    env_logger::init();

    let mut world = World::new();
    world.rigid_bodies.push(RigidBody {
        position: Vec3::new(0.0, 5.0, 0.0),
        radius: 0.25,
        mass: 1.0,
        ..Default::default()
    });

    world.add_system(Box::new(RigidBodySystem::new(RigidBodySystemConfig {
        restitution: 0.7,
        ..Default::default()
    })));

    let mut csv = CsvWriter::new(CsvWriterConfig {
        output_dir: "output/drop".into(),
        prefix: "drop".to_string(),
        write_md_particles: false,
        ..Default::default()
    });
    let mut vtk = VtkWriter::new(VtkWriterConfig {
        output_dir: "output/drop".into(),
        prefix: "drop".to_string(),
        ..Default::default()
    });

    let dt = 1.0 / 120.0;
    let steps = 600;
    let output_interval = 4;

    let mut frame = 0;
    for s in 0..steps {
        world.step(dt);

        if s % output_interval == 0 {
            csv.write(&world, frame)?;
            vtk.write(&world, frame)?;
            frame += 1;
        }

        if s % 120 == 0 {
            let rb = &world.rigid_bodies[0];
            println!(
                "t={:.3}  y={:.4}  vy={:.4}",
                world.time, rb.position.y, rb.velocity.y
            );
        }
    }

    vtk.finalize()?;
    println!("done: {} frames in output/drop/", frame);
    Ok(())
}
