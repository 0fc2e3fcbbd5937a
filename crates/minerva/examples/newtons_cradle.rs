//! Newton's cradle: momentum and energy transfer along a line of
//! touching spheres.

use minerva::{
    CsvWriter, CsvWriterConfig, FrameWriter, RigidBody, RigidBodySystem, RigidBodySystemConfig,
    Vec3, World,
};

fn main() -> minerva::minerva_io::Result<()> {
    env_logger::init();

    let mut world = World::new();

    let n_spheres = 7;
    let radius = 0.3;
    let spacing = radius * 2.0;

    for i in 0..n_spheres {
        world.rigid_bodies.push(RigidBody {
            position: Vec3::new(-3.0 + i as f64 * spacing, 2.0, 0.0),
            radius,
            mass: 1.0,
            ..Default::default()
        });
    }

    // Pull the end spheres back and swing them in.
    world.rigid_bodies[0].position += Vec3::new(-2.0, 0.5, 0.0);
    world.rigid_bodies[0].velocity = Vec3::new(5.0, -1.0, 0.0);
    world.rigid_bodies[n_spheres - 1].position += Vec3::new(2.0, 0.5, 0.0);
    world.rigid_bodies[n_spheres - 1].velocity = Vec3::new(-5.0, -1.0, 0.0);

    world.add_system(Box::new(RigidBodySystem::new(RigidBodySystemConfig {
        restitution: 0.95,
        substeps: 6,
        pair_iterations: 32,
        penetration_slop: 1e-5,
        ..Default::default()
    })));

    let mut csv = CsvWriter::new(CsvWriterConfig {
        output_dir: "output/cradle".into(),
        prefix: "cradle".to_string(),
        write_md_particles: false,
        ..Default::default()
    });

    let dt = 1.0 / 240.0;
    let steps = 3600;
    let output_interval = 6;

    let mut frame = 0;
    for s in 0..steps {
        world.step(dt);

        if s % output_interval == 0 {
            csv.write(&world, frame)?;
            frame += 1;
        }

        if s % 240 == 0 {
            let px: f64 = world
                .rigid_bodies
                .iter()
                .map(|rb| rb.mass * rb.velocity.x)
                .sum();
            let ke: f64 = world
                .rigid_bodies
                .iter()
                .map(|rb| rb.kinetic_energy())
                .sum();
            println!("t={:.2}  px={:+.4}  KE={:.4}", world.time, px, ke);
        }
    }

    println!("done: {} frames in output/cradle/", frame);
    Ok(())
}
