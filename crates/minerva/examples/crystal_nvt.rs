//! An 8x8x8 Lennard-Jones lattice thermostatted from a hot start down to
//! a target temperature.

use minerva::{
    maxwell_boltzmann_velocities, temperature, MdConfig, MdSystem, Particle, Vec3, VtkWriter,
    VtkWriterConfig, World,
};
use minerva::FrameWriter;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> minerva::minerva_io::Result<()> {
    env_logger::init();

    let mut world = World::new();
    world.gravity = Vec3::zero();

    let n_side = 8;
    let spacing = 1.3;
    let offset = 0.5 * spacing * (n_side as f64 - 1.0);
    for i in 0..n_side {
        for j in 0..n_side {
            for k in 0..n_side {
                world.md_particles.push(Particle::new(
                    Vec3::new(
                        i as f64 * spacing - offset,
                        j as f64 * spacing - offset,
                        k as f64 * spacing - offset,
                    ),
                    Vec3::zero(),
                    1.0,
                ));
            }
        }
    }

    let mut rng = StdRng::seed_from_u64(42);
    maxwell_boltzmann_velocities(&mut world.md_particles, 2.0, &mut rng);
    println!(
        "{} particles, initial T = {:.3}",
        world.md_particles.len(),
        temperature(&world.md_particles)
    );

    world.add_system(Box::new(MdSystem::new(MdConfig {
        nvt: true,
        temp: 1.5,
        tau_thermo: 1.0,
        ..Default::default()
    })));

    let mut vtk = VtkWriter::new(VtkWriterConfig {
        output_dir: "output/crystal".into(),
        prefix: "crystal".to_string(),
        write_rigid_bodies: false,
        ..Default::default()
    });

    let dt = 0.005;
    let steps = 1000;
    let output_interval = 20;

    let mut frame = 0;
    for s in 0..steps {
        world.step(dt);

        if s % output_interval == 0 {
            vtk.write(&world, frame)?;
            frame += 1;
        }

        if s % 100 == 0 {
            println!("t={:.2}  T={:.3}", world.time, temperature(&world.md_particles));
        }
    }

    vtk.finalize()?;
    println!("done: {} frames in output/crystal/", frame);
    Ok(())
}
