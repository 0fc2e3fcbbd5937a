//! Free expansion of a dense 1000-particle gas, NVE.
//!
//! Watch the RMS spread grow while total energy stays put.

use minerva::{
    kinetic_energy, maxwell_boltzmann_velocities, temperature, MdConfig, MdSystem, Particle,
    Vec3, World,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    env_logger::init();

    let mut world = World::new();
    world.gravity = Vec3::zero();

    let n_side = 10;
    let spacing = 0.9;
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

    let cfg = MdConfig {
        epsilon: 0.5,
        ..Default::default()
    };
    let probe = MdSystem::new(cfg);
    world.add_system(Box::new(MdSystem::new(cfg)));

    let e0 = kinetic_energy(&world.md_particles) + probe.potential_energy(&world.md_particles);
    println!("{} particles, E0 = {:.4}", world.md_particles.len(), e0);

    let dt = 0.005;
    let steps = 2000;
    for s in 0..steps {
        world.step(dt);

        if s % 200 == 0 {
            let n = world.md_particles.len() as f64;
            let com = world
                .md_particles
                .iter()
                .fold(Vec3::zero(), |acc, p| acc + p.position)
                / n;
            let rms_spread = (world
                .md_particles
                .iter()
                .map(|p| (p.position - com).norm2())
                .sum::<f64>()
                / n)
                .sqrt();

            println!(
                "t={:.2}  rms_spread={:.3}  T={:.3}",
                world.time,
                rms_spread,
                temperature(&world.md_particles)
            );
        }
    }

    let e1 = kinetic_energy(&world.md_particles) + probe.potential_energy(&world.md_particles);
    println!(
        "E0 = {:.4}, E1 = {:.4}, drift = {:.3}%",
        e0,
        e1,
        100.0 * (e1 - e0).abs() / e0.abs()
    );
}
