//! Two Lennard-Jones particles oscillating around the potential minimum.

use minerva::{kinetic_energy, MdConfig, MdSystem, Particle, Vec3, World};

fn main() {
    env_logger::init();

    let mut world = World::new();
    world.gravity = Vec3::zero();

    // Start slightly inside the equilibrium separation 2^(1/6) so the
    // dimer oscillates.
    world
        .md_particles
        .push(Particle::new(Vec3::zero(), Vec3::zero(), 1.0));
    world
        .md_particles
        .push(Particle::new(Vec3::new(1.05, 0.0, 0.0), Vec3::zero(), 1.0));

    let cfg = MdConfig {
        use_neighbor_list: false,
        ..Default::default()
    };
    let probe = MdSystem::new(cfg);
    world.add_system(Box::new(MdSystem::new(cfg)));

    let dt = 0.005;
    for s in 0..1000 {
        world.step(dt);

        if s % 100 == 0 {
            let sep = (world.md_particles[1].position - world.md_particles[0].position).norm();
            let energy = kinetic_energy(&world.md_particles)
                + probe.potential_energy(&world.md_particles);
            println!("t={:.2}  r={:.5}  E={:+.6}", world.time, sep, energy);
        }
    }
}
