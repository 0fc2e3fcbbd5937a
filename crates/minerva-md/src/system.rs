//! Velocity-Verlet MD integrator with optional neighbor list and
//! Berendsen thermostat.

use crate::forcefield::LennardJones;
use minerva_math::Vec3;
use minerva_spatial::{NeighborList, NeighborListConfig};
use minerva_world::{ParticleSet, System, World};

/// Options for [`MdSystem`].
#[derive(Clone, Copy, Debug)]
pub struct MdConfig {
    pub epsilon: f64,
    pub sigma: f64,
    /// Cutoff in units of sigma.
    pub rcut_sigma: f64,
    /// Couple to a Berendsen thermostat.
    pub nvt: bool,
    /// Thermostat target temperature (k_B = 1).
    pub temp: f64,
    /// Berendsen time constant.
    pub tau_thermo: f64,
    /// Use the cell-list neighbor list instead of O(N^2) enumeration.
    pub use_neighbor_list: bool,
    pub nlist_skin: f64,
    /// Consult the rebuild predicate every this many steps.
    pub nlist_check_interval: usize,
}

impl Default for MdConfig {
    fn default() -> Self {
        Self {
            epsilon: 1.0,
            sigma: 1.0,
            rcut_sigma: 2.5,
            nvt: false,
            temp: 1.0,
            tau_thermo: 1.0,
            use_neighbor_list: true,
            nlist_skin: 0.3,
            nlist_check_interval: 10,
        }
    }
}

/// Molecular-dynamics subsystem: advances `world.md_particles` under the
/// truncated Lennard-Jones potential with velocity-Verlet.
pub struct MdSystem {
    cfg: MdConfig,
    lj: LennardJones,
    nlist: Option<NeighborList>,
    steps_since_check: usize,
    /// Force accumulator, reused across steps.
    forces: Vec<Vec3>,
    /// Position scratch for neighbor-list maintenance.
    positions: Vec<Vec3>,
}

impl MdSystem {
    pub fn new(cfg: MdConfig) -> Self {
        let r_cut = cfg.rcut_sigma * cfg.sigma;
        let lj = LennardJones::new(cfg.epsilon, cfg.sigma, r_cut);
        let nlist = cfg.use_neighbor_list.then(|| {
            NeighborList::new(NeighborListConfig {
                cutoff: r_cut,
                skin: cfg.nlist_skin,
                ..Default::default()
            })
        });

        Self {
            cfg,
            lj,
            nlist,
            steps_since_check: 0,
            forces: Vec::new(),
            positions: Vec::new(),
        }
    }

    pub fn config(&self) -> &MdConfig {
        &self.cfg
    }

    pub fn force_field(&self) -> &LennardJones {
        &self.lj
    }

    pub fn neighbor_list(&self) -> Option<&NeighborList> {
        self.nlist.as_ref()
    }

    /// Total truncated LJ potential energy, by direct enumeration. A
    /// diagnostic: exact regardless of neighbor-list state.
    pub fn potential_energy(&self, particles: &ParticleSet) -> f64 {
        let n = particles.len();
        let mut pe = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let rij = particles[j].position - particles[i].position;
                pe += self.lj.energy(rij.norm2());
            }
        }
        pe
    }

    /// Keep the neighbor list usable for this step's force evaluations.
    ///
    /// The displacement predicate is consulted every
    /// `nlist_check_interval` steps (and then every step until a rebuild
    /// resets the cadence). A rebuild re-domains the grid to the current
    /// position bounding box padded by `2 * (r_cut + skin)`, so particles
    /// never sit in the clamped border region at force-evaluation time.
    fn refresh_neighbor_list(&mut self, particles: &ParticleSet) {
        let Some(nlist) = self.nlist.as_mut() else {
            return;
        };

        self.steps_since_check += 1;

        self.positions.clear();
        self.positions.extend(particles.iter().map(|p| p.position));

        let due = self.steps_since_check >= self.cfg.nlist_check_interval;
        let stale = !nlist.is_valid() || (due && nlist.needs_rebuild(&self.positions));
        if !stale {
            return;
        }

        if let Some(first) = self.positions.first() {
            let mut lo = *first;
            let mut hi = *first;
            for &p in &self.positions {
                lo = lo.component_min(p);
                hi = hi.component_max(p);
            }
            let margin = 2.0 * (self.lj.cutoff() + self.cfg.nlist_skin);
            nlist.set_domain(lo - Vec3::splat(margin), hi + Vec3::splat(margin));
            log::debug!(
                "md: re-domained neighbor grid to [{}, {}]",
                lo - Vec3::splat(margin),
                hi + Vec3::splat(margin)
            );
        }

        nlist.build(&self.positions);
        self.steps_since_check = 0;
    }

    /// Accumulate LJ forces at the current positions into `self.forces`.
    fn compute_forces(&mut self, particles: &ParticleSet) {
        let n = particles.len();
        self.forces.clear();
        self.forces.resize(n, Vec3::zero());

        if let Some(nlist) = self.nlist.as_ref().filter(|nlist| nlist.is_valid()) {
            for &(i, j) in nlist.pairs() {
                let rij = particles[j].position - particles[i].position;
                let m = self.lj.pair_coefficient(rij.norm2());
                if m != 0.0 {
                    let fij = m * rij;
                    self.forces[i] -= fij;
                    self.forces[j] += fij;
                }
            }
        } else {
            for i in 0..n {
                let pi = particles[i].position;
                for j in (i + 1)..n {
                    let rij = particles[j].position - pi;
                    let m = self.lj.pair_coefficient(rij.norm2());
                    if m != 0.0 {
                        let fij = m * rij;
                        self.forces[i] -= fij;
                        self.forces[j] += fij;
                    }
                }
            }
        }
    }

    /// Berendsen velocity rescaling toward the target temperature.
    fn apply_thermostat(&self, particles: &mut ParticleSet, dt: f64) {
        let n = particles.len();
        if n == 0 {
            return;
        }

        let t_inst = temperature(particles);
        let lambda =
            (1.0 + (dt / self.cfg.tau_thermo) * (self.cfg.temp / t_inst - 1.0)).sqrt();
        for p in particles.iter_mut() {
            p.velocity *= lambda;
        }
    }
}

impl System for MdSystem {
    fn name(&self) -> &str {
        "md"
    }

    fn step(&mut self, world: &mut World, dt: f64) {
        let particles = &mut world.md_particles;
        if particles.is_empty() {
            return;
        }

        if self.cfg.use_neighbor_list {
            self.refresh_neighbor_list(particles);
        }

        // Velocity Verlet: half-kick, drift, recompute forces, half-kick.
        // Both force evaluations use the same pair list.
        self.compute_forces(particles);
        let half_dt = 0.5 * dt;
        for (i, p) in particles.iter_mut().enumerate() {
            let a = self.forces[i] / p.mass;
            p.velocity += half_dt * a;
            p.position += dt * p.velocity;
        }

        self.compute_forces(particles);
        for (i, p) in particles.iter_mut().enumerate() {
            let a = self.forces[i] / p.mass;
            p.velocity += half_dt * a;
        }

        if self.cfg.nvt {
            self.apply_thermostat(particles, dt);
        }
    }
}

/// Total kinetic energy of a particle set.
pub fn kinetic_energy(particles: &ParticleSet) -> f64 {
    particles.iter().map(|p| p.kinetic_energy()).sum()
}

/// Instantaneous temperature `(2/3) KE / N` with `k_B = 1`. Zero for an
/// empty set.
pub fn temperature(particles: &ParticleSet) -> f64 {
    let n = particles.len();
    if n == 0 {
        return 0.0;
    }
    (2.0 / 3.0) * kinetic_energy(particles) / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::velocities::maxwell_boltzmann_velocities;
    use approx::assert_relative_eq;
    use minerva_world::Particle;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn md_world(cfg: MdConfig) -> World {
        let mut world = World::new();
        world.gravity = Vec3::zero();
        world.add_system(Box::new(MdSystem::new(cfg)));
        world
    }

    fn lattice(n_side: usize, spacing: f64) -> Vec<Particle> {
        let offset = 0.5 * spacing * (n_side as f64 - 1.0);
        let mut particles = Vec::new();
        for i in 0..n_side {
            for j in 0..n_side {
                for k in 0..n_side {
                    particles.push(Particle::new(
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
        particles
    }

    #[test]
    fn test_single_particle_drifts_freely() {
        let mut world = md_world(MdConfig::default());
        world.md_particles.push(Particle::new(
            Vec3::zero(),
            Vec3::new(1.0, 2.0, -1.0),
            1.0,
        ));

        for _ in 0..10 {
            world.step(0.01);
        }

        let p = &world.md_particles[0];
        assert_relative_eq!(p.position.x, 0.1, epsilon = 1e-12);
        assert_relative_eq!(p.position.y, 0.2, epsilon = 1e-12);
        assert_relative_eq!(p.position.z, -0.1, epsilon = 1e-12);
        assert_eq!(p.velocity, Vec3::new(1.0, 2.0, -1.0));
    }

    #[test]
    fn test_dimer_at_minimum_feels_no_force() {
        let r_min = 2.0_f64.powf(1.0 / 6.0);
        let mut world = md_world(MdConfig::default());
        world
            .md_particles
            .push(Particle::new(Vec3::zero(), Vec3::zero(), 1.0));
        world.md_particles.push(Particle::new(
            Vec3::new(r_min, 0.0, 0.0),
            Vec3::zero(),
            1.0,
        ));

        for _ in 0..100 {
            world.step(0.005);
        }

        let sep = (world.md_particles[1].position - world.md_particles[0].position).norm();
        assert_relative_eq!(sep, r_min, epsilon = 1e-9);
        assert!(world.md_particles[0].velocity.norm() < 1e-9);
    }

    #[test]
    fn test_zero_dt_is_identity() {
        let mut world = md_world(MdConfig {
            nvt: true,
            ..Default::default()
        });
        world.md_particles.push(Particle::new(
            Vec3::new(0.3, 0.0, 0.0),
            Vec3::new(0.5, -0.25, 1.0),
            1.0,
        ));
        world.md_particles.push(Particle::new(
            Vec3::new(1.4, 0.0, 0.0),
            Vec3::zero(),
            1.0,
        ));

        let before: Vec<_> = world
            .md_particles
            .iter()
            .map(|p| (p.position, p.velocity))
            .collect();
        world.step(0.0);
        let after: Vec<_> = world
            .md_particles
            .iter()
            .map(|p| (p.position, p.velocity))
            .collect();

        // With dt = 0 the thermostat factor is exactly 1.
        assert_eq!(before, after);
    }

    #[test]
    fn test_nve_energy_conservation() {
        let mut world = md_world(MdConfig {
            use_neighbor_list: false,
            ..Default::default()
        });
        world
            .md_particles
            .push(Particle::new(Vec3::zero(), Vec3::new(0.4, 0.0, 0.0), 1.0));
        world.md_particles.push(Particle::new(
            Vec3::new(1.5, 0.0, 0.0),
            Vec3::new(-0.4, 0.0, 0.0),
            1.0,
        ));

        let md = MdSystem::new(MdConfig::default());
        let e0 = kinetic_energy(&world.md_particles) + md.potential_energy(&world.md_particles);

        for _ in 0..1000 {
            world.step(0.002);
        }

        let e1 = kinetic_energy(&world.md_particles) + md.potential_energy(&world.md_particles);
        let drift = (e1 - e0).abs() / e0.abs().max(1e-12);
        assert!(drift < 0.01, "energy drift {:.3}%", drift * 100.0);
    }

    #[test]
    fn test_neighbor_list_matches_direct_enumeration() {
        let particles = lattice(3, 1.2);

        let mut with_list = md_world(MdConfig::default());
        let mut direct = md_world(MdConfig {
            use_neighbor_list: false,
            ..Default::default()
        });
        with_list.md_particles.data = particles.clone();
        direct.md_particles.data = particles;

        for _ in 0..50 {
            with_list.step(0.005);
            direct.step(0.005);
        }

        for (a, b) in with_list
            .md_particles
            .iter()
            .zip(direct.md_particles.iter())
        {
            assert_relative_eq!(a.position.x, b.position.x, epsilon = 1e-9);
            assert_relative_eq!(a.position.y, b.position.y, epsilon = 1e-9);
            assert_relative_eq!(a.position.z, b.position.z, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_thermostat_pulls_temperature_toward_target() {
        let mut world = md_world(MdConfig {
            nvt: true,
            temp: 1.0,
            tau_thermo: 0.5,
            ..Default::default()
        });
        world.md_particles.data = lattice(4, 1.3);

        let mut rng = StdRng::seed_from_u64(42);
        maxwell_boltzmann_velocities(&mut world.md_particles, 2.5, &mut rng);

        for _ in 0..400 {
            world.step(0.005);
        }

        let t = temperature(&world.md_particles);
        assert!((t - 1.0).abs() < 0.4, "temperature {} far from target", t);
    }

    #[test]
    fn test_empty_set_is_noop() {
        let mut world = md_world(MdConfig {
            nvt: true,
            ..Default::default()
        });
        world.step(0.01);
        assert_eq!(world.md_particles.len(), 0);
    }
}
