//! Thermal velocity initialization.

use minerva_math::Vec3;
use minerva_world::ParticleSet;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

/// Draw Maxwell-Boltzmann velocities at temperature `temp` (k_B = 1):
/// each component is Gaussian with variance `temp / mass`. Center-of-mass
/// drift is removed afterwards.
pub fn maxwell_boltzmann_velocities(particles: &mut ParticleSet, temp: f64, rng: &mut StdRng) {
    debug_assert!(temp >= 0.0);

    for p in particles.iter_mut() {
        let sigma = (temp / p.mass).sqrt();
        let component = Normal::new(0.0, sigma).unwrap();
        p.velocity = Vec3::new(
            component.sample(rng),
            component.sample(rng),
            component.sample(rng),
        );
    }

    remove_com_drift(particles);
}

/// Subtract the center-of-mass velocity so total momentum is zero.
pub fn remove_com_drift(particles: &mut ParticleSet) {
    let mut momentum = Vec3::zero();
    let mut total_mass = 0.0;
    for p in particles.iter() {
        momentum += p.mass * p.velocity;
        total_mass += p.mass;
    }
    if total_mass <= 0.0 {
        return;
    }

    let com_velocity = momentum / total_mass;
    for p in particles.iter_mut() {
        p.velocity -= com_velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::temperature;
    use minerva_world::Particle;
    use rand::SeedableRng;

    fn uniform_set(n: usize) -> ParticleSet {
        let mut ps = ParticleSet::new();
        for i in 0..n {
            ps.push(Particle::new(
                Vec3::new(i as f64, 0.0, 0.0),
                Vec3::zero(),
                1.0,
            ));
        }
        ps
    }

    #[test]
    fn test_temperature_near_target() {
        let mut ps = uniform_set(1000);
        let mut rng = StdRng::seed_from_u64(7);
        maxwell_boltzmann_velocities(&mut ps, 2.0, &mut rng);

        let t = temperature(&ps);
        assert!(
            (t - 2.0).abs() / 2.0 < 0.15,
            "temperature {} too far from 2.0",
            t
        );
    }

    #[test]
    fn test_zero_total_momentum() {
        let mut ps = uniform_set(100);
        let mut rng = StdRng::seed_from_u64(3);
        maxwell_boltzmann_velocities(&mut ps, 1.5, &mut rng);

        let momentum: Vec3 = ps
            .iter()
            .fold(Vec3::zero(), |acc, p| acc + p.mass * p.velocity);
        assert!(momentum.norm() < 1e-10);
    }

    #[test]
    fn test_zero_temperature_gives_rest() {
        let mut ps = uniform_set(10);
        let mut rng = StdRng::seed_from_u64(1);
        maxwell_boltzmann_velocities(&mut ps, 0.0, &mut rng);
        assert!(ps.iter().all(|p| p.velocity == Vec3::zero()));
    }
}
