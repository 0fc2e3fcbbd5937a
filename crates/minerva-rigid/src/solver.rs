//! Substepped rigid sphere solver: integration, ground plane, and
//! iterative pairwise contact resolution.

use crate::broad_phase::SpatialHashGrid;
use minerva_math::Vec3;
use minerva_world::{RigidBody, System, World};

/// Options for [`RigidBodySystem`].
#[derive(Clone, Copy, Debug)]
pub struct RigidBodySystemConfig {
    /// Restitution for ground and pair collisions.
    pub restitution: f64,
    /// Reserved; the solver does not use it yet.
    pub friction: f64,
    /// Height of the ground plane.
    pub ground_y: f64,
    /// Internal substeps per `step` call.
    pub substeps: usize,
    /// Pair-resolution iterations per substep.
    pub pair_iterations: usize,
    /// Acceptable penetration before the iteration loop exits early.
    pub penetration_slop: f64,
    /// Target extra separation so a just-resolved contact does not
    /// immediately re-register as penetrating.
    pub contact_offset: f64,
    /// Fraction of penetration corrected per iteration.
    pub baumgarte: f64,
    /// Apply the 0.999 velocity damp after each collision impulse.
    pub impulse_damping: bool,
}

impl Default for RigidBodySystemConfig {
    fn default() -> Self {
        Self {
            restitution: 0.5,
            friction: 0.3,
            ground_y: 0.0,
            substeps: 4,
            pair_iterations: 32,
            penetration_slop: 1e-5,
            contact_offset: 1e-3,
            baumgarte: 0.8,
            impulse_damping: true,
        }
    }
}

/// Rigid-body subsystem: advances `world.rigid_bodies` under gravity with
/// ground contact and grid-accelerated sphere-sphere resolution.
pub struct RigidBodySystem {
    cfg: RigidBodySystemConfig,
    /// Broad-phase hash, rebuilt every solver iteration. Kept here so
    /// bucket storage survives between iterations.
    grid: SpatialHashGrid,
}

impl RigidBodySystem {
    pub fn new(cfg: RigidBodySystemConfig) -> Self {
        Self {
            cfg,
            grid: SpatialHashGrid::new(),
        }
    }

    pub fn config(&self) -> &RigidBodySystemConfig {
        &self.cfg
    }

    /// Snap a body above the ground plane, reflecting and damping its
    /// velocity if it was moving into the floor.
    fn resolve_ground(cfg: &RigidBodySystemConfig, rb: &mut RigidBody) {
        let y_target = cfg.ground_y + rb.radius + cfg.contact_offset;
        if rb.position.y < y_target {
            rb.position.y = y_target;

            if rb.velocity.y < 0.0 {
                rb.velocity.y = -cfg.restitution * rb.velocity.y;
                // Crude tangential damping to mimic frictional losses.
                rb.velocity.x *= 0.98;
                rb.velocity.z *= 0.98;
            }
        }
    }

    /// One pass over all candidate pairs. Returns the maximum penetration
    /// seen this iteration.
    fn resolve_pairs(&self, bodies: &mut [RigidBody]) -> f64 {
        let cfg = self.cfg;
        let mut max_pen = 0.0_f64;

        self.grid.for_each_candidate_pair(|i, j| {
            let a = bodies[i];
            let b = bodies[j];

            let d = b.position - a.position;
            let dist_sq = d.norm2();
            let target = a.radius + b.radius + cfg.contact_offset;
            if dist_sq >= target * target {
                return;
            }

            let dist = dist_sq.max(1e-16).sqrt();
            let normal = if dist > 1e-12 { d / dist } else { Vec3::unit_x() };
            let penetration = (target - dist).max(0.0);
            max_pen = max_pen.max(penetration);

            // Grounded bodies act as static under contacts with a
            // vertical normal component, so stacks cannot chew a body
            // through the floor while corrections compete.
            let grounded = |rb: &RigidBody| {
                rb.position.y - rb.radius <= cfg.ground_y + cfg.contact_offset + 1e-6
            };
            let a_static = !a.is_dynamic() || (normal.y > 0.2 && grounded(&a));
            let b_static = !b.is_dynamic() || (normal.y < -0.2 && grounded(&b));

            let w_a = if a_static { 0.0 } else { 1.0 / a.mass };
            let w_b = if b_static { 0.0 } else { 1.0 / b.mass };
            let w_sum = w_a + w_b;
            if w_sum <= 0.0 {
                return;
            }

            // Positional correction, Baumgarte-weighted.
            let correction = normal * (cfg.baumgarte * penetration / w_sum);
            bodies[i].position -= correction * w_a;
            bodies[j].position += correction * w_b;

            // Restitution impulse on closing contacts.
            let v_rel = b.velocity - a.velocity;
            let v_n = v_rel.dot(normal);
            if v_n < 0.0 {
                let impulse = -(1.0 + cfg.restitution) * v_n / w_sum;
                bodies[i].velocity -= impulse * w_a * normal;
                bodies[j].velocity += impulse * w_b * normal;

                if cfg.impulse_damping {
                    bodies[i].velocity *= 0.999;
                    bodies[j].velocity *= 0.999;
                }
            }
        });

        max_pen
    }

    fn substep(&mut self, world: &mut World, h: f64) {
        let gravity = world.gravity;
        let bodies = &mut world.rigid_bodies;

        // Phase 1: semi-implicit Euler plus ground contact.
        for rb in bodies.iter_mut() {
            if !rb.is_dynamic() {
                continue;
            }
            rb.velocity += gravity * h;
            rb.position += rb.velocity * h;
            Self::resolve_ground(&self.cfg, rb);
        }

        // Phases 2-3: pair resolution, rebuilding the hash every
        // iteration since positions move.
        let max_radius = bodies.iter().map(|rb| rb.radius).fold(0.0, f64::max);
        if max_radius > 0.0 {
            let cell_size = (2.0 * max_radius).max(1e-6);
            for _ in 0..self.cfg.pair_iterations {
                self.grid.rebuild(bodies, cell_size);
                let max_pen = self.resolve_pairs(bodies);
                if max_pen < self.cfg.penetration_slop {
                    break;
                }
            }
        }

        // Phase 4: safety net against corrections that pushed a body
        // back through the floor.
        for rb in bodies.iter_mut() {
            if !rb.is_dynamic() {
                continue;
            }
            Self::resolve_ground(&self.cfg, rb);
        }
    }
}

impl System for RigidBodySystem {
    fn name(&self) -> &str {
        "rigid_body"
    }

    fn step(&mut self, world: &mut World, dt: f64) {
        let substeps = self.cfg.substeps.max(1);
        let h = dt / substeps as f64;
        for _ in 0..substeps {
            self.substep(world, h);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rigid_world(cfg: RigidBodySystemConfig) -> World {
        let mut world = World::new();
        world.add_system(Box::new(RigidBodySystem::new(cfg)));
        world
    }

    fn sphere(position: Vec3, velocity: Vec3, radius: f64) -> RigidBody {
        RigidBody {
            position,
            velocity,
            radius,
            ..Default::default()
        }
    }

    #[test]
    fn test_bodies_stay_above_ground() {
        let cfg = RigidBodySystemConfig::default();
        let mut world = rigid_world(cfg);
        world
            .rigid_bodies
            .push(sphere(Vec3::new(0.0, 2.0, 0.0), Vec3::zero(), 0.25));

        for _ in 0..600 {
            world.step(1.0 / 120.0);
        }

        let rb = &world.rigid_bodies[0];
        assert!(
            rb.position.y >= cfg.ground_y + rb.radius,
            "body sank to y = {}",
            rb.position.y
        );
    }

    #[test]
    fn test_free_fall_matches_closed_form_before_impact() {
        let mut world = rigid_world(RigidBodySystemConfig::default());
        world
            .rigid_bodies
            .push(sphere(Vec3::new(0.0, 10.0, 0.0), Vec3::zero(), 0.25));

        let dt = 1.0 / 120.0;
        for _ in 0..60 {
            world.step(dt);
        }

        // Semi-implicit Euler over n steps of size h from rest:
        // y = y0 - g h^2 n(n+1)/2.
        let h = dt / 4.0;
        let n = 240.0;
        let expected = 10.0 - 9.81 * h * h * n * (n + 1.0) / 2.0;
        assert_relative_eq!(world.rigid_bodies[0].position.y, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_head_on_elastic_collision_swaps_velocities() {
        let cfg = RigidBodySystemConfig {
            restitution: 1.0,
            ground_y: -100.0,
            impulse_damping: false,
            ..Default::default()
        };
        let mut world = rigid_world(cfg);
        world.gravity = Vec3::zero();
        world
            .rigid_bodies
            .push(sphere(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0), 0.5));
        world
            .rigid_bodies
            .push(sphere(Vec3::new(1.0, 0.0, 0.0), Vec3::new(-2.0, 0.0, 0.0), 0.5));

        let ke0: f64 = world.rigid_bodies.iter().map(|rb| rb.kinetic_energy()).sum();
        for _ in 0..120 {
            world.step(1.0 / 120.0);
        }

        let v0 = world.rigid_bodies[0].velocity;
        let v1 = world.rigid_bodies[1].velocity;
        assert!(v0.x < 0.0 && v1.x > 0.0, "bodies did not separate");
        assert_relative_eq!(v0.x, -2.0, epsilon = 0.05);
        assert_relative_eq!(v1.x, 2.0, epsilon = 0.05);

        let ke1: f64 = world.rigid_bodies.iter().map(|rb| rb.kinetic_energy()).sum();
        assert!((ke1 - ke0).abs() / ke0 < 0.02, "kinetic energy not conserved");
    }

    #[test]
    fn test_momentum_conserved_in_pair_collision() {
        let cfg = RigidBodySystemConfig {
            restitution: 0.8,
            ground_y: -100.0,
            impulse_damping: false,
            ..Default::default()
        };
        let mut world = rigid_world(cfg);
        world.gravity = Vec3::zero();
        world
            .rigid_bodies
            .push(sphere(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0), 0.5));
        world
            .rigid_bodies
            .push(sphere(Vec3::new(1.0, 0.1, 0.0), Vec3::zero(), 0.5));

        let px0: f64 = world
            .rigid_bodies
            .iter()
            .map(|rb| rb.mass * rb.velocity.x)
            .sum();
        for _ in 0..120 {
            world.step(1.0 / 120.0);
        }
        let px1: f64 = world
            .rigid_bodies
            .iter()
            .map(|rb| rb.mass * rb.velocity.x)
            .sum();

        assert_relative_eq!(px0, px1, epsilon = 1e-9);
    }

    #[test]
    fn test_stack_settles_without_tunneling() {
        let cfg = RigidBodySystemConfig::default();
        let mut world = rigid_world(cfg);
        let r = 0.5;
        world
            .rigid_bodies
            .push(sphere(Vec3::new(0.0, r, 0.0), Vec3::zero(), r));
        world
            .rigid_bodies
            .push(sphere(Vec3::new(0.0, 3.0 * r + 0.05, 0.0), Vec3::zero(), r));

        for _ in 0..600 {
            world.step(1.0 / 120.0);
        }

        let bottom = &world.rigid_bodies[0];
        let top = &world.rigid_bodies[1];
        assert!(bottom.position.y >= cfg.ground_y + r - 1e-6);
        // Non-penetration within slop.
        let gap = (top.position - bottom.position).norm();
        assert!(
            gap >= 2.0 * r - 1e-3,
            "stack interpenetrates: gap = {}",
            gap
        );
        assert!(bottom.velocity.norm() < 0.5);
        assert!(top.velocity.norm() < 0.5);
    }

    #[test]
    fn test_kinematic_body_is_immovable() {
        let mut world = rigid_world(RigidBodySystemConfig::default());
        let anchor = RigidBody {
            position: Vec3::new(0.0, 2.0, 0.0),
            kinematic: true,
            ..Default::default()
        };
        world.rigid_bodies.push(anchor);
        world
            .rigid_bodies
            .push(sphere(Vec3::new(0.05, 4.0, 0.0), Vec3::zero(), 0.5));

        for _ in 0..240 {
            world.step(1.0 / 120.0);
        }

        let fixed = &world.rigid_bodies[0];
        assert_eq!(fixed.position, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(fixed.velocity, Vec3::zero());
    }

    #[test]
    fn test_empty_world_step_is_noop() {
        let mut world = rigid_world(RigidBodySystemConfig::default());
        world.step(1.0 / 60.0);
        assert!(world.rigid_bodies.is_empty());
    }
}
