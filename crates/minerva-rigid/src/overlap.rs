//! Pre-simulation overlap checking and resolution.
//!
//! Scenario setup code often places spheres approximately; feeding
//! overlapping bodies to the runtime solver produces a violent first step.
//! These helpers detect that and push bodies apart before time starts.
//! They are unrelated to the runtime pair solver.

use minerva_world::RigidBody;

/// Count sphere pairs overlapping by more than `tolerance`.
pub fn count_overlaps(bodies: &[RigidBody], tolerance: f64) -> usize {
    let mut overlap_count = 0;
    let mut max_overlap = 0.0_f64;

    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let a = &bodies[i];
            let b = &bodies[j];

            let d = b.position - a.position;
            let dist = d.norm();
            let overlap = a.radius + b.radius - dist;

            if overlap > tolerance {
                overlap_count += 1;
                max_overlap = max_overlap.max(overlap);
            }
        }
    }

    if overlap_count > 0 {
        log::warn!(
            "found {} overlapping sphere pairs (max overlap {:.6})",
            overlap_count,
            max_overlap
        );
    }

    overlap_count
}

/// Push overlapping spheres apart with iterative position corrections
/// until the worst overlap drops below 1e-6 or `max_iterations` is hit.
/// The split is even between two dynamic bodies; a kinematic or massless
/// body takes none of the correction.
pub fn resolve_initial_overlaps(bodies: &mut [RigidBody], max_iterations: usize) {
    log::info!("resolving initial overlaps");

    for iter in 0..max_iterations {
        let mut max_overlap = 0.0_f64;
        let mut corrections = 0;

        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let a = bodies[i];
                let b = bodies[j];

                let d = b.position - a.position;
                let dist = d.norm2().max(1e-16).sqrt();
                // Small buffer so resolved pairs end up separated.
                let min_dist = a.radius + b.radius + 1e-3;
                let overlap = min_dist - dist;

                if overlap > 1e-6 {
                    corrections += 1;
                    max_overlap = max_overlap.max(overlap);

                    let n = d / dist;
                    match (a.is_dynamic(), b.is_dynamic()) {
                        (true, true) => {
                            let correction = n * (overlap * 0.5);
                            bodies[i].position -= correction;
                            bodies[j].position += correction;
                        }
                        (true, false) => bodies[i].position -= n * overlap,
                        (false, true) => bodies[j].position += n * overlap,
                        (false, false) => {}
                    }
                }
            }
        }

        if max_overlap < 1e-6 {
            log::info!("resolved in {} iterations", iter + 1);
            return;
        }

        if (iter + 1) % 20 == 0 {
            log::debug!(
                "iteration {}: {} corrections, max overlap {:.6}",
                iter + 1,
                corrections,
                max_overlap
            );
        }
    }

    log::warn!("did not fully converge after {} iterations", max_iterations);
}
