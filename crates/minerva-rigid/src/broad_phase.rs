//! Spatial hash broad phase for sphere contacts.

use minerva_world::RigidBody;
use std::collections::HashMap;
use std::hash::{BuildHasherDefault, Hasher};

/// Integer cell coordinates of a body center.
pub type CellKey = (i64, i64, i64);

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a hasher for the small integer cell keys.
///
/// Unkeyed, so bucket layout and iteration are reproducible between runs
/// given the same insertions.
pub struct FnvHasher(u64);

impl Default for FnvHasher {
    fn default() -> Self {
        Self(FNV_OFFSET_BASIS)
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        let mut hash = self.0;
        for &byte in bytes {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        self.0 = hash;
    }
}

pub type FnvBuildHasher = BuildHasherDefault<FnvHasher>;

/// Uniform-grid hash over body centers.
///
/// Rebuilt at the start of every pair-solver iteration; bucket storage is
/// retained across rebuilds to keep the hot path allocation-free.
#[derive(Default)]
pub struct SpatialHashGrid {
    buckets: HashMap<CellKey, Vec<usize>, FnvBuildHasher>,
    /// Cell key per body from the last rebuild.
    keys: Vec<CellKey>,
    cell_size: f64,
}

impl SpatialHashGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    fn key_for(cell_size: f64, x: f64, y: f64, z: f64) -> CellKey {
        (
            (x / cell_size).floor() as i64,
            (y / cell_size).floor() as i64,
            (z / cell_size).floor() as i64,
        )
    }

    /// Re-bucket every body center. Emptied buckets keep their capacity.
    pub fn rebuild(&mut self, bodies: &[RigidBody], cell_size: f64) {
        debug_assert!(cell_size > 0.0);
        self.cell_size = cell_size;

        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
        self.keys.clear();

        for (i, rb) in bodies.iter().enumerate() {
            let key = Self::key_for(cell_size, rb.position.x, rb.position.y, rb.position.z);
            self.keys.push(key);
            self.buckets.entry(key).or_default().push(i);
        }
    }

    /// Visit every candidate pair `(i, j)` with `j > i` whose cells are
    /// within one step of each other on every axis. Each pair is visited
    /// exactly once: `j` lives in exactly one bucket of `i`'s 27-cell
    /// neighborhood, and the `j > i` filter kills the mirrored visit.
    pub fn for_each_candidate_pair<F: FnMut(usize, usize)>(&self, mut visit: F) {
        for (i, key) in self.keys.iter().enumerate() {
            for dz in -1..=1_i64 {
                for dy in -1..=1_i64 {
                    for dx in -1..=1_i64 {
                        let neighbor = (key.0 + dx, key.1 + dy, key.2 + dz);
                        if let Some(bucket) = self.buckets.get(&neighbor) {
                            for &j in bucket {
                                if j > i {
                                    visit(i, j);
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minerva_math::Vec3;

    fn sphere_at(x: f64, y: f64, z: f64, radius: f64) -> RigidBody {
        RigidBody {
            position: Vec3::new(x, y, z),
            radius,
            ..Default::default()
        }
    }

    fn candidate_pairs(grid: &SpatialHashGrid) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        grid.for_each_candidate_pair(|i, j| pairs.push((i, j)));
        pairs.sort_unstable();
        pairs
    }

    #[test]
    fn test_fnv1a_known_values() {
        // FNV-1a test vectors: "" hashes to the offset basis, "a" to
        // 0xaf63dc4c8601ec8c.
        let mut h = FnvHasher::default();
        assert_eq!(h.finish(), 0xcbf2_9ce4_8422_2325);
        h.write(b"a");
        assert_eq!(h.finish(), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_touching_spheres_are_candidates() {
        let bodies = vec![
            sphere_at(0.0, 0.0, 0.0, 0.5),
            sphere_at(0.9, 0.0, 0.0, 0.5),
            sphere_at(10.0, 0.0, 0.0, 0.5),
        ];

        let mut grid = SpatialHashGrid::new();
        grid.rebuild(&bodies, 1.0);

        let pairs = candidate_pairs(&grid);
        assert!(pairs.contains(&(0, 1)));
        assert!(!pairs.contains(&(0, 2)));
        assert!(!pairs.contains(&(1, 2)));
    }

    #[test]
    fn test_pairs_visited_exactly_once() {
        let mut bodies = Vec::new();
        for i in 0..4 {
            for j in 0..4 {
                bodies.push(sphere_at(i as f64 * 0.4, j as f64 * 0.4, 0.0, 0.3));
            }
        }

        let mut grid = SpatialHashGrid::new();
        grid.rebuild(&bodies, 0.6);

        let pairs = candidate_pairs(&grid);
        let mut deduped = pairs.clone();
        deduped.dedup();
        assert_eq!(pairs, deduped, "candidate pair visited twice");
        assert!(pairs.iter().all(|&(i, j)| i < j));
    }

    #[test]
    fn test_candidates_cover_all_contacts() {
        // Any pair closer than one cell size must show up.
        let bodies: Vec<RigidBody> = (0..20)
            .map(|i| {
                let t = i as f64 * 0.37;
                sphere_at(t.sin() * 2.0, t.cos() * 2.0, t * 0.1, 0.4)
            })
            .collect();

        let cell = 0.8;
        let mut grid = SpatialHashGrid::new();
        grid.rebuild(&bodies, cell);
        let pairs = candidate_pairs(&grid);

        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let d = bodies[j].position - bodies[i].position;
                if d.norm2() < cell * cell {
                    assert!(pairs.contains(&(i, j)), "missing pair ({}, {})", i, j);
                }
            }
        }
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let bodies: Vec<RigidBody> = (0..30)
            .map(|i| sphere_at((i % 5) as f64, (i % 3) as f64, (i % 7) as f64, 0.5))
            .collect();

        let mut grid = SpatialHashGrid::new();
        grid.rebuild(&bodies, 1.0);
        let mut first = Vec::new();
        grid.for_each_candidate_pair(|i, j| first.push((i, j)));

        grid.rebuild(&bodies, 1.0);
        let mut second = Vec::new();
        grid.for_each_candidate_pair(|i, j| second.push((i, j)));

        assert_eq!(first, second);
    }
}
