//! Cell-list based neighbor list with a Verlet skin.

use minerva_math::Vec3;

/// Ordered pair of particle indices with `i < j`.
pub type NeighborPair = (usize, usize);

/// Configuration for neighbor list construction.
#[derive(Clone, Copy, Debug)]
pub struct NeighborListConfig {
    /// Interaction cutoff distance.
    pub cutoff: f64,
    /// Extra distance kept in the list to amortize rebuilds.
    pub skin: f64,
    /// Cell size = (cutoff + skin) * factor.
    pub cell_size_factor: f64,
    /// Lower corner of the cell-partitioned domain.
    pub domain_min: Vec3,
    /// Upper corner of the cell-partitioned domain.
    pub domain_max: Vec3,
    /// Track build/check statistics.
    pub enable_stats: bool,
}

impl Default for NeighborListConfig {
    fn default() -> Self {
        Self {
            cutoff: 2.5,
            skin: 0.3,
            cell_size_factor: 1.0,
            domain_min: Vec3::splat(-10.0),
            domain_max: Vec3::splat(10.0),
            enable_stats: false,
        }
    }
}

/// Rebuild statistics.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeighborListStats {
    pub total_builds: usize,
    pub total_checks: usize,
    pub max_displacement: f64,
    pub num_pairs: usize,
}

impl NeighborListStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Cell-list broad phase plus Verlet-skin pair list.
///
/// After [`build`](Self::build), every pair closer than `cutoff + skin` at
/// the build positions appears in the list exactly once. The list remains
/// usable until some particle has moved more than `skin / 2` from its
/// reference position; [`needs_rebuild`](Self::needs_rebuild) checks that.
pub struct NeighborList {
    cfg: NeighborListConfig,
    stats: NeighborListStats,
    pairs: Vec<NeighborPair>,
    /// Positions at the last rebuild, for displacement tracking.
    ref_positions: Vec<Vec3>,
    cell_size: Vec3,
    nx: usize,
    ny: usize,
    nz: usize,
    /// Particle indices per cell. Storage is retained across builds.
    cells: Vec<Vec<usize>>,
    valid: bool,
}

impl NeighborList {
    pub fn new(cfg: NeighborListConfig) -> Self {
        let mut list = Self {
            cfg,
            stats: NeighborListStats::default(),
            pairs: Vec::new(),
            ref_positions: Vec::new(),
            cell_size: Vec3::zero(),
            nx: 1,
            ny: 1,
            nz: 1,
            cells: Vec::new(),
            valid: false,
        };
        list.setup_grid();
        list
    }

    /// The neighbor pairs from the last build.
    pub fn pairs(&self) -> &[NeighborPair] {
        &self.pairs
    }

    pub fn stats(&self) -> &NeighborListStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    pub fn config(&self) -> &NeighborListConfig {
        &self.cfg
    }

    /// Grid dimensions `(nx, ny, nz)`.
    pub fn grid_dims(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    /// True once a build has happened and nothing invalidated it.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Force a rebuild on the next check.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Re-partition the grid over new domain bounds and invalidate the
    /// list. Used when particles have drifted outside the old domain.
    pub fn set_domain(&mut self, domain_min: Vec3, domain_max: Vec3) {
        self.cfg.domain_min = domain_min;
        self.cfg.domain_max = domain_max;
        self.setup_grid();
        self.valid = false;
    }

    fn setup_grid(&mut self) {
        // Cells must span at least cutoff + skin so the 27-cell
        // neighborhood covers every listed pair.
        let min_cell_size = (self.cfg.cutoff + self.cfg.skin) * self.cfg.cell_size_factor;
        let domain_size = self.cfg.domain_max - self.cfg.domain_min;

        self.nx = ((domain_size.x / min_cell_size) as usize).max(1);
        self.ny = ((domain_size.y / min_cell_size) as usize).max(1);
        self.nz = ((domain_size.z / min_cell_size) as usize).max(1);

        self.cell_size = Vec3::new(
            domain_size.x / self.nx as f64,
            domain_size.y / self.ny as f64,
            domain_size.z / self.nz as f64,
        );

        let total_cells = self.nx * self.ny * self.nz;
        self.cells.resize(total_cells, Vec::new());

        log::debug!(
            "neighbor list: grid {}x{}x{} ({} cells), cell_size=({:.3},{:.3},{:.3})",
            self.nx,
            self.ny,
            self.nz,
            total_cells,
            self.cell_size.x,
            self.cell_size.y,
            self.cell_size.z
        );
    }

    /// Cell coordinates for a position, clamped to the grid so transient
    /// out-of-domain positions never index out of bounds.
    fn cell_coords(&self, pos: Vec3) -> (usize, usize, usize) {
        let rel = pos - self.cfg.domain_min;
        let ix = ((rel.x / self.cell_size.x) as isize).clamp(0, self.nx as isize - 1);
        let iy = ((rel.y / self.cell_size.y) as isize).clamp(0, self.ny as isize - 1);
        let iz = ((rel.z / self.cell_size.z) as isize).clamp(0, self.nz as isize - 1);
        (ix as usize, iy as usize, iz as usize)
    }

    fn cell_index(&self, pos: Vec3) -> usize {
        let (ix, iy, iz) = self.cell_coords(pos);
        ix + self.nx * (iy + self.ny * iz)
    }

    /// Rebuild the pair list from scratch.
    pub fn build(&mut self, positions: &[Vec3]) {
        self.pairs.clear();
        for cell in &mut self.cells {
            cell.clear();
        }

        for (i, &pos) in positions.iter().enumerate() {
            let idx = self.cell_index(pos);
            self.cells[idx].push(i);
        }

        self.build_pairs(positions);

        self.ref_positions.clear();
        self.ref_positions.extend_from_slice(positions);
        self.valid = true;

        if self.cfg.enable_stats {
            self.stats.total_builds += 1;
            self.stats.num_pairs = self.pairs.len();
        }

        log::debug!(
            "neighbor list: rebuilt with {} pairs for {} particles",
            self.pairs.len(),
            positions.len()
        );
    }

    fn build_pairs(&mut self, positions: &[Vec3]) {
        let r_list = self.cfg.cutoff + self.cfg.skin;
        let r_list_sq = r_list * r_list;
        let (nx, ny, nz) = (self.nx, self.ny, self.nz);

        for iz in 0..nz {
            for iy in 0..ny {
                for ix in 0..nx {
                    let cell_idx = ix + nx * (iy + ny * iz);

                    // Pairs within the cell itself.
                    let residents = &self.cells[cell_idx];
                    for a in 0..residents.len() {
                        let i = residents[a];
                        for &j in &residents[a + 1..] {
                            let rij = positions[j] - positions[i];
                            if rij.norm2() < r_list_sq {
                                self.pairs.push((i, j));
                            }
                        }
                    }

                    // Half-shell of neighbor cells: dz in {0, 1}, and for
                    // dz == 0 only lexicographically positive (dy, dx).
                    // Every cross-cell pair is visited exactly once.
                    for dz in 0..=1isize {
                        for dy in -1..=1isize {
                            for dx in -1..=1isize {
                                if dz == 0 && dy == 0 && dx == 0 {
                                    continue;
                                }
                                if dz == 0 && (dy < 0 || (dy == 0 && dx < 0)) {
                                    continue;
                                }

                                let jx = ix as isize + dx;
                                let jy = iy as isize + dy;
                                let jz = iz as isize + dz;
                                if jx < 0
                                    || jx >= nx as isize
                                    || jy < 0
                                    || jy >= ny as isize
                                    || jz < 0
                                    || jz >= nz as isize
                                {
                                    continue;
                                }

                                let neighbor_idx =
                                    jx as usize + nx * (jy as usize + ny * jz as usize);
                                let neighbors = &self.cells[neighbor_idx];

                                for &i in &self.cells[cell_idx] {
                                    for &j in neighbors {
                                        let rij = positions[j] - positions[i];
                                        if rij.norm2() < r_list_sq {
                                            self.pairs
                                                .push((i.min(j), i.max(j)));
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// Half-skin rebuild predicate: the list is stale once any particle
    /// has moved more than `skin / 2` from its reference position, the
    /// particle count changed, or no build has happened yet.
    pub fn needs_rebuild(&mut self, positions: &[Vec3]) -> bool {
        if !self.valid {
            return true;
        }
        if self.ref_positions.len() != positions.len() {
            return true;
        }

        let mut max_disp_sq: f64 = 0.0;
        for (pos, reference) in positions.iter().zip(&self.ref_positions) {
            let disp_sq = (*pos - *reference).norm2();
            max_disp_sq = max_disp_sq.max(disp_sq);
        }

        if self.cfg.enable_stats {
            self.stats.total_checks += 1;
            self.stats.max_displacement = max_disp_sq.sqrt();
        }

        let rebuild_threshold = (self.cfg.skin * 0.5) * (self.cfg.skin * 0.5);
        max_disp_sq > rebuild_threshold
    }
}
