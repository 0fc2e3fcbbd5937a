//! Lennard-Jones pair potential.

/// Truncated Lennard-Jones 12-6 potential:
/// `U(r) = 4eps [(sigma/r)^12 - (sigma/r)^6]` for `r < r_cut`, else 0.
#[derive(Clone, Copy, Debug)]
pub struct LennardJones {
    /// Well depth.
    pub epsilon: f64,
    /// Zero-crossing distance.
    pub sigma: f64,
    /// Cutoff radius (typically 2.5 sigma).
    pub r_cut: f64,
}

impl LennardJones {
    pub fn new(epsilon: f64, sigma: f64, r_cut: f64) -> Self {
        Self {
            epsilon,
            sigma,
            r_cut,
        }
    }

    pub fn cutoff(&self) -> f64 {
        self.r_cut
    }

    /// Pair force coefficient `m` for the displacement `r_ij = r_j - r_i`
    /// with squared length `r2`, such that the force on `j` is `m * r_ij`
    /// (and `-m * r_ij` on `i`).
    ///
    /// `m = 24 eps / r^2 * (2 (sigma/r)^12 - (sigma/r)^6)`; the extra `1/r`
    /// that would normalize `r_ij` is folded into the `1/r^2` factor.
    /// Returns 0 beyond the cutoff and for coincident particles.
    pub fn pair_coefficient(&self, r2: f64) -> f64 {
        let rc2 = self.r_cut * self.r_cut;
        if r2 > rc2 || r2 == 0.0 {
            return 0.0;
        }

        let inv_r2 = 1.0 / r2;
        let inv_r6 = inv_r2 * inv_r2 * inv_r2;
        let sig2 = self.sigma * self.sigma;
        let sig6 = sig2 * sig2 * sig2;
        let sig12 = sig6 * sig6;

        24.0 * self.epsilon * inv_r2 * (2.0 * sig12 * inv_r6 * inv_r6 - sig6 * inv_r6)
    }

    /// Pair potential energy at squared separation `r2`, truncated at the
    /// cutoff (no shift).
    pub fn energy(&self, r2: f64) -> f64 {
        let rc2 = self.r_cut * self.r_cut;
        if r2 > rc2 || r2 == 0.0 {
            return 0.0;
        }

        let inv_r2 = 1.0 / r2;
        let inv_r6 = inv_r2 * inv_r2 * inv_r2;
        let sig2 = self.sigma * self.sigma;
        let sig6 = sig2 * sig2 * sig2;
        let sig12 = sig6 * sig6;

        4.0 * self.epsilon * (sig12 * inv_r6 * inv_r6 - sig6 * inv_r6)
    }
}
