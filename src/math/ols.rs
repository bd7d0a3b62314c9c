//! Least squares solver.
//!
//! Each recomputation solves three small regression problems of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - SVD rather than normal equations: the collider specification puts `age`
//!   (nearly 18 × sodium) next to `sodium`, so the design matrix is close to
//!   collinear and squaring it would lose precision needlessly.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   tall matrices.)
//! - The parameter dimension is tiny (2–4 columns), so SVD cost is irrelevant
//!   at the cohort sizes used here.
//! - Rank is checked explicitly: a deficient design is reported to the caller
//!   instead of silently returning the minimum-norm solution.

use nalgebra::{DMatrix, DVector};

/// Singular values below this count as zero. The design columns here are all
/// O(1)–O(100), so an absolute threshold is safe.
const RANK_TOL: f64 = 1e-10;

/// Solve an ordinary least squares problem using SVD.
///
/// Returns `None` if the design matrix is rank-deficient or the solution is
/// not finite.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let p = x.ncols();
    let svd = x.clone().svd(true, true);

    if svd.rank(RANK_TOL) < p {
        return None;
    }

    let beta = svd.solve(y, RANK_TOL).ok()?;
    beta.iter().all(|v| v.is_finite()).then_some(beta)
}
