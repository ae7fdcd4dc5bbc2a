//! Discretized PDF block on an (x, Q²) grid.
//!
//! A [`Grid`] stores one LHAPDF subgrid: the x nodes, the Q² nodes, the
//! participating flavors and a dense value table. Rows run over the grid
//! points in x-major, Q²-minor order; columns follow `pids`.

use std::collections::HashSet;

use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::{Error, Result};

/// A grid-set member: ordered list of subgrid blocks.
pub type Member = Vec<Grid>;

/// One block of PDF values over an (x, Q²) grid.
///
/// Grids are values: every transformation returns a new `Grid` and the
/// original is never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    xgrid: Vec<f64>,
    q2grid: Vec<f64>,
    pids: Vec<i32>,
    data: DMatrix<f64>,
}

impl Grid {
    /// Create a block from its parts.
    ///
    /// `data` must have `xgrid.len() * q2grid.len()` rows (or zero rows for an
    /// empty block) and one column per pid.
    pub fn new(
        xgrid: Vec<f64>,
        q2grid: Vec<f64>,
        pids: Vec<i32>,
        data: DMatrix<f64>,
    ) -> Result<Self> {
        validate_axes(&xgrid, &q2grid, &pids)?;
        let n_points = xgrid.len() * q2grid.len();
        if data.ncols() != pids.len() {
            return Err(Error::Validation(format!(
                "data has {} columns but {} pids were declared",
                data.ncols(),
                pids.len()
            )));
        }
        if data.nrows() != n_points && data.nrows() != 0 {
            return Err(Error::Validation(format!(
                "data has {} rows, expected {} ({} x-points times {} Q2-points)",
                data.nrows(),
                n_points,
                xgrid.len(),
                q2grid.len()
            )));
        }
        Ok(Self { xgrid, q2grid, pids, data })
    }

    /// A block that declares its axes and flavors but carries no data rows.
    pub fn empty(xgrid: Vec<f64>, q2grid: Vec<f64>, pids: Vec<i32>) -> Result<Self> {
        let n_pids = pids.len();
        Self::new(xgrid, q2grid, pids, DMatrix::zeros(0, n_pids))
    }

    /// Build a block by evaluating `f(pid, x, Q2)` at every grid point.
    ///
    /// Points are evaluated in parallel; the table is assembled in the fixed
    /// x-major row order regardless of scheduling.
    pub fn from_fn<F>(f: F, pids: Vec<i32>, xgrid: Vec<f64>, q2grid: Vec<f64>) -> Result<Self>
    where
        F: Fn(i32, f64, f64) -> f64 + Sync,
    {
        validate_axes(&xgrid, &q2grid, &pids)?;
        let nq2 = q2grid.len();
        let n_points = xgrid.len() * nq2;

        let rows: Vec<Vec<f64>> = (0..n_points)
            .into_par_iter()
            .map(|row| {
                let x = xgrid[row / nq2];
                let q2 = q2grid[row % nq2];
                pids.iter().map(|&pid| f(pid, x, q2)).collect()
            })
            .collect();

        let data = DMatrix::from_fn(n_points, pids.len(), |r, c| rows[r][c]);
        Ok(Self { xgrid, q2grid, pids, data })
    }

    /// x nodes.
    pub fn xgrid(&self) -> &[f64] {
        &self.xgrid
    }

    /// Q² nodes.
    pub fn q2grid(&self) -> &[f64] {
        &self.q2grid
    }

    /// Flavor identifiers, in column order.
    pub fn pids(&self) -> &[i32] {
        &self.pids
    }

    /// Value table, `n_points × n_pids` (or `0 × n_pids` for an empty block).
    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// Number of (x, Q²) points spanned by the axes.
    pub fn n_points(&self) -> usize {
        self.xgrid.len() * self.q2grid.len()
    }

    /// True when the block carries no data rows.
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Column index of `pid`, if present.
    pub fn pid_index(&self, pid: i32) -> Option<usize> {
        self.pids.iter().position(|&p| p == pid)
    }

    /// Values of `pid` over all grid points.
    pub fn column(&self, pid: i32) -> Option<Vec<f64>> {
        let idx = self.pid_index(pid)?;
        Some(self.data.column(idx).iter().copied().collect())
    }

    /// Value of `pid` at node `(ix, iq)`.
    pub fn value(&self, ix: usize, iq: usize, pid: i32) -> Option<f64> {
        if self.is_empty() || ix >= self.xgrid.len() || iq >= self.q2grid.len() {
            return None;
        }
        let col = self.pid_index(pid)?;
        Some(self.data[(ix * self.q2grid.len() + iq, col)])
    }

    /// Copy of this block with column `idx` set to zero.
    pub fn with_zeroed_column(&self, idx: usize) -> Self {
        let mut out = self.clone();
        if idx < out.data.ncols() {
            out.data.column_mut(idx).fill(0.0);
        }
        out
    }

    /// Copy of this block with every column whose pid is not in `keep` zeroed.
    ///
    /// Column order and shape are unchanged.
    pub fn with_only_pids(&self, keep: &[i32]) -> Self {
        let mut out = self.clone();
        for (idx, pid) in self.pids.iter().enumerate() {
            if !keep.contains(pid) {
                out.data.column_mut(idx).fill(0.0);
            }
        }
        out
    }

    /// Copy of this block's axes with new flavors and values.
    pub fn with_data(&self, pids: Vec<i32>, data: DMatrix<f64>) -> Result<Self> {
        Self::new(self.xgrid.clone(), self.q2grid.clone(), pids, data)
    }

    /// Copy of this block with a replaced x axis (same number of nodes).
    pub fn with_xgrid(&self, xgrid: Vec<f64>) -> Result<Self> {
        if xgrid.len() != self.xgrid.len() {
            return Err(Error::Validation(format!(
                "x-grid has {} nodes, block expects {}",
                xgrid.len(),
                self.xgrid.len()
            )));
        }
        Self::new(xgrid, self.q2grid.clone(), self.pids.clone(), self.data.clone())
    }
}

fn validate_axes(xgrid: &[f64], q2grid: &[f64], pids: &[i32]) -> Result<()> {
    if xgrid.is_empty() {
        return Err(Error::Validation("x-grid is empty".into()));
    }
    if q2grid.is_empty() {
        return Err(Error::Validation("Q2-grid is empty".into()));
    }
    let mut seen = HashSet::with_capacity(pids.len());
    for &pid in pids {
        if !seen.insert(pid) {
            return Err(Error::Validation(format!("duplicate pid {pid}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn small() -> Grid {
        let data = DMatrix::from_row_slice(4, 3, &[0.1, 0.2, 0.3].repeat(4));
        Grid::new(vec![0.1, 1.0], vec![1.0, 2.0], vec![-1, 21, 1], data).unwrap()
    }

    #[test]
    fn new_rejects_duplicate_pids() {
        let data = DMatrix::zeros(1, 2);
        let err = Grid::new(vec![0.5], vec![10.0], vec![21, 21], data).unwrap_err();
        assert!(err.to_string().contains("duplicate pid 21"));
    }

    #[test]
    fn new_rejects_empty_axes() {
        assert!(Grid::new(vec![], vec![1.0], vec![21], DMatrix::zeros(0, 1)).is_err());
        assert!(Grid::new(vec![0.1], vec![], vec![21], DMatrix::zeros(0, 1)).is_err());
    }

    #[test]
    fn new_rejects_column_mismatch() {
        let data = DMatrix::zeros(4, 2);
        assert!(Grid::new(vec![0.1, 1.0], vec![1.0, 2.0], vec![-1, 21, 1], data).is_err());
    }

    #[test]
    fn new_rejects_row_mismatch() {
        let data = DMatrix::zeros(3, 3);
        assert!(Grid::new(vec![0.1, 1.0], vec![1.0, 2.0], vec![-1, 21, 1], data).is_err());
    }

    #[test]
    fn empty_block_is_allowed() {
        let g = Grid::empty(vec![0.1, 1.0], vec![1.0, 2.0], vec![-1, 21, 1]).unwrap();
        assert!(g.is_empty());
        assert_eq!(g.n_points(), 4);
        assert_eq!(g.data().ncols(), 3);
        assert_eq!(g.value(0, 0, 21), None);
    }

    #[test]
    fn from_fn_uses_x_major_row_order() {
        let xs = vec![1e-3, 1e-2, 0.1];
        let qs = vec![2.0, 20.0];
        let g = Grid::from_fn(|pid, x, q2| pid as f64 * 1000.0 + x + q2, vec![1, 21], xs.clone(), qs.clone())
            .unwrap();
        assert_eq!(g.data().nrows(), 6);
        // row 1 is (x0, q1), row 2 is (x1, q0)
        assert_relative_eq!(g.data()[(1, 0)], 1000.0 + xs[0] + qs[1]);
        assert_relative_eq!(g.data()[(2, 1)], 21000.0 + xs[1] + qs[0]);
        for (ix, &x) in xs.iter().enumerate() {
            for (iq, &q2) in qs.iter().enumerate() {
                assert_relative_eq!(g.value(ix, iq, 21).unwrap(), 21000.0 + x + q2);
            }
        }
    }

    #[test]
    fn with_zeroed_column_leaves_original_untouched() {
        let g = small();
        let z = g.with_zeroed_column(1);
        assert_eq!(z.column(21).unwrap(), vec![0.0; 4]);
        assert_eq!(g.column(21).unwrap(), vec![0.2; 4]);
        assert_eq!(z.column(-1).unwrap(), vec![0.1; 4]);
    }

    #[test]
    fn with_only_pids_zeroes_the_rest() {
        let g = small();
        let gd = g.with_only_pids(&[21, 1]);
        assert_eq!(gd.pids(), g.pids());
        assert_eq!(gd.column(-1).unwrap(), vec![0.0; 4]);
        assert_eq!(gd.column(21).unwrap(), vec![0.2; 4]);
        assert_eq!(gd.column(1).unwrap(), vec![0.3; 4]);
    }

    #[test]
    fn with_xgrid_checks_length() {
        let g = small();
        let moved = g.with_xgrid(vec![1e-10, 1.0]).unwrap();
        assert_eq!(moved.xgrid()[0], 1e-10);
        assert_eq!(moved.data(), g.data());
        assert!(g.with_xgrid(vec![0.5]).is_err());
    }

    proptest! {
        #[test]
        fn from_fn_matches_pointwise_evaluation(
            nx in 1usize..12,
            nq in 1usize..8,
        ) {
            let xs: Vec<f64> = (0..nx).map(|i| 10f64.powf(-((nx - i) as f64))).collect();
            let qs: Vec<f64> = (0..nq).map(|i| 1.5 + i as f64).collect();
            let pids = vec![-2, -1, 21, 1, 2];
            let f = |pid: i32, x: f64, q2: f64| x * (1.0 - x) * pid as f64 + q2.ln();
            let g = Grid::from_fn(f, pids.clone(), xs.clone(), qs.clone()).unwrap();
            for (ix, &x) in xs.iter().enumerate() {
                for (iq, &q2) in qs.iter().enumerate() {
                    for &pid in &pids {
                        prop_assert_eq!(g.value(ix, iq, pid).unwrap(), f(pid, x, q2));
                    }
                }
            }
        }
    }
}
