//! Interpolation grid used for synthetic parents.

use serde::{Deserialize, Serialize};

use gp_core::{Error, Result};

/// Log-spaced x and Q² nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    /// Smallest x node.
    pub x_min: f64,
    /// Largest x node.
    pub x_max: f64,
    /// Number of x nodes.
    pub n_x: usize,
    /// Smallest Q² node (GeV²).
    pub q2_min: f64,
    /// Largest Q² node (GeV²).
    pub q2_max: f64,
    /// Number of Q² nodes.
    pub n_q2: usize,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self { x_min: 1e-9, x_max: 1.0, n_x: 240, q2_min: 1.3, q2_max: 1e5, n_q2: 35 }
    }
}

impl GridSpec {
    /// Check bounds and node counts.
    pub fn validate(&self) -> Result<()> {
        for (what, lo, hi, n) in
            [("x", self.x_min, self.x_max, self.n_x), ("Q2", self.q2_min, self.q2_max, self.n_q2)]
        {
            if !(lo > 0.0 && lo.is_finite() && hi.is_finite()) || lo > hi {
                return Err(Error::Validation(format!(
                    "{what} range [{lo}, {hi}] must be positive and ordered"
                )));
            }
            if n == 0 {
                return Err(Error::Validation(format!("{what} grid needs at least one node")));
            }
        }
        Ok(())
    }

    /// x nodes.
    pub fn xgrid(&self) -> Vec<f64> {
        geomspace(self.x_min, self.x_max, self.n_x)
    }

    /// Q² nodes.
    pub fn q2grid(&self) -> Vec<f64> {
        geomspace(self.q2_min, self.q2_max, self.n_q2)
    }
}

/// `n` points evenly spaced in log between `start` and `stop`, endpoints
/// included exactly.
pub fn geomspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let (a, b) = (start.ln(), stop.ln());
            let step = (b - a) / (n - 1) as f64;
            (0..n)
                .map(|i| match i {
                    0 => start,
                    i if i == n - 1 => stop,
                    i => (a + step * i as f64).exp(),
                })
                .collect()
        }
    }
}
