//! Flavor-basis / evolution-basis rotation table.

use nalgebra::DMatrix;

use gp_core::{Error, Result};

/// PDG identifiers of the flavor basis, in canonical column order.
pub const FLAVOR_PIDS: [i32; 14] = [22, -6, -5, -4, -3, -2, -1, 21, 1, 2, 3, 4, 5, 6];

/// Short names of the flavor basis, aligned with [`FLAVOR_PIDS`].
pub const FLAVOR_NAMES: [&str; 14] =
    ["ph", "tbar", "bbar", "cbar", "sbar", "ubar", "dbar", "g", "d", "u", "s", "c", "b", "t"];

/// Evolution-basis labels, in canonical row order of the rotation.
pub const EVOLUTION_LABELS: [&str; 14] =
    ["ph", "S", "g", "V", "V3", "V8", "V15", "V24", "V35", "T3", "T8", "T15", "T24", "T35"];

/// `evolution = ROTATION · flavor`.
///
/// Columns: ph, tbar, bbar, cbar, sbar, ubar, dbar, g, d, u, s, c, b, t.
#[rustfmt::skip]
const ROTATION: [[f64; 14]; 14] = [
    [1., 0., 0., 0., 0., 0., 0., 0., 0., 0., 0., 0., 0., 0.],          // ph
    [0., 1., 1., 1., 1., 1., 1., 0., 1., 1., 1., 1., 1., 1.],          // S
    [0., 0., 0., 0., 0., 0., 0., 1., 0., 0., 0., 0., 0., 0.],          // g
    [0., -1., -1., -1., -1., -1., -1., 0., 1., 1., 1., 1., 1., 1.],    // V
    [0., 0., 0., 0., 0., -1., 1., 0., -1., 1., 0., 0., 0., 0.],        // V3
    [0., 0., 0., 0., 2., -1., -1., 0., 1., 1., -2., 0., 0., 0.],       // V8
    [0., 0., 0., 3., -1., -1., -1., 0., 1., 1., 1., -3., 0., 0.],      // V15
    [0., 0., 4., -1., -1., -1., -1., 0., 1., 1., 1., 1., -4., 0.],     // V24
    [0., 5., -1., -1., -1., -1., -1., 0., 1., 1., 1., 1., 1., -5.],    // V35
    [0., 0., 0., 0., 0., 1., -1., 0., -1., 1., 0., 0., 0., 0.],        // T3
    [0., 0., 0., 0., -2., 1., 1., 0., 1., 1., -2., 0., 0., 0.],        // T8
    [0., 0., 0., -3., 1., 1., 1., 0., 1., 1., 1., -3., 0., 0.],        // T15
    [0., 0., -4., 1., 1., 1., 1., 0., 1., 1., 1., 1., -4., 0.],        // T24
    [0., -5., 1., 1., 1., 1., 1., 0., 1., 1., 1., 1., 1., -5.],        // T35
];

/// Direction selected by the reserved `custom` label (`u + ubar - 4 (d + dbar)`).
pub const CUSTOM_DIRECTION: [f64; 14] =
    [0., 0., 0., 0., 0., 1., -4., 0., -4., 1., 0., 0., 0., 0.];

/// Immutable flavor/evolution basis description.
///
/// Built once and handed by reference to [`crate::Projector`]; a substitute
/// table can be supplied for testing.
#[derive(Debug, Clone)]
pub struct BasisTable {
    pids: Vec<i32>,
    labels: Vec<String>,
    rotation: DMatrix<f64>,
    inverse: DMatrix<f64>,
}

impl BasisTable {
    /// Build a table, inverting `rotation` up front.
    ///
    /// `rotation` maps flavor column vectors (ordered as `pids`) to evolution
    /// column vectors (ordered as `labels`). A singular rotation is rejected.
    pub fn new(pids: Vec<i32>, labels: Vec<String>, rotation: DMatrix<f64>) -> Result<Self> {
        let n = pids.len();
        if labels.len() != n || rotation.nrows() != n || rotation.ncols() != n {
            return Err(Error::SingularRotation(format!(
                "rotation is {}x{}, but {} pids and {} labels were given",
                rotation.nrows(),
                rotation.ncols(),
                n,
                labels.len()
            )));
        }
        for (i, pid) in pids.iter().enumerate() {
            if pids[..i].contains(pid) {
                return Err(Error::Validation(format!("duplicate basis pid {pid}")));
            }
        }
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                return Err(Error::Validation(format!("duplicate basis label '{label}'")));
            }
        }
        let inverse = invert_rotation(&rotation)?;
        Ok(Self { pids, labels, rotation, inverse })
    }

    /// The 14-flavor QCD+QED basis.
    pub fn standard() -> Result<Self> {
        let rotation = DMatrix::from_fn(14, 14, |r, c| ROTATION[r][c]);
        Self::new(
            FLAVOR_PIDS.to_vec(),
            EVOLUTION_LABELS.iter().map(|s| s.to_string()).collect(),
            rotation,
        )
    }

    /// Basis dimension.
    pub fn dim(&self) -> usize {
        self.pids.len()
    }

    /// Flavor-basis pids, canonical order.
    pub fn pids(&self) -> &[i32] {
        &self.pids
    }

    /// Evolution-basis labels, canonical order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Flavor → evolution rotation.
    pub fn rotation(&self) -> &DMatrix<f64> {
        &self.rotation
    }

    /// Evolution → flavor rotation.
    pub fn inverse(&self) -> &DMatrix<f64> {
        &self.inverse
    }

    /// Canonical position of `pid`. The legacy gluon id `0` resolves to `21`.
    pub fn pid_position(&self, pid: i32) -> Option<usize> {
        self.pids.iter().position(|&p| p == pid).or_else(|| {
            if pid == 0 { self.pids.iter().position(|&p| p == 21) } else { None }
        })
    }

    /// Canonical position of an evolution label.
    pub fn label_position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// True iff every label belongs to the evolution basis.
    pub fn is_evolution_labels<S: AsRef<str>>(&self, labels: &[S]) -> bool {
        labels.iter().all(|l| self.label_position(l.as_ref()).is_some())
    }

    /// True iff every label parses as an integer that is a flavor-basis pid.
    pub fn is_pid_labels<S: AsRef<str>>(&self, labels: &[S]) -> bool {
        labels.iter().all(|l| match l.as_ref().trim().parse::<i32>() {
            Ok(pid) => self.pids.contains(&pid),
            Err(_) => false,
        })
    }

    /// Pid named by a flavor label: an integer pid or a short flavor name
    /// such as `u`, `dbar` or `g`.
    pub fn flavor_pid(&self, label: &str) -> Option<i32> {
        let label = label.trim();
        let pid = match label.parse::<i32>() {
            Ok(pid) => pid,
            Err(_) => FLAVOR_NAMES.iter().position(|&n| n == label).map(|i| FLAVOR_PIDS[i])?,
        };
        self.pids.contains(&pid).then_some(pid)
    }

    /// Rotate a `points × flavors` table into the evolution basis.
    pub fn to_evolution(&self, flavor: &DMatrix<f64>) -> DMatrix<f64> {
        flavor * self.rotation.transpose()
    }

    /// Rotate a `points × labels` table back into the flavor basis.
    pub fn to_flavor(&self, evolution: &DMatrix<f64>) -> DMatrix<f64> {
        evolution * self.inverse.transpose()
    }
}

/// Invert the rotation.
///
/// Rotations with mutually orthogonal rows (the standard table) are inverted
/// exactly as `Rᵀ · diag(1/|rᵢ|²)`, which keeps decoupled components such as
/// the gluon free of rounding noise. Anything else goes through LU.
fn invert_rotation(rotation: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let n = rotation.nrows();
    let gram = rotation * rotation.transpose();
    let orthogonal_rows = (0..n).all(|i| (0..n).all(|j| i == j || gram[(i, j)] == 0.0));

    let inverse = if orthogonal_rows {
        if let Some(i) = (0..n).find(|&i| gram[(i, i)] == 0.0) {
            return Err(Error::SingularRotation(format!("row {i} of the rotation is zero")));
        }
        DMatrix::from_fn(n, n, |r, c| rotation[(c, r)] / gram[(c, c)])
    } else {
        rotation
            .clone()
            .try_inverse()
            .ok_or_else(|| Error::SingularRotation("rotation matrix is not invertible".into()))?
    };

    if inverse.iter().any(|v| !v.is_finite()) {
        return Err(Error::SingularRotation("inverse rotation is not finite".into()));
    }
    Ok(inverse)
}
