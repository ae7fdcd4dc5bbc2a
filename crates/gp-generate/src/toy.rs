//! ToyLH: the Les Houches toy PDF at Q = √2 GeV.
//!
//! The parametrization has no Q² dependence; it is a cheap stand-in parent
//! when no real set is installed.

const N_UV: f64 = 5.1072;
const A_UV: f64 = 0.8;
const B_UV: f64 = 3.0;
const N_DV: f64 = 3.06432;
const A_DV: f64 = 0.8;
const B_DV: f64 = 4.0;
const N_G: f64 = 1.7;
const A_G: f64 = -0.1;
const B_G: f64 = 5.0;
const N_DB: f64 = 0.1939875;
const A_DB: f64 = -0.1;
const B_DB: f64 = 6.0;
const F_S: f64 = 0.2;

/// Names under which the toy parent can be requested.
pub const TOY_NAMES: [&str; 2] = ["toy", "toylh"];

/// The toy PDF. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToyPdf;

impl ToyPdf {
    /// Set name reported by the toy.
    pub const NAME: &'static str = "ToyLH";

    /// `x f(x, Q²)` for `pid`; zero for flavors the toy does not model and
    /// for `x > 1`.
    pub fn xfxq2(&self, pid: i32, x: f64, _q2: f64) -> f64 {
        if x > 1.0 {
            return 0.0;
        }
        match pid {
            2 => xuv(x) + xubar(x),
            1 => xdv(x) + xdbar(x),
            0 | 21 => xg(x),
            -1 => xdbar(x),
            -2 => xubar(x),
            3 | -3 => xs(x),
            _ => 0.0,
        }
    }

    /// Strong coupling; constant for the toy.
    pub fn alphas_q2(&self, _q2: f64) -> f64 {
        0.35
    }

    /// True for the pids the toy answers for (possibly with zero).
    pub fn has_flavor(&self, pid: i32) -> bool {
        matches!(pid, 21 | 22 | -6..=6)
    }
}

fn xuv(x: f64) -> f64 {
    N_UV * x.powf(A_UV) * (1.0 - x).powf(B_UV)
}

fn xdv(x: f64) -> f64 {
    N_DV * x.powf(A_DV) * (1.0 - x).powf(B_DV)
}

fn xg(x: f64) -> f64 {
    N_G * x.powf(A_G) * (1.0 - x).powf(B_G)
}

fn xdbar(x: f64) -> f64 {
    N_DB * x.powf(A_DB) * (1.0 - x).powf(B_DB)
}

fn xubar(x: f64) -> f64 {
    xdbar(x) * (1.0 - x)
}

fn xs(x: f64) -> f64 {
    F_S * (xdbar(x) + xubar(x))
}
