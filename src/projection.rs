//! # Orbit plane → reference frame projection
//!
//! Maps a true anomaly `ν` on an orbit `(a, e, i, ω, Ω)` to Cartesian coordinates in the
//! reference frame of the central mass:
//!
//! ```text
//! r = a(1 − e²) / (1 + e·cos ν)
//! x = r (cos Ω·cos(ω+ν) − sin Ω·sin(ω+ν)·cos i)
//! y = r (sin Ω·cos(ω+ν) + cos Ω·sin(ω+ν)·cos i)
//! z = r  sin(ω+ν)·sin i
//! ```
//!
//! The argument of periastron and the true anomaly enter as the single argument of
//! latitude `u = ω + ν`. The `(x, y)` pair is the projected sky position, `z` is the
//! line-of-sight coordinate.
//!
//! No clamping happens when `1 + e·cos ν → 0`: a diverging radius means the inputs are
//! not a bound orbit and is left visible to the caller.
use itertools::multiunzip;
use nalgebra::Vector3;

use crate::constants::Radian;

/// Orbit-plane radius `r = a(1 − e²) / (1 + e·cos ν)`.
#[inline]
pub fn orbit_radius(a: f64, e: f64, true_anomaly: Radian) -> f64 {
    a * (1.0 - e * e) / (1.0 + e * true_anomaly.cos())
}

/// Trigonometric factors of the orientation angles, computed once per orbit.
#[derive(Debug, Clone, Copy)]
struct Orientation {
    sin_node: f64,
    cos_node: f64,
    sin_inc: f64,
    cos_inc: f64,
    periapsis_argument: Radian,
}

impl Orientation {
    fn new(inc: Radian, omega: Radian, node: Radian) -> Self {
        let (sin_node, cos_node) = node.sin_cos();
        let (sin_inc, cos_inc) = inc.sin_cos();
        Orientation {
            sin_node,
            cos_node,
            sin_inc,
            cos_inc,
            periapsis_argument: omega,
        }
    }

    #[inline]
    fn project(&self, r: f64, true_anomaly: Radian) -> (f64, f64, f64) {
        let (sin_u, cos_u) = (self.periapsis_argument + true_anomaly).sin_cos();
        let x = r * (self.cos_node * cos_u - self.sin_node * sin_u * self.cos_inc);
        let y = r * (self.sin_node * cos_u + self.cos_node * sin_u * self.cos_inc);
        let z = r * sin_u * self.sin_inc;
        (x, y, z)
    }
}

/// Position of one body for a single true anomaly.
///
/// Arguments
/// ---------
/// * `a` – semi-major axis.
/// * `e` – eccentricity.
/// * `inc` – inclination `i` (rad).
/// * `omega` – argument of periastron `ω` (rad).
/// * `node` – longitude of ascending node `Ω` (rad).
/// * `true_anomaly` – `ν` (rad).
///
/// Return
/// ------
/// * `[x, y, z]` in the length unit of `a`.
pub fn space_position(
    a: f64,
    e: f64,
    inc: Radian,
    omega: Radian,
    node: Radian,
    true_anomaly: Radian,
) -> Vector3<f64> {
    let (x, y, z) = Orientation::new(inc, omega, node)
        .project(orbit_radius(a, e, true_anomaly), true_anomaly);
    Vector3::new(x, y, z)
}

/// Elementwise [`space_position`] over a sequence of true anomalies.
///
/// The orbit elements stay scalar; only `ν` varies.
///
/// Return
/// ------
/// * `(x, y, z)` – three sequences index-aligned with `true_anomalies`.
pub fn space_positions(
    a: f64,
    e: f64,
    inc: Radian,
    omega: Radian,
    node: Radian,
    true_anomalies: &[Radian],
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let orientation = Orientation::new(inc, omega, node);
    let semi_latus_rectum = a * (1.0 - e * e);

    multiunzip(true_anomalies.iter().map(|&nu| {
        let r = semi_latus_rectum / (1.0 + e * nu.cos());
        orientation.project(r, nu)
    }))
}
