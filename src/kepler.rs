//! # Kepler equation solver
//!
//! Solves Kepler's equation for the eccentric anomaly of a bound orbit,
//!
//! ```text
//! M = E − e·sin(E),        0 ≤ e < 1
//! ```
//!
//! elementwise over a sequence of mean anomalies.
//!
//! ## Method
//!
//! 1. **Domain check** – `e` outside `[0, 1)` fails fast with
//!    [`OrbitError::InvalidEccentricity`]; nothing is iterated.
//! 2. **Range reduction** – `M` is shifted by a whole number of turns into `[−π, π]`, the
//!    root is searched there and shifted back, so the output stays continuous with the
//!    unwrapped input.
//! 3. **Starting point** – `E0 = M + sign(sin M)·0.85·e` (Danby), safe up to `e → 1`.
//! 4. **Newton–Raphson** on `f(E) = E − e·sin E − M`, `f'(E) = 1 − e·cos E`, with an
//!    explicit step tolerance and iteration cap.
//! 5. **Bracketed fallback** – if Newton fails or misses the residual tolerance, Brent's
//!    method runs on `[M − e − δ, M + e + δ]`, which always contains the root.
//! 6. **Acceptance** – the residual `|M − E + e·sin E|` must be below the configured
//!    tolerance, otherwise [`OrbitError::ConvergenceError`] names the failing index.
//!
//! ## Example
//!
//! ```rust
//! use sky_orbits::kepler::solve_kepler;
//!
//! let ecc_anomalies = solve_kepler(&[0.0, 0.5, 3.0], 0.3).unwrap();
//! assert_eq!(ecc_anomalies.len(), 3);
//! ```
use roots::{find_root_brent, find_root_newton_raphson, SimpleConvergency};
use tracing::{debug, warn};

use crate::{
    constants::{
        Radian, DANBY_GUESS_FACTOR, DPI, MAX_RESIDUAL_TOLERANCE, NEWTON_EPS, NEWTON_MAX_ITER,
        RESIDUAL_TOLERANCE,
    },
    keplerian_element::check_eccentricity,
    orbit_errors::OrbitError,
};

/// Margin added on both sides of the `[M − e, M + e]` bracket so that the end points
/// never sit exactly on the root.
const BRACKET_MARGIN: f64 = 1e-6;

/// Iteration cap of the bracketed fallback.
const BRACKET_MAX_ITER: usize = 200;

/// Return the principal value of an angle in radians, in `[0, 2π)`.
pub fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Sign with `sign(0) = 0`, unlike [`f64::signum`].
#[inline]
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Danby's starting point `E0 = M + sign(sin M)·0.85·e`.
#[inline]
pub fn initial_guess(mean_anomaly: Radian, e: f64) -> Radian {
    mean_anomaly + sign(mean_anomaly.sin()) * DANBY_GUESS_FACTOR * e
}

/// Absolute residual of Kepler's equation, `|M − E + e·sin E|`.
#[inline]
pub fn kepler_residual(mean_anomaly: Radian, eccentric_anomaly: Radian, e: f64) -> f64 {
    (mean_anomaly - eccentric_anomaly + e * eccentric_anomaly.sin()).abs()
}

/// Numerical settings of the Kepler solver.
///
/// Fields
/// ------
/// * `newton_eps` – absolute step tolerance of the Newton–Raphson iteration (rad).
/// * `newton_max_iter` – Newton–Raphson iteration cap.
/// * `residual_tolerance` – acceptance threshold on `|M − E + e·sin E|` (rad).
///
/// Defaults
/// --------
/// * `newton_eps`: 100 × `f64::EPSILON`
/// * `newton_max_iter`: 50
/// * `residual_tolerance`: 1e-10
///
/// See also
/// --------
/// * [`KeplerSolver::builder`] – validated construction of custom settings.
/// * [`solve_kepler`] – shortcut using the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct KeplerSolver {
    newton_eps: f64,
    newton_max_iter: usize,
    residual_tolerance: f64,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        KeplerSolver {
            newton_eps: NEWTON_EPS,
            newton_max_iter: NEWTON_MAX_ITER,
            residual_tolerance: RESIDUAL_TOLERANCE,
        }
    }
}

impl KeplerSolver {
    /// Construct a solver with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`KeplerSolverBuilder`] to override the default settings.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sky_orbits::kepler::KeplerSolver;
    ///
    /// let solver = KeplerSolver::builder()
    ///     .newton_max_iter(20)
    ///     .residual_tolerance(1e-9)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(solver.newton_max_iter(), 20);
    /// ```
    pub fn builder() -> KeplerSolverBuilder {
        KeplerSolverBuilder::new()
    }

    pub fn newton_eps(&self) -> f64 {
        self.newton_eps
    }

    pub fn newton_max_iter(&self) -> usize {
        self.newton_max_iter
    }

    pub fn residual_tolerance(&self) -> f64 {
        self.residual_tolerance
    }

    /// Solve Kepler's equation for every mean anomaly of `mean_anomalies`.
    ///
    /// Arguments
    /// ---------
    /// * `mean_anomalies` – mean anomalies `M` (rad), unwrapped values accepted.
    /// * `e` – eccentricity, `0 ≤ e < 1`.
    ///
    /// Return
    /// ------
    /// * The eccentric anomalies `E`, same length and order as the input.
    ///
    /// Errors
    /// ------
    /// * [`OrbitError::InvalidEccentricity`] if `e ∉ [0, 1)`.
    /// * [`OrbitError::NonFiniteSample`] if some `M` is NaN or infinite.
    /// * [`OrbitError::ConvergenceError`] for the first element whose residual stays above
    ///   the tolerance after both Newton and the bracketed fallback.
    pub fn solve(&self, mean_anomalies: &[Radian], e: f64) -> Result<Vec<Radian>, OrbitError> {
        check_eccentricity(e)?;
        debug!(
            samples = mean_anomalies.len(),
            eccentricity = e,
            "solving Kepler equation"
        );

        mean_anomalies
            .iter()
            .enumerate()
            .map(|(index, &m)| self.solve_element(index, m, e))
            .collect()
    }

    /// Solve Kepler's equation for a single mean anomaly.
    ///
    /// Same contract as [`KeplerSolver::solve`], errors report index `0`.
    pub fn solve_scalar(&self, mean_anomaly: Radian, e: f64) -> Result<Radian, OrbitError> {
        check_eccentricity(e)?;
        self.solve_element(0, mean_anomaly, e)
    }

    fn solve_element(&self, index: usize, m: Radian, e: f64) -> Result<Radian, OrbitError> {
        if !m.is_finite() {
            return Err(OrbitError::NonFiniteSample { index, value: m });
        }

        // whole turns removed from M, added back to E
        let turns = (m / DPI).round();
        let m_red = m - turns * DPI;

        let ecc_red = match self.newton(m_red, e) {
            Ok(ecc) if kepler_residual(m_red, ecc, e) <= self.residual_tolerance => ecc,
            newton => {
                debug!(
                    index,
                    mean_anomaly = m,
                    eccentricity = e,
                    ?newton,
                    "Newton-Raphson rejected, falling back to Brent"
                );
                match self.bracketed(m_red, e) {
                    Ok(ecc) if kepler_residual(m_red, ecc, e) <= self.residual_tolerance => ecc,
                    fallback => {
                        let best = fallback
                            .ok()
                            .or(newton.ok())
                            .unwrap_or_else(|| initial_guess(m_red, e));
                        let residual = kepler_residual(m_red, best, e);
                        warn!(
                            index,
                            mean_anomaly = m,
                            eccentricity = e,
                            residual,
                            "Kepler equation did not converge"
                        );
                        return Err(OrbitError::ConvergenceError {
                            index,
                            mean_anomaly: m,
                            eccentricity: e,
                            residual,
                        });
                    }
                }
            }
        };

        Ok(ecc_red + turns * DPI)
    }

    /// Newton–Raphson iteration from Danby's starting point.
    fn newton(&self, m: Radian, e: f64) -> Result<Radian, OrbitError> {
        // R(E) = E - e·sin(E) - M
        let f = |ecc: f64| -> f64 { ecc - e * ecc.sin() - m };

        // R'(E)
        let df = |ecc: f64| -> f64 { 1.0 - e * ecc.cos() };

        let mut tol = SimpleConvergency {
            eps: self.newton_eps,
            max_iter: self.newton_max_iter,
        };

        Ok(find_root_newton_raphson(
            initial_guess(m, e),
            &f,
            &df,
            &mut tol,
        )?)
    }

    /// Brent's method on a bracket that always contains the root.
    fn bracketed(&self, m: Radian, e: f64) -> Result<Radian, OrbitError> {
        let f = |ecc: f64| -> f64 { ecc - e * ecc.sin() - m };
        let half_width = e + BRACKET_MARGIN;

        let mut tol = SimpleConvergency {
            eps: self.newton_eps,
            max_iter: BRACKET_MAX_ITER,
        };

        Ok(find_root_brent(m - half_width, m + half_width, &f, &mut tol)?)
    }
}

/// Solve Kepler's equation with the default [`KeplerSolver`] settings.
///
/// Arguments
/// ---------
/// * `mean_anomalies` – mean anomalies `M` (rad).
/// * `e` – eccentricity, `0 ≤ e < 1`.
///
/// Return
/// ------
/// * Eccentric anomalies `E`, index-aligned with `mean_anomalies`, or the first
///   domain/convergence error.
pub fn solve_kepler(mean_anomalies: &[Radian], e: f64) -> Result<Vec<Radian>, OrbitError> {
    KeplerSolver::default().solve(mean_anomalies, e)
}

/// Builder for [`KeplerSolver`], with validation.
#[derive(Debug, Clone)]
pub struct KeplerSolverBuilder {
    solver: KeplerSolver,
}

impl Default for KeplerSolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeplerSolverBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            solver: KeplerSolver::default(),
        }
    }

    pub fn newton_eps(mut self, v: f64) -> Self {
        self.solver.newton_eps = v;
        self
    }

    pub fn newton_max_iter(mut self, v: usize) -> Self {
        self.solver.newton_max_iter = v;
        self
    }

    pub fn residual_tolerance(mut self, v: f64) -> Self {
        self.solver.residual_tolerance = v;
        self
    }

    /// Validate and return the configured [`KeplerSolver`].
    ///
    /// Errors
    /// ------
    /// [`OrbitError::InvalidSolverParameter`] when
    /// * `newton_eps` is not a finite positive number,
    /// * `newton_max_iter` is zero,
    /// * `residual_tolerance` is not in `(0, 1e-8]`.
    pub fn build(self) -> Result<KeplerSolver, OrbitError> {
        let s = &self.solver;

        if !(s.newton_eps.is_finite() && s.newton_eps > 0.0) {
            return Err(OrbitError::InvalidSolverParameter(
                "newton_eps must be > 0".into(),
            ));
        }
        if s.newton_max_iter == 0 {
            return Err(OrbitError::InvalidSolverParameter(
                "newton_max_iter must be >= 1".into(),
            ));
        }
        if !(s.residual_tolerance > 0.0 && s.residual_tolerance <= MAX_RESIDUAL_TOLERANCE) {
            return Err(OrbitError::InvalidSolverParameter(format!(
                "residual_tolerance must be in (0, {MAX_RESIDUAL_TOLERANCE:e}]"
            )));
        }

        Ok(self.solver)
    }
}
