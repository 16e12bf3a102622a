//! # Orbit time series
//!
//! [`OrbitTrajectory`] is the evaluation of one [`OrbitalElements`] set on a sequence of
//! sample times. The whole sequence goes through the pipeline in one pass:
//!
//! ```text
//! t ──► M (mean_anomalies) ──► E (KeplerSolver) ──► ν (true_anomalies) ──► (x, y, z) (space_positions)
//! ```
//!
//! Every sequence of a trajectory (times, M, E, ν, x, y, z) has the same length and
//! shares the same index.
//!
//! ## Line-of-sight reversal
//!
//! [`find_reversal`] scans a coordinate sequence for its first local extremum, and
//! [`OrbitTrajectory::truncate_at_reversal`] cuts the series right after it. This is
//! opt-in: nothing truncates a trajectory unless asked to.
//!
//! ## Example
//!
//! ```rust
//! use sky_orbits::keplerian_element::OrbitalElements;
//! use sky_orbits::time_grid::TimeGrid;
//! use sky_orbits::trajectory::{compute_trajectory, Axis};
//!
//! let elem = OrbitalElements::from_degrees(15.0, 0.3, 85.0, 15.0, 5.0, 55.0 * 365.25, 8.66).unwrap();
//! let times = TimeGrid::arange(0.0, 36500.0, 10.0).unwrap();
//!
//! let mut traj = compute_trajectory(&elem, &times).unwrap();
//! assert_eq!(traj.len(), times.len());
//!
//! if let Some(last) = traj.truncate_at_reversal(Axis::Z) {
//!     assert_eq!(traj.len(), last + 1);
//! }
//! ```
use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};
use itertools::{izip, Itertools};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    anomaly::{mean_anomalies, true_anomalies},
    constants::{Day, Radian, RADEG},
    kepler::{principal_angle, KeplerSolver},
    keplerian_element::OrbitalElements,
    orbit_errors::OrbitError,
    projection::space_positions,
    time_grid::check_finite_samples,
};

/// Cartesian axis of the reference frame. `Z` is the line of sight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// Index of the first local extremum of `values`, where the sequence changes direction.
///
/// Steps with no change (flat segments) or NaN differences carry no direction and are
/// skipped; the direction of the last real step is compared with the next one.
///
/// Return
/// ------
/// * `Some(i)` – `values[i]` is the last sample before the direction flips.
/// * `None` – the sequence is monotonic (or too short to reverse).
pub fn find_reversal(values: &[f64]) -> Option<usize> {
    let mut direction: Option<bool> = None;

    for (i, (a, b)) in values.iter().tuple_windows().enumerate() {
        let step = b - a;
        if step == 0.0 || step.is_nan() {
            continue;
        }
        let rising = step > 0.0;
        match direction {
            Some(previous) if previous != rising => return Some(i),
            _ => direction = Some(rising),
        }
    }

    None
}

/// Positions of one body over a sequence of sample times.
///
/// Invariant: `times`, `mean_anomaly`, `eccentric_anomaly`, `true_anomaly`, `x`, `y`, `z`
/// always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitTrajectory {
    elements: OrbitalElements,
    times: Vec<Day>,
    mean_anomaly: Vec<Radian>,
    eccentric_anomaly: Vec<Radian>,
    true_anomaly: Vec<Radian>,
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

/// Evaluate `elements` at every time of `times` with the default [`KeplerSolver`].
///
/// See [`OrbitTrajectory::compute`].
pub fn compute_trajectory(
    elements: &OrbitalElements,
    times: &[Day],
) -> Result<OrbitTrajectory, OrbitError> {
    OrbitTrajectory::compute(elements, times, &KeplerSolver::default())
}

impl OrbitTrajectory {
    /// Evaluate `elements` at every time of `times`.
    ///
    /// Arguments
    /// ---------
    /// * `elements` – orbit of the body.
    /// * `times` – sample times, same unit as the period.
    /// * `solver` – Kepler solver settings.
    ///
    /// Return
    /// ------
    /// * The trajectory, index-aligned with `times`.
    ///
    /// Errors
    /// ------
    /// * [`OrbitError::NonFiniteSample`] if a time is NaN or infinite.
    /// * [`OrbitError::ConvergenceError`] if Kepler's equation fails for some sample.
    pub fn compute(
        elements: &OrbitalElements,
        times: &[Day],
        solver: &KeplerSolver,
    ) -> Result<Self, OrbitError> {
        check_finite_samples(times)?;
        debug!(samples = times.len(), "computing trajectory");

        let e = elements.eccentricity();
        let mean_anomaly = mean_anomalies(times, elements.period(), elements.periastron_epoch());
        let eccentric_anomaly = solver.solve(&mean_anomaly, e)?;
        let true_anomaly = true_anomalies(&eccentric_anomaly, e);
        let (x, y, z) = space_positions(
            elements.semi_major_axis(),
            e,
            elements.inclination(),
            elements.periapsis_argument(),
            elements.ascending_node_longitude(),
            &true_anomaly,
        );

        Ok(OrbitTrajectory {
            elements: elements.clone(),
            times: times.to_vec(),
            mean_anomaly,
            eccentric_anomaly,
            true_anomaly,
            x,
            y,
            z,
        })
    }

    pub fn elements(&self) -> &OrbitalElements {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[Day] {
        &self.times
    }

    pub fn mean_anomalies(&self) -> &[Radian] {
        &self.mean_anomaly
    }

    pub fn eccentric_anomalies(&self) -> &[Radian] {
        &self.eccentric_anomaly
    }

    pub fn true_anomalies(&self) -> &[Radian] {
        &self.true_anomaly
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn z(&self) -> &[f64] {
        &self.z
    }

    /// Coordinate sequence along `axis`.
    pub fn coordinate(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// Position at sample `index`, if any.
    pub fn position(&self, index: usize) -> Option<Vector3<f64>> {
        Some(Vector3::new(
            *self.x.get(index)?,
            *self.y.get(index)?,
            *self.z.get(index)?,
        ))
    }

    /// All positions as vectors.
    pub fn positions(&self) -> Vec<Vector3<f64>> {
        izip!(&self.x, &self.y, &self.z)
            .map(|(&x, &y, &z)| Vector3::new(x, y, z))
            .collect()
    }

    /// Projected sky positions `(x, y)`.
    pub fn sky_positions(&self) -> Vec<(f64, f64)> {
        self.x.iter().copied().zip(self.y.iter().copied()).collect()
    }

    /// Distance to the central mass at every sample.
    pub fn radii(&self) -> Vec<f64> {
        izip!(&self.x, &self.y, &self.z)
            .map(|(x, y, z)| (x * x + y * y + z * z).sqrt())
            .collect()
    }

    /// Index of the first direction reversal along `axis`, see [`find_reversal`].
    pub fn reversal_index(&self, axis: Axis) -> Option<usize> {
        find_reversal(self.coordinate(axis))
    }

    /// Keep only the first `len` samples of every sequence.
    pub fn truncate(&mut self, len: usize) {
        self.times.truncate(len);
        self.mean_anomaly.truncate(len);
        self.eccentric_anomaly.truncate(len);
        self.true_anomaly.truncate(len);
        self.x.truncate(len);
        self.y.truncate(len);
        self.z.truncate(len);
    }

    /// Cut the series after the first direction reversal along `axis`.
    ///
    /// Return
    /// ------
    /// * `Some(i)` – the extremum index; the trajectory now holds samples `0..=i`.
    /// * `None` – no reversal, the trajectory is unchanged.
    pub fn truncate_at_reversal(&mut self, axis: Axis) -> Option<usize> {
        let index = self.reversal_index(axis)?;
        info!(
            %axis,
            index,
            time = self.times[index],
            "trajectory truncated at direction reversal"
        );
        self.truncate(index + 1);
        Some(index)
    }

    /// Render every `stride`-th sample (and the last one) as a table.
    pub fn to_table(&self, stride: usize) -> String {
        let stride = stride.max(1);
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("#"),
            Cell::new("t"),
            Cell::new("M mod 2π [deg]"),
            Cell::new("ν [deg]"),
            Cell::new("x"),
            Cell::new("y"),
            Cell::new("z"),
        ]);

        let last = self.len().saturating_sub(1);
        for i in (0..self.len()).filter(|i| i % stride == 0 || *i == last) {
            table.add_row(Row::from(vec![
                Cell::new(i).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.3}", self.times[i])).set_alignment(CellAlignment::Right),
                Cell::new(format!(
                    "{:.4}",
                    principal_angle(self.mean_anomaly[i]) / RADEG
                ))
                .set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.4}", self.true_anomaly[i] / RADEG))
                    .set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.6}", self.x[i])).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.6}", self.y[i])).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.6}", self.z[i])).set_alignment(CellAlignment::Right),
            ]));
        }

        table.to_string()
    }
}
