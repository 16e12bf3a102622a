//! # System configuration
//!
//! JSON description of an [`OrbitSystem`] run: the bodies, the time grid, the optional
//! solver overrides and the optional stop rule.
//!
//! ```json
//! {
//!   "bodies": [
//!     { "name": "obj1", "semi_major_axis": 10.0, "eccentricity": 0.02,
//!       "inclination_deg": 70.0, "periapsis_argument_deg": 20.0,
//!       "ascending_node_longitude_deg": -15.0, "period": 10957.5, "periastron_epoch": 1.88 }
//!   ],
//!   "time_grid": { "start": 0.0, "stop": 36500.0, "step": 10.0 },
//!   "solver": { "newton_max_iter": 30 },
//!   "stop": { "body": "obj1", "axis": "z" }
//! }
//! ```
//!
//! Angles are written in degrees, as orbital elements usually are. Everything is validated
//! when the system is built, not when the file is parsed.
use std::fs;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    constants::{Day, Degree, DAYS_PER_JULIAN_YEAR},
    kepler::KeplerSolver,
    keplerian_element::OrbitalElements,
    orbit_errors::OrbitError,
    orbit_system::{OrbitSystem, ReversalStop},
    time_grid::TimeGrid,
    trajectory::Axis,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BodyConfig {
    pub name: String,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination_deg: Degree,
    pub periapsis_argument_deg: Degree,
    pub ascending_node_longitude_deg: Degree,
    pub period: Day,
    pub periastron_epoch: Day,
}

impl BodyConfig {
    /// Validated [`OrbitalElements`] of this body.
    pub fn elements(&self) -> Result<OrbitalElements, OrbitError> {
        OrbitalElements::from_degrees(
            self.semi_major_axis,
            self.eccentricity,
            self.inclination_deg,
            self.periapsis_argument_deg,
            self.ascending_node_longitude_deg,
            self.period,
            self.periastron_epoch,
        )
    }
}

/// Half-open regular grid `[start, stop)` sampled every `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeGridConfig {
    pub start: Day,
    pub stop: Day,
    pub step: Day,
}

/// Solver overrides. Missing fields keep the [`KeplerSolver`] defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newton_eps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newton_max_iter: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residual_tolerance: Option<f64>,
}

impl SolverConfig {
    pub fn build(&self) -> Result<KeplerSolver, OrbitError> {
        let mut builder = KeplerSolver::builder();
        if let Some(eps) = self.newton_eps {
            builder = builder.newton_eps(eps);
        }
        if let Some(max_iter) = self.newton_max_iter {
            builder = builder.newton_max_iter(max_iter);
        }
        if let Some(tol) = self.residual_tolerance {
            builder = builder.residual_tolerance(tol);
        }
        builder.build()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemConfig {
    pub bodies: Vec<BodyConfig>,
    pub time_grid: TimeGridConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<ReversalStop>,
}

impl SystemConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, OrbitError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// Errors
    /// ------
    /// * [`OrbitError::IoError`] if the file cannot be read.
    /// * [`OrbitError::ConfigParsing`] if the content is not a valid configuration.
    pub fn from_path(path: &Utf8Path) -> Result<Self, OrbitError> {
        debug!(path = %path, "loading system configuration");
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> Result<String, OrbitError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Two bodies, 100 years sampled every 10 days, stopped when the second body
    /// reverses along the line of sight.
    pub fn two_body_default() -> Self {
        SystemConfig {
            bodies: vec![
                BodyConfig {
                    name: "obj1".into(),
                    semi_major_axis: 10.0,
                    eccentricity: 0.02,
                    inclination_deg: 70.0,
                    periapsis_argument_deg: 20.0,
                    ascending_node_longitude_deg: -15.0,
                    period: 30.0 * DAYS_PER_JULIAN_YEAR,
                    periastron_epoch: 1.88,
                },
                BodyConfig {
                    name: "obj2".into(),
                    semi_major_axis: 15.0,
                    eccentricity: 0.3,
                    inclination_deg: 85.0,
                    periapsis_argument_deg: 15.0,
                    ascending_node_longitude_deg: 5.0,
                    period: 55.0 * DAYS_PER_JULIAN_YEAR,
                    periastron_epoch: 8.66,
                },
            ],
            time_grid: TimeGridConfig {
                start: 0.0,
                stop: 100.0 * 365.0,
                step: 10.0,
            },
            solver: SolverConfig::default(),
            stop: Some(ReversalStop {
                body: "obj2".into(),
                axis: Axis::Z,
            }),
        }
    }

    /// Regular grid described by `time_grid`.
    pub fn time_grid(&self) -> Result<TimeGrid, OrbitError> {
        let TimeGridConfig { start, stop, step } = self.time_grid;
        TimeGrid::arange(start, stop, step)
    }

    /// Validate every body, the solver overrides and the stop rule, then assemble the
    /// [`OrbitSystem`].
    pub fn build_system(&self) -> Result<OrbitSystem, OrbitError> {
        let mut system = OrbitSystem::with_solver(self.solver.build()?);
        for body in &self.bodies {
            system.add_body(body.name.as_str(), body.elements()?)?;
        }
        if let Some(stop) = &self.stop {
            system.stop_on_reversal(&stop.body, stop.axis)?;
        }
        Ok(system)
    }
}
