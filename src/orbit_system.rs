//! # Orbit system: several bodies on a shared time grid
//!
//! [`OrbitSystem`] groups named bodies around the same central mass together with the
//! Kepler solver settings and an optional stop rule. Each body is propagated on its own
//! (no interaction is modelled); the system only guarantees that every trajectory is
//! evaluated on the same samples and stays index-aligned with the others.
//!
//! ## Stop on reversal
//!
//! With a [`ReversalStop`] the whole system is cut at the sample where the reference body
//! first reverses its motion along the chosen axis, e.g. "every 10 days until body 2
//! starts coming back along the line of sight":
//!
//! ```rust
//! use sky_orbits::keplerian_element::OrbitalElements;
//! use sky_orbits::orbit_system::OrbitSystem;
//! use sky_orbits::time_grid::TimeGrid;
//! use sky_orbits::trajectory::Axis;
//!
//! let mut system = OrbitSystem::new();
//! system
//!     .add_body("obj1", OrbitalElements::from_degrees(10.0, 0.02, 70.0, 20.0, -15.0, 10957.5, 1.88).unwrap())
//!     .unwrap();
//! system
//!     .add_body("obj2", OrbitalElements::from_degrees(15.0, 0.3, 85.0, 15.0, 5.0, 20088.75, 8.66).unwrap())
//!     .unwrap();
//! system.stop_on_reversal("obj2", Axis::Z).unwrap();
//!
//! let times = TimeGrid::arange(0.0, 36500.0, 10.0).unwrap();
//! let result = system.propagate(&times).unwrap();
//! assert_eq!(result.get("obj1").unwrap().len(), result.get("obj2").unwrap().len());
//! ```
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    constants::Day,
    kepler::KeplerSolver,
    keplerian_element::OrbitalElements,
    orbit_errors::OrbitError,
    trajectory::{Axis, OrbitTrajectory},
};

fn line_of_sight() -> Axis {
    Axis::Z
}

/// Cut every trajectory where `body` first reverses its motion along `axis`.
///
/// In a configuration file `axis` defaults to the line of sight (`"z"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReversalStop {
    pub body: String,
    #[serde(default = "line_of_sight")]
    pub axis: Axis,
}

#[derive(Debug, Clone, Default)]
pub struct OrbitSystem {
    bodies: Vec<(String, OrbitalElements)>,
    solver: KeplerSolver,
    stop: Option<ReversalStop>,
}

impl OrbitSystem {
    /// Empty system with the default [`KeplerSolver`] and no stop rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty system using `solver` for every body.
    pub fn with_solver(solver: KeplerSolver) -> Self {
        OrbitSystem {
            solver,
            ..Self::default()
        }
    }

    /// Register a body. Bodies keep their insertion order.
    ///
    /// Errors
    /// ------
    /// [`OrbitError::InvalidConfiguration`] if `name` is already taken.
    pub fn add_body(
        &mut self,
        name: impl Into<String>,
        elements: OrbitalElements,
    ) -> Result<&mut Self, OrbitError> {
        let name = name.into();
        if self.body(&name).is_some() {
            return Err(OrbitError::InvalidConfiguration(format!(
                "duplicate body name: {name}"
            )));
        }
        self.bodies.push((name, elements));
        Ok(self)
    }

    /// Enable the stop rule on `body` along `axis`.
    ///
    /// Errors
    /// ------
    /// [`OrbitError::InvalidConfiguration`] if `body` is not registered.
    pub fn stop_on_reversal(&mut self, body: &str, axis: Axis) -> Result<&mut Self, OrbitError> {
        if self.body(body).is_none() {
            return Err(unknown_body(body));
        }
        self.stop = Some(ReversalStop {
            body: body.to_string(),
            axis,
        });
        Ok(self)
    }

    /// Disable the stop rule.
    pub fn clear_stop(&mut self) -> &mut Self {
        self.stop = None;
        self
    }

    pub fn stop(&self) -> Option<&ReversalStop> {
        self.stop.as_ref()
    }

    pub fn solver(&self) -> &KeplerSolver {
        &self.solver
    }

    /// Elements of the body called `name`.
    pub fn body(&self, name: &str) -> Option<&OrbitalElements> {
        self.bodies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, elem)| elem)
    }

    /// Bodies in insertion order.
    pub fn bodies(&self) -> impl Iterator<Item = (&str, &OrbitalElements)> {
        self.bodies.iter().map(|(n, elem)| (n.as_str(), elem))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Evaluate every body on `times`, then apply the stop rule if any.
    ///
    /// Return
    /// ------
    /// * One trajectory per body, in insertion order, all of the same length.
    ///
    /// Errors
    /// ------
    /// * Any error of [`OrbitTrajectory::compute`], for the first failing body.
    /// * [`OrbitError::InvalidConfiguration`] if the stop rule names an unknown body.
    pub fn propagate(&self, times: &[Day]) -> Result<SystemTrajectories, OrbitError> {
        let mut trajectories = self
            .bodies
            .iter()
            .map(|(name, elements)| {
                debug!(body = name.as_str(), "propagating body");
                Ok((
                    name.clone(),
                    OrbitTrajectory::compute(elements, times, &self.solver)?,
                ))
            })
            .collect::<Result<Vec<_>, OrbitError>>()?;

        let mut stop_index = None;
        if let Some(stop) = &self.stop {
            let reference = trajectories
                .iter()
                .find(|(name, _)| *name == stop.body)
                .map(|(_, traj)| traj)
                .ok_or_else(|| unknown_body(&stop.body))?;

            stop_index = reference.reversal_index(stop.axis);
            match stop_index {
                Some(index) => {
                    info!(
                        body = stop.body.as_str(),
                        axis = %stop.axis,
                        index,
                        time = times[index],
                        "stopping system at direction reversal"
                    );
                    for (_, traj) in trajectories.iter_mut() {
                        traj.truncate(index + 1);
                    }
                }
                None => debug!(
                    body = stop.body.as_str(),
                    axis = %stop.axis,
                    "no direction reversal within the time grid"
                ),
            }
        }

        Ok(SystemTrajectories {
            trajectories,
            stop_index,
        })
    }
}

fn unknown_body(name: &str) -> OrbitError {
    OrbitError::InvalidConfiguration(format!("unknown body: {name}"))
}

/// Result of [`OrbitSystem::propagate`].
#[derive(Debug, Clone, PartialEq)]
pub struct SystemTrajectories {
    trajectories: Vec<(String, OrbitTrajectory)>,
    stop_index: Option<usize>,
}

impl SystemTrajectories {
    /// Trajectory of the body called `name`.
    pub fn get(&self, name: &str) -> Option<&OrbitTrajectory> {
        self.trajectories
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, traj)| traj)
    }

    /// `(name, trajectory)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OrbitTrajectory)> {
        self.trajectories.iter().map(|(n, t)| (n.as_str(), t))
    }

    /// Index of the last kept sample when the stop rule fired.
    pub fn stop_index(&self) -> Option<usize> {
        self.stop_index
    }

    /// Number of samples shared by every trajectory.
    pub fn samples(&self) -> usize {
        self.trajectories.first().map_or(0, |(_, t)| t.len())
    }

    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }
}

#[cfg(test)]
mod orbit_system_test {
    use super::*;
    use crate::{
        keplerian_element::test_keplerian_element::body_one,
        time_grid::TimeGrid,
        trajectory::{find_reversal, trajectory_test::body_two},
    };

    fn two_body_system() -> OrbitSystem {
        let mut system = OrbitSystem::new();
        system.add_body("obj1", body_one()).unwrap();
        system.add_body("obj2", body_two()).unwrap();
        system
    }

    #[test]
    fn test_bodies_in_insertion_order() {
        let system = two_body_system();
        let names: Vec<&str> = system.bodies().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["obj1", "obj2"]);
        assert_eq!(system.len(), 2);
        assert_eq!(system.body("obj2"), Some(&body_two()));
        assert!(system.body("obj3").is_none());
    }

    #[test]
    fn test_duplicate_body_rejected() {
        let mut system = two_body_system();
        let err = system.add_body("obj1", body_two()).unwrap_err();
        assert_eq!(
            err,
            OrbitError::InvalidConfiguration("duplicate body name: obj1".into())
        );
    }

    #[test]
    fn test_unknown_stop_body_rejected() {
        let mut system = two_body_system();
        assert!(system.stop_on_reversal("obj3", Axis::Z).is_err());
        assert!(system.stop().is_none());
    }

    #[test]
    fn test_propagate_without_stop() {
        let system = two_body_system();
        let times = TimeGrid::arange(0.0, 36500.0, 10.0).unwrap();
        let result = system.propagate(&times).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.stop_index(), None);
        assert_eq!(result.samples(), times.len());
        for (_, traj) in result.iter() {
            assert_eq!(traj.len(), times.len());
        }
    }

    #[test]
    fn test_propagate_with_stop() {
        let mut system = two_body_system();
        system.stop_on_reversal("obj2", Axis::Z).unwrap();
        let times = TimeGrid::arange(0.0, 36500.0, 10.0).unwrap();
        let result = system.propagate(&times).unwrap();

        let index = result.stop_index().unwrap();
        let obj1 = result.get("obj1").unwrap();
        let obj2 = result.get("obj2").unwrap();
        assert_eq!(obj1.len(), index + 1);
        assert_eq!(obj2.len(), index + 1);
        assert_eq!(obj1.times(), obj2.times());

        // the reference body is monotonic along z up to the cut
        assert!(find_reversal(obj2.z()).is_none());

        // same result as computing the reference alone and scanning it
        let alone = OrbitTrajectory::compute(&body_two(), &times, &KeplerSolver::default()).unwrap();
        assert_eq!(find_reversal(alone.z()), Some(index));
    }

    #[test]
    fn test_reversal_stop_from_json() {
        let stop: ReversalStop = serde_json::from_str(r#"{ "body": "obj2" }"#).unwrap();
        assert_eq!(
            stop,
            ReversalStop {
                body: "obj2".into(),
                axis: Axis::Z
            }
        );

        let stop: ReversalStop = serde_json::from_str(r#"{ "body": "obj1", "axis": "x" }"#).unwrap();
        assert_eq!(stop.axis, Axis::X);

        assert!(serde_json::from_str::<ReversalStop>(r#"{ "body": "obj1", "dir": "x" }"#).is_err());
    }

    #[test]
    fn test_clear_stop() {
        let mut system = two_body_system();
        system.stop_on_reversal("obj2", Axis::Z).unwrap();
        system.clear_stop();
        let times = TimeGrid::arange(0.0, 36500.0, 10.0).unwrap();
        assert_eq!(system.propagate(&times).unwrap().stop_index(), None);
    }

    #[test]
    fn test_propagate_propagates_errors() {
        let system = two_body_system();
        let err = system.propagate(&[0.0, f64::NAN]).unwrap_err();
        assert!(err.is_domain_error());
    }

    #[test]
    fn test_empty_system() {
        let result = OrbitSystem::new().propagate(&[0.0, 1.0]).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.samples(), 0);
    }
}
