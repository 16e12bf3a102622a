//! Sky positions of bodies on fixed Keplerian orbits around a central mass.
//!
//! Pipeline for one body, per time sample:
//! time → mean anomaly ([`anomaly`]) → eccentric anomaly ([`kepler`]) → true anomaly
//! ([`anomaly`]) → Cartesian position ([`projection`]). [`trajectory`] runs it over a
//! whole time grid, [`orbit_system`] over several bodies, [`config`] describes a run as JSON.
//!
//! ```rust
//! use sky_orbits::config::SystemConfig;
//!
//! let config = SystemConfig::two_body_default();
//! let system = config.build_system().unwrap();
//! let result = system.propagate(&config.time_grid().unwrap()).unwrap();
//! for (name, traj) in result.iter() {
//!     assert!(!traj.is_empty(), "{name}");
//! }
//! ```
pub mod anomaly;
pub mod config;
pub mod constants;
pub mod kepler;
pub mod keplerian_element;
pub mod orbit_errors;
pub mod orbit_system;
pub mod projection;
pub mod time_grid;
pub mod trajectory;

pub use kepler::{solve_kepler, KeplerSolver};
pub use keplerian_element::OrbitalElements;
pub use orbit_errors::OrbitError;
pub use orbit_system::{OrbitSystem, SystemTrajectories};
pub use trajectory::{compute_trajectory, Axis, OrbitTrajectory};
