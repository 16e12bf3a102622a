//! # Keplerian orbital elements
//!
//! This module defines [`OrbitalElements`], the **classical element set** that fully
//! describes one body on a fixed, bound Keplerian orbit around a central mass.
//!
//! ## Elements
//!
//! 1. **a** – Semi-major axis (length unit of the output positions, AU in practice)
//! 2. **e** – Eccentricity (unitless, `0 ≤ e < 1`)
//! 3. **i** – Inclination (radians)
//! 4. **ω** – Argument of periastron (radians)
//! 5. **Ω** – Longitude of ascending node (radians)
//! 6. **T** – Orbital period (time unit, days in practice)
//! 7. **T0** – Epoch of periastron passage (same time unit as `T`)
//!
//! The period is supplied directly: no mass is involved and Kepler's third law is
//! never used to derive it.
//!
//! ## Validation
//!
//! Every constructor (including deserialization) checks the elements against their
//! physically meaningful range and returns an [`OrbitError`] domain error otherwise.
//! Once built, an [`OrbitalElements`] value is immutable.
//!
//! ## Example
//!
//! ```rust
//! use sky_orbits::keplerian_element::OrbitalElements;
//!
//! // a, e, i, ω, Ω in degrees, T and T0 in days
//! let elem = OrbitalElements::from_degrees(10.0, 0.02, 70.0, 20.0, -15.0, 10957.5, 1.88).unwrap();
//! assert_eq!(elem.eccentricity(), 0.02);
//! ```
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{Day, Degree, Radian, DPI, RADEG},
    orbit_errors::OrbitError,
};

/// Keplerian orbital elements of one body (bound orbit, fixed in time).
///
/// Units
/// -----
/// * `semi_major_axis`: length (AU in practice), `> 0`.
/// * `eccentricity`: unitless, `0 ≤ e < 1`.
/// * `inclination`: radians.
/// * `periapsis_argument`: radians (ω).
/// * `ascending_node_longitude`: radians (Ω).
/// * `period`: time (days in practice), `> 0`.
/// * `periastron_epoch`: time of periastron passage, same unit as `period`.
///
/// See also
/// --------
/// * [`OrbitalElements::new`] – Validating constructor (radians).
/// * [`OrbitalElements::from_degrees`] – Validating constructor (degrees).
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(try_from = "UncheckedElements")]
pub struct OrbitalElements {
    semi_major_axis: f64,
    eccentricity: f64,
    inclination: Radian,
    periapsis_argument: Radian,
    ascending_node_longitude: Radian,
    period: Day,
    periastron_epoch: Day,
}

/// Field-for-field mirror of [`OrbitalElements`], deserialized before validation.
#[derive(Deserialize)]
struct UncheckedElements {
    semi_major_axis: f64,
    eccentricity: f64,
    inclination: Radian,
    periapsis_argument: Radian,
    ascending_node_longitude: Radian,
    period: Day,
    periastron_epoch: Day,
}

impl TryFrom<UncheckedElements> for OrbitalElements {
    type Error = OrbitError;

    fn try_from(raw: UncheckedElements) -> Result<Self, Self::Error> {
        OrbitalElements::new(
            raw.semi_major_axis,
            raw.eccentricity,
            raw.inclination,
            raw.periapsis_argument,
            raw.ascending_node_longitude,
            raw.period,
            raw.periastron_epoch,
        )
    }
}

/// Check that `e` is a bound-orbit eccentricity.
///
/// Return
/// ------
/// * `Ok(())` if `0 ≤ e < 1`, [`OrbitError::InvalidEccentricity`] otherwise (NaN included).
pub fn check_eccentricity(e: f64) -> Result<(), OrbitError> {
    if (0.0..1.0).contains(&e) {
        Ok(())
    } else {
        Err(OrbitError::InvalidEccentricity(e))
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<(), OrbitError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(OrbitError::InvalidElement {
            name,
            value,
            reason: "must be finite",
        })
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), OrbitError> {
    check_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(OrbitError::InvalidElement {
            name,
            value,
            reason: "must be strictly positive",
        })
    }
}

impl OrbitalElements {
    /// Build a validated element set, angles in radians.
    ///
    /// Arguments
    /// ---------
    /// * `semi_major_axis` – `a > 0`.
    /// * `eccentricity` – `0 ≤ e < 1`.
    /// * `inclination` – `i` (rad).
    /// * `periapsis_argument` – `ω` (rad).
    /// * `ascending_node_longitude` – `Ω` (rad).
    /// * `period` – `T > 0`.
    /// * `periastron_epoch` – `T0`.
    ///
    /// Return
    /// ------
    /// * The element set, or a domain error naming the first offending element.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: Radian,
        periapsis_argument: Radian,
        ascending_node_longitude: Radian,
        period: Day,
        periastron_epoch: Day,
    ) -> Result<Self, OrbitError> {
        check_positive("semi_major_axis", semi_major_axis)?;
        check_eccentricity(eccentricity)?;
        check_finite("inclination", inclination)?;
        check_finite("periapsis_argument", periapsis_argument)?;
        check_finite("ascending_node_longitude", ascending_node_longitude)?;
        check_positive("period", period)?;
        check_finite("periastron_epoch", periastron_epoch)?;

        Ok(Self {
            semi_major_axis,
            eccentricity,
            inclination,
            periapsis_argument,
            ascending_node_longitude,
            period,
            periastron_epoch,
        })
    }

    /// Same as [`OrbitalElements::new`] with the three angles given in degrees.
    #[allow(clippy::too_many_arguments)]
    pub fn from_degrees(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: Degree,
        periapsis_argument: Degree,
        ascending_node_longitude: Degree,
        period: Day,
        periastron_epoch: Day,
    ) -> Result<Self, OrbitError> {
        Self::new(
            semi_major_axis,
            eccentricity,
            inclination * RADEG,
            periapsis_argument * RADEG,
            ascending_node_longitude * RADEG,
            period,
            periastron_epoch,
        )
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn inclination(&self) -> Radian {
        self.inclination
    }

    pub fn periapsis_argument(&self) -> Radian {
        self.periapsis_argument
    }

    pub fn ascending_node_longitude(&self) -> Radian {
        self.ascending_node_longitude
    }

    pub fn period(&self) -> Day {
        self.period
    }

    pub fn periastron_epoch(&self) -> Day {
        self.periastron_epoch
    }

    /// Mean motion `n = 2π / T` (rad per time unit).
    pub fn mean_motion(&self) -> f64 {
        DPI / self.period
    }

    /// Periastron distance `q = a(1 − e)`.
    pub fn periastron_distance(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// Apoastron distance `Q = a(1 + e)`.
    pub fn apoastron_distance(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }
}

impl fmt::Display for OrbitalElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rad_to_deg = 1.0 / RADEG;
        writeln!(f, "Keplerian Elements")?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.6}",
            self.semi_major_axis
        )?;
        writeln!(
            f,
            "  e   (eccentricity)          = {:.6}",
            self.eccentricity
        )?;
        writeln!(
            f,
            "  i   (inclination)           = {:.6} rad ({:.6}°)",
            self.inclination,
            self.inclination * rad_to_deg
        )?;
        writeln!(
            f,
            "  ω   (argument of periastron)= {:.6} rad ({:.6}°)",
            self.periapsis_argument,
            self.periapsis_argument * rad_to_deg
        )?;
        writeln!(
            f,
            "  Ω   (longitude of node)     = {:.6} rad ({:.6}°)",
            self.ascending_node_longitude,
            self.ascending_node_longitude * rad_to_deg
        )?;
        writeln!(f, "  T   (period)                = {:.6}", self.period)?;
        writeln!(
            f,
            "  T0  (periastron epoch)      = {:.6}",
            self.periastron_epoch
        )
    }
}
