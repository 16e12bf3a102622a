//! # Time sample grids
//!
//! A [`TimeGrid`] is the ordered sequence of sample times a trajectory is evaluated on.
//! Times share the unit of the orbital period and periastron epoch (days in practice).
//! Monotonic order is the usual case but is not required.
//!
//! Constructors:
//! * [`TimeGrid::arange`] – regular half-open grid `[start, stop)`, like `numpy.arange`.
//! * [`TimeGrid::from_samples`] – explicit samples.
//! * [`TimeGrid::from_epochs`] – calendar epochs converted to MJD (TT).
use std::ops::Deref;

use hifitime::Epoch;

use crate::{constants::Day, orbit_errors::OrbitError};

/// Hard cap on the number of samples a regular grid may expand to.
pub const MAX_GRID_SAMPLES: usize = 50_000_000;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeGrid {
    samples: Vec<Day>,
}

impl TimeGrid {
    /// Regular grid over the half-open interval `[start, stop)`.
    ///
    /// Sample `k` is `start + k·step` (no accumulated rounding), and the grid holds
    /// `ceil((stop − start) / step)` samples.
    ///
    /// Errors
    /// ------
    /// [`OrbitError::InvalidTimeGrid`] if a bound or the step is not finite, if `step` is
    /// zero or points away from `stop`, or if the grid would exceed [`MAX_GRID_SAMPLES`].
    ///
    /// ```rust
    /// use sky_orbits::time_grid::TimeGrid;
    ///
    /// let grid = TimeGrid::arange(0.0, 36500.0, 10.0).unwrap();
    /// assert_eq!(grid.len(), 3650);
    /// assert_eq!(grid[3649], 36490.0);
    /// ```
    pub fn arange(start: Day, stop: Day, step: Day) -> Result<Self, OrbitError> {
        if !(start.is_finite() && stop.is_finite() && step.is_finite()) {
            return Err(OrbitError::InvalidTimeGrid(
                "start, stop and step must be finite".into(),
            ));
        }
        if step == 0.0 {
            return Err(OrbitError::InvalidTimeGrid("step must be non-zero".into()));
        }

        let span = (stop - start) / step;
        if span < 0.0 {
            return Err(OrbitError::InvalidTimeGrid(format!(
                "step {step} does not lead from {start} to {stop}"
            )));
        }

        let count = span.ceil();
        if count > MAX_GRID_SAMPLES as f64 {
            return Err(OrbitError::InvalidTimeGrid(format!(
                "grid of {count} samples exceeds the limit of {MAX_GRID_SAMPLES}"
            )));
        }

        let samples = (0..count as usize)
            .map(|k| start + k as f64 * step)
            .collect();
        Ok(TimeGrid { samples })
    }

    /// Grid made of explicit samples.
    ///
    /// Errors
    /// ------
    /// [`OrbitError::NonFiniteSample`] for the first NaN or infinite sample.
    pub fn from_samples(samples: Vec<Day>) -> Result<Self, OrbitError> {
        check_finite_samples(&samples)?;
        Ok(TimeGrid { samples })
    }

    /// Grid made of calendar epochs, expressed as Modified Julian Dates in the TT scale.
    pub fn from_epochs(epochs: &[Epoch]) -> Self {
        TimeGrid {
            samples: epochs.iter().map(|e| e.to_mjd_tt_days()).collect(),
        }
    }

    pub fn as_slice(&self) -> &[Day] {
        &self.samples
    }

    pub fn into_vec(self) -> Vec<Day> {
        self.samples
    }
}

/// Check that every sample is finite.
///
/// Return
/// ------
/// * [`OrbitError::NonFiniteSample`] naming the first offending index.
pub fn check_finite_samples(samples: &[f64]) -> Result<(), OrbitError> {
    match samples.iter().position(|t| !t.is_finite()) {
        Some(index) => Err(OrbitError::NonFiniteSample {
            index,
            value: samples[index],
        }),
        None => Ok(()),
    }
}

impl Deref for TimeGrid {
    type Target = [Day];

    fn deref(&self) -> &Self::Target {
        &self.samples
    }
}

impl AsRef<[Day]> for TimeGrid {
    fn as_ref(&self) -> &[Day] {
        &self.samples
    }
}

impl<'a> IntoIterator for &'a TimeGrid {
    type Item = &'a Day;
    type IntoIter = std::slice::Iter<'a, Day>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl TryFrom<Vec<Day>> for TimeGrid {
    type Error = OrbitError;

    fn try_from(samples: Vec<Day>) -> Result<Self, Self::Error> {
        TimeGrid::from_samples(samples)
    }
}

#[cfg(test)]
mod time_grid_test {
    use super::*;
    use approx::assert_relative_eq;
    use hifitime::TimeScale;

    #[test]
    fn test_arange_like_numpy() {
        let grid = TimeGrid::arange(0.0, 365.0 * 100.0, 10.0).unwrap();
        assert_eq!(grid.len(), 3650);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[1], 10.0);
        assert_eq!(grid.last(), Some(&36490.0));

        // stop not on the grid
        let grid = TimeGrid::arange(0.0, 1.0, 0.3).unwrap();
        assert_eq!(grid.len(), 4);
        assert_relative_eq!(grid[3], 0.9, epsilon = 1e-15);

        // descending grid
        let grid = TimeGrid::arange(5.0, 0.0, -2.0).unwrap();
        assert_eq!(grid.as_slice(), &[5.0, 3.0, 1.0]);

        // empty grid
        assert!(TimeGrid::arange(3.0, 3.0, 1.0).unwrap().is_empty());
    }

    #[test]
    fn test_arange_errors() {
        assert!(matches!(
            TimeGrid::arange(0.0, 10.0, 0.0),
            Err(OrbitError::InvalidTimeGrid(_))
        ));
        assert!(matches!(
            TimeGrid::arange(0.0, 10.0, -1.0),
            Err(OrbitError::InvalidTimeGrid(_))
        ));
        assert!(matches!(
            TimeGrid::arange(0.0, f64::INFINITY, 1.0),
            Err(OrbitError::InvalidTimeGrid(_))
        ));
        assert!(matches!(
            TimeGrid::arange(0.0, 1e12, 1e-3),
            Err(OrbitError::InvalidTimeGrid(_))
        ));
    }

    #[test]
    fn test_from_samples() {
        let grid = TimeGrid::from_samples(vec![3.0, 1.0, 2.0]).unwrap();
        assert_eq!(grid.as_slice(), &[3.0, 1.0, 2.0]);
        assert_eq!(grid.clone().into_vec(), vec![3.0, 1.0, 2.0]);

        let err = TimeGrid::try_from(vec![0.0, 1.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, OrbitError::NonFiniteSample { index: 2, .. }));
    }

    #[test]
    fn test_from_epochs() {
        let epochs = [
            Epoch::from_mjd_in_time_scale(51544.5, TimeScale::TT),
            Epoch::from_mjd_in_time_scale(51554.5, TimeScale::TT),
        ];
        let grid = TimeGrid::from_epochs(&epochs);
        assert_eq!(grid.len(), 2);
        assert_relative_eq!(grid[0], 51544.5, epsilon = 1e-9);
        assert_relative_eq!(grid[1] - grid[0], 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_iteration() {
        let grid = TimeGrid::arange(0.0, 3.0, 1.0).unwrap();
        let total: f64 = (&grid).into_iter().sum();
        assert_eq!(total, 3.0);
    }
}
