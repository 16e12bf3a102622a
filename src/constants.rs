//! # Constants and type aliases
//!
//! Numerical constants, unit conversions and the small set of type aliases
//! shared by the anomaly, solver, projection and trajectory modules.

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Days in a Julian year
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

// -------------------------------------------------------------------------------------------------
// Kepler solver defaults
// -------------------------------------------------------------------------------------------------

/// Fraction of the eccentricity added to the mean anomaly for the starting guess
/// `E0 = M + sign(sin M)·k·e` (Danby, 1987).
pub const DANBY_GUESS_FACTOR: f64 = 0.85;

/// Default absolute step tolerance for the Newton–Raphson iteration.
pub const NEWTON_EPS: f64 = 1e2 * f64::EPSILON;

/// Default iteration cap for the Newton–Raphson iteration.
pub const NEWTON_MAX_ITER: usize = 50;

/// Default acceptance threshold on `|M − E + e·sin E|` (radians).
pub const RESIDUAL_TOLERANCE: f64 = 1e-10;

/// Largest residual tolerance a solver may be configured with (radians).
pub const MAX_RESIDUAL_TOLERANCE: f64 = 1e-8;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Time in the unit shared by the period and the periastron epoch (days in practice)
pub type Day = f64;
