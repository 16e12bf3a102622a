use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrbitError {
    #[error("Eccentricity {0} is outside the bound-orbit range [0, 1)")]
    InvalidEccentricity(f64),

    #[error("Invalid orbital element {name} = {value}: {reason}")]
    InvalidElement {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Non-finite input sample at index {index}: {value}")]
    NonFiniteSample { index: usize, value: f64 },

    #[error(
        "Kepler equation did not converge at index {index} (M = {mean_anomaly}, e = {eccentricity}, residual = {residual:e})"
    )]
    ConvergenceError {
        index: usize,
        mean_anomaly: f64,
        eccentricity: f64,
        residual: f64,
    },

    #[error("ROOTS finding error: {0}")]
    RootFindingError(#[from] roots::SearchError),

    #[error("Invalid Kepler solver parameter: {0}")]
    InvalidSolverParameter(String),

    #[error("Invalid time grid: {0}")]
    InvalidTimeGrid(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Unable to parse configuration: {0}")]
    ConfigParsing(#[from] serde_json::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl OrbitError {
    /// `true` for inputs outside their physically meaningful range.
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            OrbitError::InvalidEccentricity(_)
                | OrbitError::InvalidElement { .. }
                | OrbitError::NonFiniteSample { .. }
        )
    }

    /// `true` when the Kepler solver missed its tolerance.
    pub fn is_convergence_error(&self) -> bool {
        matches!(self, OrbitError::ConvergenceError { .. })
    }
}

impl PartialEq for OrbitError {
    fn eq(&self, other: &Self) -> bool {
        use OrbitError::*;
        match (self, other) {
            (InvalidEccentricity(a), InvalidEccentricity(b)) => a.to_bits() == b.to_bits(),
            (
                InvalidElement {
                    name: n1,
                    value: v1,
                    reason: r1,
                },
                InvalidElement {
                    name: n2,
                    value: v2,
                    reason: r2,
                },
            ) => n1 == n2 && v1.to_bits() == v2.to_bits() && r1 == r2,
            (
                NonFiniteSample {
                    index: i1,
                    value: v1,
                },
                NonFiniteSample {
                    index: i2,
                    value: v2,
                },
            ) => i1 == i2 && v1.to_bits() == v2.to_bits(),
            (ConvergenceError { index: a, .. }, ConvergenceError { index: b, .. }) => a == b,
            (RootFindingError(a), RootFindingError(b)) => a == b,
            (InvalidSolverParameter(a), InvalidSolverParameter(b)) => a == b,
            (InvalidTimeGrid(a), InvalidTimeGrid(b)) => a == b,
            (InvalidConfiguration(a), InvalidConfiguration(b)) => a == b,

            // Wrapped foreign errors: equal when the variant matches
            (ConfigParsing(_), ConfigParsing(_)) => true,
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
