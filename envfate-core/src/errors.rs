use thiserror::Error;

/// Error type for invalid scenario configuration and run-time aborts.
///
/// Numerical degeneracies (a zero volume, a dried-up flow path) are not
/// errors: partitioning and the process calculators resolve them to zero.
/// Everything here is either a setup defect that must be caught before the
/// first simulated day, or an integrator-level instability that aborts the
/// run.
#[derive(Error, Debug)]
pub enum FateError {
    #[error("{0}")]
    Config(String),
    #[error("Requested window {requested} is outside the forcing record {available}")]
    DateOutOfRange { requested: String, available: String },
    #[error("Forcing series have inconsistent lengths: {0}")]
    SeriesLengthMismatch(String),
    #[error("Non-finite derivative on day {day} in compartment {compartment}")]
    NonFiniteDerivative { day: usize, compartment: String },
    #[error("State for compartment {compartment} fell below -{tolerance} on day {day}: {value}")]
    NegativeState {
        day: usize,
        compartment: String,
        value: f64,
        tolerance: f64,
    },
}

/// Convenience type for `Result<T, FateError>`.
pub type FateResult<T> = Result<T, FateError>;
