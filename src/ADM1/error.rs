use thiserror::Error;

/// Errors raised by the ADM1 simulator.
///
/// Configuration problems (missing parameters, bad time units, inconsistent reactor
/// data) are detected before the first time step. Numerical trouble inside the Newton
/// stage is not an error: it is logged and counted in the final summary.
#[derive(Debug, Error)]
pub enum Adm1Error {
    #[error("Missing parameter: {0}")]
    MissingParameter(String),
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error("Unsupported time unit: '{0}' (expected 'Day(s)', 'Hour(s)' or '15 Minute(s)')")]
    UnsupportedTimeUnit(String),
    #[error("Integration failed: {0}")]
    Integration(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Adm1Error {
    /// true for every error that stops the simulation before stepping
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Adm1Error::MissingParameter(_)
                | Adm1Error::Configuration(_)
                | Adm1Error::UnsupportedTimeUnit(_)
        )
    }
}
