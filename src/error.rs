//! Error types.
//!
//! Two layers:
//!
//! - [`EstimateError`]: domain failures of the statistics core (empty theory
//!   table, undefined likelihoods, degenerate likelihood curves). These carry
//!   enough structure for callers to decide what is recoverable: a bad ℓ is
//!   excluded, a bad trial is dropped, a bad table is fatal.
//! - [`AppError`]: application-level error with a process exit code, used by
//!   the CLI front-end. Domain errors convert into it with a fixed code map.

/// Domain errors of the likelihood/estimation core.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimateError {
    /// The theory grid has no entries. Fatal; surfaced immediately.
    EmptyTable,
    /// Invalid theory inputs produced an undefined likelihood (non-positive
    /// variance, |ρ| ≥ 1, or every multipole excluded as non-finite).
    Evaluation { detail: String },
    /// Every grid likelihood was zero or non-finite. Fatal for a single
    /// trial, recoverable at the Monte-Carlo level.
    DegenerateLikelihood,
    /// Bad τ-grid configuration (range or step count).
    InvalidGrid { detail: String },
}

impl std::fmt::Display for EstimateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimateError::EmptyTable => write!(f, "Theory curve table is empty."),
            EstimateError::Evaluation { detail } => {
                write!(f, "Likelihood evaluation failed: {detail}")
            }
            EstimateError::DegenerateLikelihood => {
                write!(f, "All grid likelihoods are zero or non-finite.")
            }
            EstimateError::InvalidGrid { detail } => write!(f, "Invalid tau grid: {detail}"),
        }
    }
}

impl std::error::Error for EstimateError {}

impl EstimateError {
    pub fn evaluation(detail: impl Into<String>) -> Self {
        EstimateError::Evaluation {
            detail: detail.into(),
        }
    }

    pub fn invalid_grid(detail: impl Into<String>) -> Self {
        EstimateError::InvalidGrid {
            detail: detail.into(),
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<EstimateError> for AppError {
    fn from(err: EstimateError) -> Self {
        let code = match err {
            EstimateError::EmptyTable => 3,
            EstimateError::InvalidGrid { .. } => 2,
            EstimateError::Evaluation { .. } | EstimateError::DegenerateLikelihood => 4,
        };
        AppError::new(code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
