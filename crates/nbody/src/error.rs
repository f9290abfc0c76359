//! Error types for the nbody crate.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NbodyError {
    /// Lifecycle or ordering violation, e.g. adding a particle after the
    /// variational particles were seeded.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Two real particles occupy exactly the same position.
    #[error("Singular geometry: particles {i} and {j} are coincident")]
    SingularGeometry { i: usize, j: usize },

    /// The adaptive integrator cannot meet its tolerance at any usable step.
    #[error("Step size collapsed to {dt:e} at t = {time}")]
    StepSizeCollapse { time: f64, dt: f64 },

    /// Malformed setup, rejected before any step executes.
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl NbodyError {
    /// Fatal errors terminate the run; everything else is a setup mistake the
    /// caller can fix and retry.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            NbodyError::SingularGeometry { .. } | NbodyError::StepSizeCollapse { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, NbodyError>;
