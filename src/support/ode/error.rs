use thiserror::Error;

/// Errors that can occur while integrating an ODE system.
///
/// None of these are retried; the integration stops at the first failure.
#[derive(Debug, Error)]
pub enum IntegrationError {
    /// The output grid is empty, non-finite, or not strictly increasing.
    #[error("invalid output grid at index {index}")]
    InvalidOutputGrid {
        /// Index of the first offending grid point.
        index: usize,
    },

    /// The state or its derivative became non-finite.
    #[error("non-finite state or derivative in the step from t={time}")]
    NonFinite {
        /// Start time of the step in which the non-finite value appeared.
        time: f64,
    },

    /// The step size fell below the resolution of the time variable.
    #[error("step size {step:e} too small at t={time}")]
    StepSizeTooSmall {
        /// Time at which the step size collapsed.
        time: f64,

        /// The rejected step size.
        step: f64,
    },

    /// Too many step attempts were needed to reach the next output sample.
    #[error("exceeded {steps} steps before the next output sample at t={time}")]
    MaxSteps {
        /// Time reached when the limit was hit.
        time: f64,

        /// The step limit that was exceeded.
        steps: usize,
    },

    /// The model returned an error.
    #[error("model failed in the step from t={time}")]
    Model {
        /// Start time of the step being attempted.
        time: f64,

        /// Underlying model error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The ODE problem could not extract a state, form a derivative, or build an input.
    #[error("ODE problem failed in the step from t={time}")]
    Problem {
        /// Start time of the step being attempted.
        time: f64,

        /// Underlying problem error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl IntegrationError {
    /// Returns the time at which the failure occurred, if there is one.
    #[must_use]
    pub fn time(&self) -> Option<f64> {
        match self {
            Self::InvalidOutputGrid { .. } => None,
            Self::NonFinite { time }
            | Self::StepSizeTooSmall { time, .. }
            | Self::MaxSteps { time, .. }
            | Self::Model { time, .. }
            | Self::Problem { time, .. } => Some(*time),
        }
    }
}
