use thiserror::Error;
use twine_solvers::equation::bisection;
use uom::si::f64::{Length, MomentOfInertia};

use crate::support::{constraint::ConstraintError, ode::IntegrationError};

/// Errors in the inputs to a simulation, detected before any integration work.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// A flat parameter list had the wrong number of entries.
    #[error("expected {expected} parameters, found {found}")]
    ParameterCount {
        /// Required number of parameters.
        expected: usize,

        /// Number of parameters supplied.
        found: usize,
    },

    /// A parameter violates its sign constraint.
    #[error("invalid parameter `{name}`")]
    InvalidParameter {
        /// Field name of the offending parameter.
        name: &'static str,

        /// The violated constraint.
        #[source]
        source: ConstraintError,
    },

    /// A parameter is infinite or `NaN`.
    #[error("parameter `{name}` is not finite")]
    NonFiniteParameter {
        /// Field name of the offending parameter.
        name: &'static str,
    },

    /// The pivot-to-magnet distance can vanish for some angle.
    ///
    /// Requires `length > 0` and `length + offset > 0`, and a nonzero offset
    /// whenever the magnetic interaction is active.
    #[error("degenerate geometry: length={length:?}, offset={offset:?}")]
    DegenerateGeometry {
        /// Pendulum length.
        length: Length,

        /// Equilibrium separation offset.
        offset: Length,
    },

    /// The time grid has no points.
    #[error("time grid is empty")]
    EmptyTimeGrid,

    /// The time grid does not start at zero.
    #[error("time grid must start at 0, found {first}")]
    TimeGridStart {
        /// The first grid value.
        first: f64,
    },

    /// The time grid is not strictly increasing.
    #[error("time grid is not strictly increasing at index {index}")]
    NonIncreasingTimeGrid {
        /// Index of the first point not greater than its predecessor.
        index: usize,
    },

    /// A time grid value is infinite or `NaN`.
    #[error("time grid value at index {index} is not finite")]
    NonFiniteTime {
        /// Index of the offending value.
        index: usize,
    },

    /// The initial angle or angular velocity is infinite or `NaN`.
    #[error("initial state is not finite")]
    NonFiniteInitialState,
}

/// The equation of motion cannot be solved for the angular acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DerivationError {
    /// The coefficient of the angular acceleration is zero or not finite.
    #[error("no unique angular acceleration: effective inertia={coefficient:?}")]
    NoUniqueSolution {
        /// Effective inertia about the pivot, `I_cm + M·r_cm²`.
        coefficient: MomentOfInertia,
    },
}

/// Errors that can occur while simulating a pendulum trajectory.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The inputs were rejected before integration started.
    #[error("invalid simulation input")]
    Configuration(#[from] ConfigurationError),

    /// The equation of motion could not be resolved for these parameters.
    #[error("equation of motion could not be resolved")]
    Derivation(#[from] DerivationError),

    /// The ODE integrator failed.
    #[error("integration failed")]
    Integration(#[from] IntegrationError),
}

/// Errors that can occur while analyzing a trajectory.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The bisection solver encountered an error.
    #[error("bisection solver error")]
    Bisection(#[from] bisection::Error),

    /// A zero crossing was bracketed but not resolved within the iteration limit.
    #[error("zero crossing after t={start} did not converge: residual={residual}")]
    Unconverged {
        /// Start of the bracketing sample interval, in seconds.
        start: f64,

        /// Best angle residual achieved, in degrees.
        residual: f64,

        /// Iteration count performed by the solver.
        iters: usize,
    },
}
