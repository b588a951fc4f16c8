//! Base-excited pendulum with magnetic dipole interaction.
//!
//! A rigid pendulum swings about a pivot driven horizontally at a fixed
//! frequency. A small magnet on the pendulum interacts with a fixed magnet
//! below the pivot, and the motion is resisted by viscous, quadratic, and
//! Coulomb damping.
//!
//! The closed-form equation of motion lives in [`EquationOfMotion`]; a
//! [`Simulator`] integrates it over a [`TimeGrid`] with the crate's
//! stiffness-switching ODE solver and returns a [`Trajectory`] in degrees.

mod analysis;
mod dynamics;
mod equation;
mod error;
mod initial_state;
mod parameters;
mod simulate;
mod time_grid;
mod trajectory;

pub use analysis::{
    AnalysisConfig, Peak, oscillation_period, peak_envelope, small_angle_period, zero_crossings,
    zero_crossings_with,
};
pub use dynamics::{DynamicsInput, PendulumDynamics, PendulumMotion, PendulumState, StateRate};
pub use equation::{Coefficients, DEFAULT_REGULARIZATION, EquationOfMotion};
pub use error::{AnalysisError, ConfigurationError, DerivationError, SimulationError};
pub use initial_state::InitialState;
pub use parameters::{PARAMETER_COUNT, PARAMETER_NAMES, PendulumParameters};
pub use simulate::{Simulator, simulate, simulate_raw};
pub use time_grid::TimeGrid;
pub use trajectory::{Sample, Trajectory};
