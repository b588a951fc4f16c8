//! Base-excited magnetic pendulum.
//!
//! This module provides [`twine_core::Model`] implementations for the
//! pendulum. The computational core is in the internal `core` module; its
//! public types are re-exported here.
//!
//! - [`PendulumDynamics`]: the state-space vector field `[θ, ω] ↦ [ω, θ̈]`,
//!   integrated as the [`PendulumMotion`] ODE problem.
//! - [`PendulumSimulation`]: a full simulation from a [`SimulationInput`] to a [`Trajectory`].
//!
//! # Example
//!
//! ```
//! use pendulum_models::models::mechanical::pendulum::{
//!     InitialState, PendulumParameters, TimeGrid, simulate,
//! };
//! use uom::si::{f64::Time, time::second};
//!
//! let grid = TimeGrid::linspace(Time::new::<second>(2.0), 201)?;
//! let trajectory = simulate(
//!     &grid,
//!     InitialState::from_radians(0.5, 0.0),
//!     &PendulumParameters::default(),
//! )?;
//!
//! assert_eq!(trajectory.len(), 201);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod core;

pub use self::core::{
    AnalysisConfig, AnalysisError, Coefficients, ConfigurationError, DEFAULT_REGULARIZATION,
    DerivationError, DynamicsInput, EquationOfMotion, InitialState, PARAMETER_COUNT,
    PARAMETER_NAMES, Peak, PendulumDynamics, PendulumMotion, PendulumParameters, PendulumState,
    Sample, SimulationError, Simulator, StateRate, TimeGrid, Trajectory, oscillation_period,
    peak_envelope, simulate, simulate_raw, small_angle_period, zero_crossings,
    zero_crossings_with,
};

use twine_core::Model;

/// Everything needed to run one simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationInput {
    /// Output sample times.
    pub time_grid: TimeGrid,

    /// State at `t = 0`.
    pub initial_state: InitialState,

    /// Physical constants.
    pub parameters: PendulumParameters,
}

/// Simulates a pendulum trajectory.
///
/// A thin [`Model`] wrapper around [`Simulator`].
#[derive(Debug, Clone, Copy)]
pub struct PendulumSimulation<'a> {
    simulator: Simulator<'a>,
}

impl Default for PendulumSimulation<'static> {
    fn default() -> Self {
        Self::new(Simulator::default())
    }
}

impl<'a> PendulumSimulation<'a> {
    /// Creates a model that runs `simulator`.
    #[must_use]
    pub fn new(simulator: Simulator<'a>) -> Self {
        Self { simulator }
    }
}

impl Model for PendulumSimulation<'_> {
    type Input = SimulationInput;
    type Output = Trajectory;
    type Error = SimulationError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.simulator
            .simulate(&input.time_grid, input.initial_state, &input.parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{f64::Time, time::second};

    #[test]
    fn model_matches_direct_call() {
        let input = SimulationInput {
            time_grid: TimeGrid::linspace(Time::new::<second>(1.5), 151).unwrap(),
            initial_state: InitialState::from_radians(1.0, 0.0),
            parameters: PendulumParameters::default(),
        };

        let via_model = PendulumSimulation::default().call(&input).unwrap();
        let direct = simulate(&input.time_grid, input.initial_state, &input.parameters).unwrap();
        assert_eq!(via_model, direct);
    }

    #[test]
    fn model_surfaces_configuration_errors() {
        let mut parameters = PendulumParameters::default();
        parameters.magnet_offset = -parameters.length;

        let input = SimulationInput {
            time_grid: TimeGrid::new(vec![0.0, 0.1]).unwrap(),
            initial_state: InitialState::from_radians(0.1, 0.0),
            parameters,
        };

        assert!(matches!(
            PendulumSimulation::default().call(&input),
            Err(SimulationError::Configuration(
                ConfigurationError::DegenerateGeometry { .. }
            ))
        ));
    }
}
