use std::convert::Infallible;

use twine_core::{Model, OdeProblem, StepIntegrable};

use super::{Coefficients, EquationOfMotion, PendulumParameters, SimulationError};

/// Angle and angular velocity in SI units (rad, rad/s).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendulumState {
    pub angle: f64,
    pub angular_velocity: f64,
}

/// Time derivative of a [`PendulumState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateRate {
    /// `dθ/dt`, rad/s.
    pub angular_velocity: f64,

    /// `dω/dt`, rad/s².
    pub angular_acceleration: f64,
}

impl StepIntegrable<f64> for PendulumState {
    type Derivative = StateRate;

    fn step(&self, derivative: StateRate, delta: f64) -> Self {
        Self {
            angle: self.angle + derivative.angular_velocity * delta,
            angular_velocity: self.angular_velocity + derivative.angular_acceleration * delta,
        }
    }
}

impl From<PendulumState> for [f64; 2] {
    fn from(state: PendulumState) -> Self {
        [state.angle, state.angular_velocity]
    }
}

impl From<[f64; 2]> for StateRate {
    fn from([angular_velocity, angular_acceleration]: [f64; 2]) -> Self {
        Self {
            angular_velocity,
            angular_acceleration,
        }
    }
}

impl From<StateRate> for [f64; 2] {
    fn from(rate: StateRate) -> Self {
        [rate.angular_velocity, rate.angular_acceleration]
    }
}

/// Input to [`PendulumDynamics`]: the state at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicsInput {
    /// Time since release, s.
    pub time: f64,

    pub state: PendulumState,
}

/// State-space vector field `[θ, ω] ↦ [ω, θ̈]` for one parameter set.
///
/// Paired with [`PendulumMotion`], this is the system the ODE integrator
/// advances.
#[derive(Debug, Clone, Copy)]
pub struct PendulumDynamics<'a> {
    equation: &'a EquationOfMotion,
    coefficients: Coefficients,
}

impl<'a> PendulumDynamics<'a> {
    /// Validates `parameters` and resolves them against `equation`.
    ///
    /// # Errors
    ///
    /// Returns a [`SimulationError`] if the parameters are invalid or the
    /// equation has no unique solution for them.
    pub fn new(
        equation: &'a EquationOfMotion,
        parameters: &PendulumParameters,
    ) -> Result<Self, SimulationError> {
        parameters.validate()?;
        let coefficients = equation.resolve(parameters)?;
        Ok(Self {
            equation,
            coefficients,
        })
    }

    /// The resolved coefficients.
    #[must_use]
    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }
}

impl Model for PendulumDynamics<'_> {
    type Input = DynamicsInput;
    type Output = StateRate;
    type Error = Infallible;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let rate =
            self.equation
                .state_derivative(input.time, input.state.into(), &self.coefficients);
        Ok(rate.into())
    }
}

/// Free-swinging pendulum motion as an ODE problem over [`PendulumDynamics`].
///
/// The state is the dynamics input's [`PendulumState`] and its derivative is
/// the model output. Stepping by `dt` advances the input time by `dt`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PendulumMotion;

impl OdeProblem for PendulumMotion {
    type Input = DynamicsInput;
    type Output = StateRate;
    type Delta = f64;
    type State = PendulumState;
    type Error = Infallible;

    fn state(&self, input: &Self::Input) -> Result<Self::State, Self::Error> {
        Ok(input.state)
    }

    fn derivative(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<StateRate, Self::Error> {
        Ok(*output)
    }

    fn build_input(
        &self,
        base: &Self::Input,
        state: &Self::State,
        delta: &f64,
    ) -> Result<Self::Input, Self::Error> {
        Ok(DynamicsInput {
            time: base.time + delta,
            state: *state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use twine_solvers::transient::euler;

    use crate::models::mechanical::pendulum::core::ConfigurationError;

    fn input(time: f64, angle: f64, angular_velocity: f64) -> DynamicsInput {
        DynamicsInput {
            time,
            state: PendulumState {
                angle,
                angular_velocity,
            },
        }
    }

    #[test]
    fn first_component_is_angular_velocity() {
        let dynamics =
            PendulumDynamics::new(EquationOfMotion::shared(), &PendulumParameters::default())
                .unwrap();

        let rate = dynamics.call(&input(0.0, 0.4, -1.7)).unwrap();

        assert_eq!(rate.angular_velocity, -1.7);
        assert!(rate.angular_acceleration.is_finite());
    }

    #[test]
    fn matches_small_oscillation_stiffness() {
        let mut parameters = PendulumParameters::default();
        parameters.dipole_moment = crate::support::units::from_si(0.0);

        let dynamics = PendulumDynamics::new(EquationOfMotion::shared(), &parameters).unwrap();
        let c = dynamics.coefficients();

        // Damping vanishes at rest and the base is still at t = 0.
        let rate = dynamics.call(&input(0.0, 1e-6, 0.0)).unwrap();
        let expected =
            -c.restoring_stiffness().value * 1e-6f64.sin() / c.effective_inertia().value;
        assert_relative_eq!(rate.angular_acceleration, expected, max_relative = 1e-12);
    }

    #[test]
    fn rejects_invalid_parameters() {
        let mut parameters = PendulumParameters::default();
        parameters.length = -parameters.length;

        assert!(matches!(
            PendulumDynamics::new(EquationOfMotion::shared(), &parameters),
            Err(SimulationError::Configuration(
                ConfigurationError::DegenerateGeometry { .. }
            ))
        ));
    }

    #[test]
    fn motion_steps_state_and_time() {
        let base = input(1.0, 0.5, -2.0);
        let rate = StateRate {
            angular_velocity: -2.0,
            angular_acceleration: 4.0,
        };

        let stepped = base.state.step(rate, 0.25);
        let next = PendulumMotion.build_input(&base, &stepped, &0.25).unwrap();

        assert_eq!(next, input(1.25, 0.0, -1.0));
        assert_eq!(PendulumMotion.state(&next).unwrap(), stepped);
        assert_eq!(PendulumMotion.derivative(&next, &rate).unwrap(), rate);
    }

    #[test]
    fn fixed_step_euler_follows_the_same_problem() {
        // Twine's fixed-step Euler solver drives the same model and problem.
        // Coulomb friction engages once the pendulum moves, so the early
        // velocity only roughly follows the release acceleration.
        let dynamics =
            PendulumDynamics::new(EquationOfMotion::shared(), &PendulumParameters::default())
                .unwrap();
        let start = input(0.0, 0.3, 0.0);
        let initial_rate = dynamics.call(&start).unwrap();

        let solution =
            euler::solve_unobserved(&dynamics, &PendulumMotion, start, 1e-5, 100).unwrap();
        let last = solution.history.last().unwrap().input;

        assert_relative_eq!(last.time, 1e-3, epsilon = 1e-12);
        assert_relative_eq!(
            last.state.angular_velocity,
            initial_rate.angular_acceleration * 1e-3,
            max_relative = 0.1
        );
    }
}
