use tracing::debug;
use uom::si::time::second;

use crate::support::ode::{self, SolverConfig};

use super::{
    DynamicsInput, EquationOfMotion, InitialState, PendulumDynamics, PendulumMotion,
    PendulumParameters, SimulationError, TimeGrid, Trajectory,
};

/// Integrates the pendulum equation of motion over a time grid.
///
/// Holds the equation to evaluate and the integrator settings, so one
/// simulator can run many scenarios.
#[derive(Debug, Clone, Copy)]
pub struct Simulator<'a> {
    equation: &'a EquationOfMotion,
    config: SolverConfig,
}

impl Default for Simulator<'static> {
    fn default() -> Self {
        Self::new(EquationOfMotion::shared(), SolverConfig::default())
    }
}

impl<'a> Simulator<'a> {
    /// Creates a simulator for `equation` using the given solver settings.
    #[must_use]
    pub fn new(equation: &'a EquationOfMotion, config: SolverConfig) -> Self {
        Self { equation, config }
    }

    /// The solver settings.
    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Simulates the pendulum from `initial_state` and samples it on `time_grid`.
    ///
    /// # Errors
    ///
    /// Returns a [`SimulationError`] if the inputs are invalid or the
    /// integration fails. Input errors are reported before any integration
    /// work happens.
    pub fn simulate(
        &self,
        time_grid: &TimeGrid,
        initial_state: InitialState,
        parameters: &PendulumParameters,
    ) -> Result<Trajectory, SimulationError> {
        let state = initial_state.to_pendulum_state()?;
        let dynamics = PendulumDynamics::new(self.equation, parameters)?;

        debug!(
            samples = time_grid.sample_count(),
            end_time = time_grid.end().get::<second>(),
            "starting pendulum simulation"
        );

        // Grids always start at the release time, t = 0.
        let initial = DynamicsInput { time: 0.0, state };
        let solution = ode::integrate::<_, _, 2>(
            &dynamics,
            &PendulumMotion,
            initial,
            time_grid.as_slice(),
            &self.config,
        )?;
        let states: Vec<[f64; 2]> = solution
            .samples
            .iter()
            .map(|snapshot| snapshot.input.state.into())
            .collect();

        let stats = solution.stats;
        debug!(
            accepted = stats.accepted_steps,
            rejected = stats.rejected_steps,
            fn_evals = stats.fn_evals,
            jacobians = stats.jacobian_evals,
            stiff_steps = stats.stiff_steps,
            switches = stats.method_switches,
            "pendulum simulation complete"
        );

        Ok(Trajectory::from_radians(
            time_grid.as_slice(),
            &states,
            stats,
        ))
    }
}

/// Simulates the pendulum with the shared equation and default solver settings.
///
/// # Errors
///
/// Returns a [`SimulationError`] if the inputs are invalid or the integration fails.
pub fn simulate(
    time_grid: &TimeGrid,
    initial_state: InitialState,
    parameters: &PendulumParameters,
) -> Result<Trajectory, SimulationError> {
    Simulator::default().simulate(time_grid, initial_state, parameters)
}

/// Simulates the pendulum from flat arrays.
///
/// `initial_state` is `[θ0, ω0]` in radians and rad/s, and `parameters`
/// holds the 13 SI magnitudes in the order of
/// [`PARAMETER_NAMES`](super::PARAMETER_NAMES).
///
/// # Errors
///
/// Returns a [`SimulationError`] if the parameter count is wrong, any input
/// is invalid, or the integration fails.
pub fn simulate_raw(
    time_grid: &[f64],
    initial_state: [f64; 2],
    parameters: &[f64],
) -> Result<Trajectory, SimulationError> {
    let parameters = PendulumParameters::try_from_si_slice(parameters)?;
    let time_grid = TimeGrid::new(time_grid.to_vec())?;
    let [angle, angular_velocity] = initial_state;

    simulate(
        &time_grid,
        InitialState::from_radians(angle, angular_velocity),
        &parameters,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{f64::Time, time::second};

    use crate::{
        models::mechanical::pendulum::core::ConfigurationError,
        support::{constraint::StrictlyPositive, ode::IntegrationError},
    };

    fn short_grid() -> TimeGrid {
        TimeGrid::linspace(Time::new::<second>(1.0), 101).unwrap()
    }

    #[test]
    fn output_matches_grid_length() {
        let trajectory = simulate(
            &short_grid(),
            InitialState::from_radians(0.3, 0.0),
            &PendulumParameters::default(),
        )
        .unwrap();

        assert_eq!(trajectory.len(), 101);
        assert_eq!(trajectory.angle().len(), 101);
        assert_eq!(trajectory.angular_velocity().len(), 101);
        assert_eq!(trajectory.time(), short_grid().as_slice());
        assert_relative_eq!(trajectory.angle()[0], 0.3_f64.to_degrees());
    }

    #[test]
    fn injected_equation_is_used() {
        // A huge regularization weakens Coulomb friction near rest, so the
        // pendulum swings further than with the default.
        let soft = EquationOfMotion::with_regularization(StrictlyPositive::new(10.0).unwrap());
        let grid = short_grid();
        let initial = InitialState::from_radians(0.5, 0.0);
        let parameters = PendulumParameters::default();

        let default = simulate(&grid, initial, &parameters).unwrap();
        let softened = Simulator::new(&soft, SolverConfig::default())
            .simulate(&grid, initial, &parameters)
            .unwrap();

        assert_ne!(default, softened);
    }

    #[test]
    fn raw_entry_point_checks_arity() {
        let err = simulate_raw(&[0.0, 0.1], [0.1, 0.0], &[1.0; 12]).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Configuration(ConfigurationError::ParameterCount {
                expected: 13,
                found: 12
            })
        ));
    }

    #[test]
    fn raw_entry_point_checks_grid() {
        let parameters = PendulumParameters::default().to_si_array();
        let err = simulate_raw(&[0.5, 1.0], [0.1, 0.0], &parameters).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Configuration(ConfigurationError::TimeGridStart { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_initial_state() {
        let err = simulate(
            &short_grid(),
            InitialState::from_radians(f64::NAN, 0.0),
            &PendulumParameters::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Configuration(ConfigurationError::NonFiniteInitialState)
        ));
    }

    #[test]
    fn integration_failure_reports_time() {
        let simulator = Simulator::new(
            EquationOfMotion::shared(),
            SolverConfig {
                max_steps_per_sample: 2,
                ..SolverConfig::default()
            },
        );
        let err = simulator
            .simulate(
                &TimeGrid::new(vec![0.0, 10.0]).unwrap(),
                InitialState::from_radians(2.0, 0.0),
                &PendulumParameters::default(),
            )
            .unwrap_err();

        match err {
            SimulationError::Integration(err @ IntegrationError::MaxSteps { .. }) => {
                let time = err.time().unwrap();
                assert!((0.0..10.0).contains(&time));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
