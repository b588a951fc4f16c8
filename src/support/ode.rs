//! Adaptive ODE integration with automatic stiffness switching.
//!
//! [`integrate`] advances a Twine [`OdeProblem`] across an output grid in
//! the spirit of LSODA:
//!
//! - Steps start with the explicit Dormand-Prince 5(4) pair, which watches
//!   for stiffness with Hairer's `h·|λ|` estimate.
//! - After repeated stiff detections the solver switches to the linearly
//!   implicit Rosenbrock 2(3) method of Shampine and Reichelt, using a
//!   finite-difference Jacobian.
//! - While `h·‖J‖∞` stays inside the explicit stability region, it switches
//!   back.
//!
//! Internal step sizes are chosen by local error control alone. Output
//! samples are produced exactly at the requested grid points by each
//! method's continuous extension, so the grid never constrains the steps.
//!
//! The problem plugs in the same way it does for
//! `twine_solvers::transient::euler`: its state is
//! [`StepIntegrable`], every stage is reached by stepping the state at the
//! start of the step, and inputs are rebuilt with
//! [`OdeProblem::build_input`]. The error estimate and stiffness detection
//! also need the state and its derivative as plain vectors, so the state
//! must convert into `[f64; N]` and its derivative must convert both ways.

mod config;
mod dense;
mod dopri5;
mod error;
mod rosenbrock;

#[cfg(test)]
mod test_support;

pub use config::SolverConfig;
pub use error::IntegrationError;

use nalgebra::{Const, DimMin, SMatrix, SVector};
use tracing::debug;
use twine_core::{DerivativeOf, Model, OdeProblem, Snapshot, StepIntegrable};

use dense::DenseOutput;

type Vector<const N: usize> = SVector<f64, N>;
type Matrix<const N: usize> = SMatrix<f64, N, N>;

/// Consecutive non-stiff steps after which earlier stiff detections are forgotten.
const STIFF_DETECTION_RESET_STEPS: usize = 6;

/// Integration method family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Explicit Dormand-Prince 5(4).
    NonStiff,

    /// Linearly implicit Rosenbrock 2(3).
    Stiff,
}

impl Method {
    /// Exponent used to turn an error ratio into a step-size factor.
    fn error_exponent(self) -> f64 {
        match self {
            Self::NonStiff => 1.0 / 5.0,
            Self::Stiff => 1.0 / 3.0,
        }
    }
}

/// Work counters for a completed integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    /// Steps accepted by error control.
    pub accepted_steps: usize,

    /// Steps rejected by error control.
    pub rejected_steps: usize,

    /// Model evaluations, including Jacobian differencing and output samples.
    pub fn_evals: usize,

    /// Finite-difference Jacobian evaluations.
    pub jacobian_evals: usize,

    /// Accepted steps taken with the stiff method.
    pub stiff_steps: usize,

    /// Number of changes between the stiff and non-stiff methods.
    pub method_switches: usize,
}

/// Snapshots on the output grid, plus solver statistics.
#[derive(Debug, Clone)]
pub struct Solution<I, O> {
    /// One model snapshot per output grid point, in grid order.
    pub samples: Vec<Snapshot<I, O>>,

    /// Work performed to produce the samples.
    pub stats: SolverStats,
}

/// Integrates `problem` from `initial` at `grid[0]` and samples it at every grid point.
///
/// The first sample is the model evaluated at `initial`. Every later input
/// is built from the input at the start of the enclosing step, with the
/// elapsed time as the step delta.
///
/// # Errors
///
/// Returns an [`IntegrationError`] if the grid is invalid or if the
/// integration cannot proceed: non-finite values, a collapsed step size,
/// too many steps between samples, or a failing model or problem.
pub fn integrate<M, P, const N: usize>(
    model: &M,
    problem: &P,
    initial: M::Input,
    grid: &[f64],
    config: &SolverConfig,
) -> Result<Solution<M::Input, M::Output>, IntegrationError>
where
    M: Model,
    M::Input: Clone,
    M::Output: Clone,
    P: OdeProblem<Input = M::Input, Output = M::Output, Delta = f64>,
    P::State: Clone + Into<[f64; N]>,
    DerivativeOf<P::State, f64>: From<[f64; N]> + Into<[f64; N]>,
    Const<N>: DimMin<Const<N>, Output = Const<N>>,
{
    const {
        assert!(N >= 1, "an ODE system needs at least one state variable");
    };

    check_grid(grid)?;

    let mut system = System::new(model, problem, initial, grid[0])?;
    let mut stats = SolverStats::default();
    let mut samples = Vec::with_capacity(grid.len());
    samples.push(system.snapshot());

    let mut t = grid[0];
    let t_end = grid[grid.len() - 1];
    if grid.len() == 1 {
        stats.fn_evals = system.evals;
        return Ok(Solution { samples, stats });
    }

    let max_step = config.max_step.unwrap_or(t_end - t);
    let mut h = config
        .initial_step
        .unwrap_or_else(|| initial_step(&mut system, max_step, config))
        .min(max_step);

    let mut method = Method::NonStiff;
    let mut switch = SwitchCounter::default();
    let mut jacobian: Option<(Matrix<N>, Vector<N>)> = None;
    let mut next = 1;
    let mut attempts_since_sample = 0;
    let mut last_rejected = false;

    while next < grid.len() {
        let min_step = 16.0 * f64::EPSILON * t.abs().max(1.0);
        if t_end - t <= min_step {
            // Roundoff left the final step a few ulps short.
            while next < grid.len() {
                samples.push(system.snapshot());
                next += 1;
            }
            break;
        }

        if attempts_since_sample >= config.max_steps_per_sample {
            return Err(IntegrationError::MaxSteps {
                time: t,
                steps: config.max_steps_per_sample,
            });
        }

        h = h.min(max_step).min(t_end - t);
        if h < min_step {
            return Err(IntegrationError::StepSizeTooSmall { time: t, step: h });
        }
        attempts_since_sample += 1;

        let attempt = match method {
            Method::NonStiff => Some(dopri5::step(&mut system, h, config)?),
            Method::Stiff => {
                let (jac, dfdt) = match jacobian {
                    Some(pair) => pair,
                    None => {
                        stats.jacobian_evals += 1;
                        let pair = rosenbrock::jacobian(&mut system)?;
                        jacobian = Some(pair);
                        pair
                    }
                };
                rosenbrock::step(&mut system, &jac, &dfdt, h, config)?
            }
        };

        let attempt = match attempt {
            Some(attempt) if attempt.error <= 1.0 => attempt,
            rejected => {
                // `None` means the Rosenbrock iteration matrix was singular.
                stats.rejected_steps += 1;
                let factor = attempt_factor(rejected.map(|a| a.error), method, config);
                h *= factor.clamp(0.2, 1.0);
                last_rejected = true;
                continue;
            }
        };

        let step = h;
        stats.accepted_steps += 1;
        if method == Method::Stiff {
            stats.stiff_steps += 1;
        }

        let t_new = if h >= t_end - t { t_end } else { t + h };
        while next < grid.len() && grid[next] <= t_new {
            let sample = if grid[next] == t_new {
                system.sample(attempt.state.clone(), step)?
            } else {
                let dt = grid[next] - t;
                let state = system.advance(&attempt.dense.slope(dt), dt);
                system.sample(state, dt)?
            };
            samples.push(sample);
            next += 1;
            attempts_since_sample = 0;
        }

        if let Some(next_method) = switch.observe(method, attempt.stiffness, config) {
            debug!(time = t_new, from = ?method, to = ?next_method, "switching integration method");
            method = next_method;
            stats.method_switches += 1;
        }

        let mut factor = attempt_factor(Some(attempt.error), method, config);
        if last_rejected {
            factor = factor.min(1.0);
        }
        h *= factor.clamp(0.2, 10.0);

        system.commit(attempt.state, step, t_new)?;
        t = t_new;
        jacobian = None;
        last_rejected = false;
    }

    stats.fn_evals = system.evals;
    Ok(Solution { samples, stats })
}

/// A trial step produced by either method.
struct Attempt<S, const N: usize> {
    state: S,
    error: f64,
    dense: DenseOutput<N>,

    /// Estimate of `h·|λ|` for the dominant eigenvalue.
    stiffness: f64,
}

/// The system as seen from the start of the step being attempted.
///
/// Steppers work on plain vectors. Implementations turn those back into
/// problem states and derivatives.
trait Rhs<const N: usize> {
    type State: Clone;

    /// Time at the start of the step.
    fn time(&self) -> f64;

    /// State at the start of the step.
    fn start(&self) -> Self::State;

    /// State components at the start of the step.
    fn y0(&self) -> &Vector<N>;

    /// Derivative at the start of the step.
    fn f0(&self) -> &Vector<N>;

    /// The state reached from the start of the step by moving along `slope` for `span`.
    fn advance(&self, slope: &Vector<N>, span: f64) -> Self::State;

    /// Components of `state`.
    fn components(state: &Self::State) -> Vector<N>;

    /// Derivative at `state`, `dt` after the start of the step.
    fn eval(&mut self, dt: f64, state: &Self::State) -> Result<Vector<N>, IntegrationError>;
}

/// A model and problem pair anchored at the last accepted point.
struct System<'a, M: Model, P: OdeProblem, const N: usize> {
    model: &'a M,
    problem: &'a P,
    anchor: Snapshot<M::Input, M::Output>,
    state: P::State,
    time: f64,
    y0: Vector<N>,
    f0: Vector<N>,
    evals: usize,
}

impl<'a, M, P, const N: usize> System<'a, M, P, N>
where
    M: Model,
    M::Input: Clone,
    M::Output: Clone,
    P: OdeProblem<Input = M::Input, Output = M::Output, Delta = f64>,
    P::State: Clone + Into<[f64; N]>,
    DerivativeOf<P::State, f64>: From<[f64; N]> + Into<[f64; N]>,
{
    fn new(
        model: &'a M,
        problem: &'a P,
        input: M::Input,
        time: f64,
    ) -> Result<Self, IntegrationError> {
        let output = model.call(&input).map_err(|err| model_error(time, err))?;
        let state = problem.state(&input).map_err(|err| problem_error(time, err))?;
        let y0 = Self::components(&state);
        if y0.iter().any(|v| !v.is_finite()) {
            return Err(IntegrationError::NonFinite { time });
        }

        let mut system = Self {
            model,
            problem,
            anchor: Snapshot::new(input, output),
            state,
            time,
            y0,
            f0: Vector::zeros(),
            evals: 1,
        };
        system.f0 = system.derivative_at_anchor()?;
        Ok(system)
    }

    /// A copy of the snapshot at the start of the step.
    fn snapshot(&self) -> Snapshot<M::Input, M::Output> {
        self.anchor.clone()
    }

    /// Evaluates the model at `state`, `dt` after the start of the step.
    fn sample(
        &mut self,
        state: P::State,
        dt: f64,
    ) -> Result<Snapshot<M::Input, M::Output>, IntegrationError> {
        if Self::components(&state).iter().any(|v| !v.is_finite()) {
            return Err(IntegrationError::NonFinite { time: self.time });
        }

        let input = self.build(&state, dt)?;
        self.evals += 1;
        let output = self
            .model
            .call(&input)
            .map_err(|err| model_error(self.time, err))?;
        Ok(Snapshot::new(input, output))
    }

    /// Moves the start of the step to an accepted `state`, `h` later at `time`.
    fn commit(&mut self, state: P::State, h: f64, time: f64) -> Result<(), IntegrationError> {
        let input = self.build(&state, h)?;
        let input = self
            .problem
            .finalize_step(input, &self.anchor.input, &self.anchor.output, &h)
            .map_err(|err| problem_error(self.time, err))?;

        self.evals += 1;
        let output = self
            .model
            .call(&input)
            .map_err(|err| model_error(self.time, err))?;
        let state = self
            .problem
            .state(&input)
            .map_err(|err| problem_error(self.time, err))?;

        self.anchor = Snapshot::new(input, output);
        self.y0 = Self::components(&state);
        self.state = state;
        self.f0 = self.derivative_at_anchor()?;
        self.time = time;
        Ok(())
    }

    fn build(&self, state: &P::State, dt: f64) -> Result<M::Input, IntegrationError> {
        self.problem
            .build_input(&self.anchor.input, state, &dt)
            .map_err(|err| problem_error(self.time, err))
    }

    fn derivative_at_anchor(&self) -> Result<Vector<N>, IntegrationError> {
        let derivative = self
            .problem
            .derivative(&self.anchor.input, &self.anchor.output)
            .map_err(|err| problem_error(self.time, err))?;
        let values: [f64; N] = derivative.into();
        self.finite(Vector::from(values))
    }

    fn finite(&self, values: Vector<N>) -> Result<Vector<N>, IntegrationError> {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(IntegrationError::NonFinite { time: self.time });
        }
        Ok(values)
    }
}

impl<M, P, const N: usize> Rhs<N> for System<'_, M, P, N>
where
    M: Model,
    M::Input: Clone,
    M::Output: Clone,
    P: OdeProblem<Input = M::Input, Output = M::Output, Delta = f64>,
    P::State: Clone + Into<[f64; N]>,
    DerivativeOf<P::State, f64>: From<[f64; N]> + Into<[f64; N]>,
{
    type State = P::State;

    fn time(&self) -> f64 {
        self.time
    }

    fn start(&self) -> P::State {
        self.state.clone()
    }

    fn y0(&self) -> &Vector<N> {
        &self.y0
    }

    fn f0(&self) -> &Vector<N> {
        &self.f0
    }

    fn advance(&self, slope: &Vector<N>, span: f64) -> P::State {
        self.state.step(to_array(slope).into(), span)
    }

    fn components(state: &P::State) -> Vector<N> {
        let values: [f64; N] = state.clone().into();
        Vector::from(values)
    }

    fn eval(&mut self, dt: f64, state: &P::State) -> Result<Vector<N>, IntegrationError> {
        let input = self.build(state, dt)?;
        self.evals += 1;
        let output = self
            .model
            .call(&input)
            .map_err(|err| model_error(self.time, err))?;
        let derivative = self
            .problem
            .derivative(&input, &output)
            .map_err(|err| problem_error(self.time, err))?;
        let values: [f64; N] = derivative.into();
        self.finite(Vector::from(values))
    }
}

/// Tracks consecutive stiffness observations to decide when to change methods.
#[derive(Debug, Default)]
struct SwitchCounter {
    stiff: usize,
    nonstiff: usize,
}

impl SwitchCounter {
    fn observe(&mut self, method: Method, stiffness: f64, config: &SolverConfig) -> Option<Method> {
        let stiff = stiffness > config.stiffness_threshold;
        match method {
            Method::NonStiff if stiff => {
                self.nonstiff = 0;
                self.stiff += 1;
                if self.stiff >= config.stiff_switch_steps {
                    *self = Self::default();
                    return Some(Method::Stiff);
                }
            }
            Method::NonStiff => {
                self.nonstiff += 1;
                if self.nonstiff == STIFF_DETECTION_RESET_STEPS {
                    self.stiff = 0;
                }
            }
            Method::Stiff if stiff => self.nonstiff = 0,
            Method::Stiff => {
                self.nonstiff += 1;
                if self.nonstiff >= config.nonstiff_switch_steps {
                    *self = Self::default();
                    return Some(Method::NonStiff);
                }
            }
        }
        None
    }
}

/// Step-size factor from an error ratio; `None` means the step could not be formed.
fn attempt_factor(error: Option<f64>, method: Method, config: &SolverConfig) -> f64 {
    match error {
        Some(error) if error > 0.0 => config.safety * error.powf(-method.error_exponent()),
        Some(_) => 10.0,
        None => 0.25,
    }
}

/// Weighted root-mean-square error ratio; values at or below 1 pass.
fn error_norm<const N: usize>(
    err: &Vector<N>,
    y0: &Vector<N>,
    y1: &Vector<N>,
    config: &SolverConfig,
) -> f64 {
    let sum: f64 = (0..N)
        .map(|i| {
            let scale = config.abs_tol + config.rel_tol * y0[i].abs().max(y1[i].abs());
            (err[i] / scale).powi(2)
        })
        .sum();
    let norm = (sum / N as f64).sqrt();
    if norm.is_nan() { f64::INFINITY } else { norm }
}

/// Starting step size following Hairer, Nørsett and Wanner (II.4).
fn initial_step<R: Rhs<N>, const N: usize>(
    rhs: &mut R,
    max_step: f64,
    config: &SolverConfig,
) -> f64 {
    let y = *rhs.y0();
    let f = *rhs.f0();
    let scaled_norm = |v: &Vector<N>| {
        let sum: f64 = (0..N)
            .map(|i| (v[i] / (config.abs_tol + config.rel_tol * y[i].abs())).powi(2))
            .sum();
        (sum / N as f64).sqrt()
    };

    let d0 = scaled_norm(&y);
    let d1 = scaled_norm(&f);
    let h0 = if d0 < 1e-10 || d1 < 1e-10 {
        1e-6
    } else {
        0.01 * d0 / d1
    }
    .min(max_step);

    // A failed trial evaluation only means the first real step will shrink.
    let trial = rhs.advance(&f, h0);
    let Ok(f1) = rhs.eval(h0, &trial) else {
        return h0;
    };
    let d2 = scaled_norm(&(f1 - f)) / h0;

    let dmax = d1.max(d2);
    let h1 = if dmax <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / dmax).powf(1.0 / 5.0)
    };

    (100.0 * h0).min(h1).min(max_step)
}

fn check_grid(grid: &[f64]) -> Result<(), IntegrationError> {
    if grid.is_empty() {
        return Err(IntegrationError::InvalidOutputGrid { index: 0 });
    }
    if let Some(index) = grid.iter().position(|t| !t.is_finite()) {
        return Err(IntegrationError::InvalidOutputGrid { index });
    }
    if let Some(index) = grid.windows(2).position(|pair| pair[1] <= pair[0]) {
        return Err(IntegrationError::InvalidOutputGrid { index: index + 1 });
    }
    Ok(())
}

fn model_error<E: std::error::Error + Send + Sync + 'static>(
    time: f64,
    err: E,
) -> IntegrationError {
    IntegrationError::Model {
        time,
        source: Box::new(err),
    }
}

fn problem_error<E: std::error::Error + Send + Sync + 'static>(
    time: f64,
    err: E,
) -> IntegrationError {
    IntegrationError::Problem {
        time,
        source: Box::new(err),
    }
}

fn to_array<const N: usize>(v: &Vector<N>) -> [f64; N] {
    std::array::from_fn(|i| v[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use test_support::{At, Field, FieldProblem, at};

    fn solve<const N: usize>(
        f: impl Fn(f64, [f64; N]) -> [f64; N],
        y0: [f64; N],
        grid: &[f64],
        config: &SolverConfig,
    ) -> Result<Solution<At<N>, [f64; N]>, IntegrationError>
    where
        Const<N>: DimMin<Const<N>, Output = Const<N>>,
    {
        integrate::<_, _, N>(&Field::new(f), &FieldProblem, at(grid[0], y0), grid, config)
    }

    fn states<const N: usize>(solution: &Solution<At<N>, [f64; N]>) -> Vec<[f64; N]> {
        solution
            .samples
            .iter()
            .map(|sample| sample.input.point.0)
            .collect()
    }

    fn linspace(stop: f64, count: usize) -> Vec<f64> {
        (0..count)
            .map(|i| stop * i as f64 / (count - 1) as f64)
            .collect()
    }

    /// `y'' = -ω² y` as a first-order system.
    fn oscillator(omega: f64) -> impl Fn(f64, [f64; 2]) -> [f64; 2] {
        move |_, [x, v]| [v, -omega * omega * x]
    }

    #[test]
    fn oscillator_matches_exact_solution() {
        let omega = 2.0;
        let grid = linspace(10.0, 201);

        let solution = solve(oscillator(omega), [1.0, 0.0], &grid, &SolverConfig::default())
            .unwrap();

        assert_eq!(solution.samples.len(), grid.len());
        for (t, [x, v]) in grid.iter().zip(states(&solution)) {
            assert_relative_eq!(x, (omega * t).cos(), epsilon = 1e-6);
            assert_relative_eq!(v, -omega * (omega * t).sin(), epsilon = 1e-6);
        }
        assert_eq!(solution.stats.stiff_steps, 0);
    }

    #[test]
    fn samples_carry_grid_times_and_model_output() {
        let grid = [0.0, 0.25, 1.0];
        let solution =
            solve(oscillator(1.0), [0.3, -0.2], &grid, &SolverConfig::default()).unwrap();

        let first = &solution.samples[0];
        assert_eq!(first.input, at(0.0, [0.3, -0.2]));
        assert_eq!(first.output, [-0.2, -0.3]);

        for (sample, t) in solution.samples.iter().zip(grid) {
            assert_relative_eq!(sample.input.time, t, epsilon = 1e-14);
            let [x, v] = sample.input.point.0;
            assert_eq!(sample.output, [v, -x]);
        }
    }

    #[test]
    fn internal_steps_are_independent_of_grid() {
        // A dense and a sparse grid must agree where they overlap.
        let dense_grid = linspace(5.0, 5001);
        let sparse_grid = linspace(5.0, 6);
        let config = SolverConfig::default();

        let dense = states(&solve(oscillator(1.5), [1.0, 0.0], &dense_grid, &config).unwrap());
        let sparse = states(&solve(oscillator(1.5), [1.0, 0.0], &sparse_grid, &config).unwrap());

        for (k, sample) in sparse.iter().enumerate() {
            let matching = dense[k * 1000];
            assert_relative_eq!(sample[0], matching[0], epsilon = 1e-6);
            assert_relative_eq!(sample[1], matching[1], epsilon = 1e-6);
        }
    }

    #[test]
    fn stiff_problem_switches_method() {
        // Prothero-Robinson: `y' = -λ (y - cos t) - sin t`, solution `cos t`.
        let lambda = 1e4;
        let grid = linspace(10.0, 101);
        let config = SolverConfig::default().with_tolerances(1e-6, 1e-6);

        let solution = solve(
            |t, [y]: [f64; 1]| [-lambda * (y - t.cos()) - t.sin()],
            [1.0],
            &grid,
            &config,
        )
        .unwrap();

        assert!(solution.stats.method_switches >= 1);
        assert!(solution.stats.stiff_steps > 0);
        assert!(solution.stats.jacobian_evals > 0);
        for (t, [y]) in grid.iter().zip(states(&solution)) {
            assert_relative_eq!(y, t.cos(), epsilon = 1e-3);
        }
    }

    #[test]
    fn rejects_invalid_grids() {
        let config = SolverConfig::default();
        let model = Field::new(oscillator(1.0));
        let initial = at(0.0, [1.0, 0.0]);

        assert!(matches!(
            integrate::<_, _, 2>(&model, &FieldProblem, initial, &[], &config),
            Err(IntegrationError::InvalidOutputGrid { index: 0 })
        ));
        assert!(matches!(
            integrate::<_, _, 2>(&model, &FieldProblem, initial, &[0.0, 1.0, 1.0], &config),
            Err(IntegrationError::InvalidOutputGrid { index: 2 })
        ));
        assert!(matches!(
            integrate::<_, _, 2>(&model, &FieldProblem, initial, &[0.0, f64::NAN], &config),
            Err(IntegrationError::InvalidOutputGrid { index: 1 })
        ));
    }

    #[test]
    fn blowup_is_reported_at_the_start_of_the_failing_step() {
        // `y' = y²`, `y(0) = 1` has the solution `1 / (1 - t)`.
        let grid = [0.0, 0.5, 2.0];
        let err = solve(|_, [y]: [f64; 1]| [y * y], [1.0], &grid, &SolverConfig::default())
            .unwrap_err();

        let time = err.time().expect("blowup happens at a definite time");
        assert!(time > 0.5 && time < 1.0, "failed at t={time}");
    }

    #[test]
    fn stiff_detections_are_forgotten_after_a_calm_stretch() {
        let config = SolverConfig::default();
        let stiff = config.stiffness_threshold + 1.0;
        let calm = 0.0;

        let mut counter = SwitchCounter::default();
        for _ in 1..config.stiff_switch_steps {
            assert_eq!(counter.observe(Method::NonStiff, stiff, &config), None);
        }
        for _ in 0..STIFF_DETECTION_RESET_STEPS {
            assert_eq!(counter.observe(Method::NonStiff, calm, &config), None);
        }
        for _ in 1..config.stiff_switch_steps {
            assert_eq!(counter.observe(Method::NonStiff, stiff, &config), None);
        }
        assert_eq!(
            counter.observe(Method::NonStiff, stiff, &config),
            Some(Method::Stiff)
        );
    }

    #[test]
    fn a_short_calm_stretch_keeps_stiff_detections() {
        let config = SolverConfig::default();
        let stiff = config.stiffness_threshold + 1.0;

        let mut counter = SwitchCounter::default();
        for _ in 1..config.stiff_switch_steps {
            counter.observe(Method::NonStiff, stiff, &config);
        }
        for _ in 1..STIFF_DETECTION_RESET_STEPS {
            counter.observe(Method::NonStiff, 0.0, &config);
        }
        assert_eq!(
            counter.observe(Method::NonStiff, stiff, &config),
            Some(Method::Stiff)
        );
    }
}
