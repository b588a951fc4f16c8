//! Post-processing of simulated trajectories.
//!
//! Zero crossings are located between samples by bisection on the cubic
//! Hermite interpolant built from each sample's angle and angular velocity,
//! so crossing times are resolved well below the grid spacing.

use std::convert::Infallible;

use twine_core::{EquationProblem, Model};
use twine_solvers::equation::bisection;
use uom::si::{
    acceleration::meter_per_second_squared,
    angle::degree,
    f64::{Angle, Time},
    length::meter,
    mass::kilogram,
    moment_of_inertia::kilogram_square_meter,
    time::second,
};

use super::{AnalysisError, PendulumParameters, Trajectory};

/// Solver configuration for locating zero crossings.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisConfig {
    /// Maximum iteration count for each bisection solve.
    pub max_iters: usize,

    /// Absolute tolerance on the crossing time.
    pub time_tol: Time,

    /// Absolute tolerance on the interpolated angle at the crossing.
    pub angle_tol: Angle,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_iters: 100,
            time_tol: Time::new::<second>(1e-12),
            angle_tol: Angle::new::<degree>(1e-9),
        }
    }
}

impl AnalysisConfig {
    /// Converts this configuration into a bisection solver configuration.
    fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.time_tol.get::<second>(),
            x_rel_tol: 0.0,
            residual_tol: self.angle_tol.get::<degree>(),
        }
    }
}

/// A local maximum of the angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Sample time, s.
    pub time: f64,

    /// Angle at the peak, deg.
    pub angle: f64,
}

/// Times at which the angle passes through zero, using [`AnalysisConfig::default`].
///
/// # Errors
///
/// Returns an [`AnalysisError`] if a bracketed crossing cannot be resolved.
pub fn zero_crossings(trajectory: &Trajectory) -> Result<Vec<f64>, AnalysisError> {
    zero_crossings_with(trajectory, &AnalysisConfig::default())
}

/// Times at which the angle passes through zero.
///
/// Samples that are exactly zero count as crossings at their own time.
/// Otherwise a crossing is reported between every pair of consecutive
/// samples whose angles have opposite signs.
///
/// # Errors
///
/// Returns an [`AnalysisError`] if a bracketed crossing cannot be resolved.
pub fn zero_crossings_with(
    trajectory: &Trajectory,
    config: &AnalysisConfig,
) -> Result<Vec<f64>, AnalysisError> {
    let time = trajectory.time();
    let angle = trajectory.angle();
    let rate = trajectory.angular_velocity();

    let mut crossings = Vec::new();
    if angle.first() == Some(&0.0) {
        crossings.push(time[0]);
    }

    for i in 1..trajectory.len() {
        if angle[i] == 0.0 {
            crossings.push(time[i]);
        } else if angle[i - 1] * angle[i] < 0.0 {
            let segment = HermiteSegment {
                start: time[i - 1],
                span: time[i] - time[i - 1],
                angles: [angle[i - 1], angle[i]],
                rates: [rate[i - 1], rate[i]],
            };
            crossings.push(segment.locate_zero(config)?);
        }
    }

    Ok(crossings)
}

/// Mean full oscillation period, measured between every other zero crossing.
///
/// Returns `None` if the angle crosses zero fewer than three times.
///
/// # Errors
///
/// Returns an [`AnalysisError`] if a bracketed crossing cannot be resolved.
pub fn oscillation_period(trajectory: &Trajectory) -> Result<Option<Time>, AnalysisError> {
    let crossings = zero_crossings(trajectory)?;
    if crossings.len() < 3 {
        return Ok(None);
    }

    let periods = crossings.windows(3).map(|w| w[2] - w[0]);
    let count = crossings.len() - 2;
    let mean = periods.sum::<f64>() / count as f64;
    Ok(Some(Time::new::<second>(mean)))
}

/// Local maxima of the angle, in time order.
///
/// A sample is a peak if it is strictly above its predecessor and not below
/// its successor. The first and last samples are never peaks.
#[must_use]
pub fn peak_envelope(trajectory: &Trajectory) -> Vec<Peak> {
    let time = trajectory.time();
    trajectory
        .angle()
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w[1] > w[0] && w[1] >= w[2])
        .map(|(i, w)| Peak {
            time: time[i + 1],
            angle: w[1],
        })
        .collect()
}

/// Linearized period `2π·sqrt((I_cm + M·r_cm²) / (M·g·r_cm))`.
///
/// Ignores damping, base motion, and the magnetic interaction. Returns `None`
/// if the bottom position is not a stable gravitational equilibrium.
#[must_use]
pub fn small_angle_period(parameters: &PendulumParameters) -> Option<Time> {
    let mass = parameters.pendulum_mass.get::<kilogram>();
    let com_distance = parameters.com_distance.get::<meter>();
    let inertia =
        parameters.com_inertia.get::<kilogram_square_meter>() + mass * com_distance * com_distance;
    let stiffness = mass * parameters.gravity.get::<meter_per_second_squared>() * com_distance;

    let period = std::f64::consts::TAU * (inertia / stiffness).sqrt();
    (stiffness > 0.0 && period.is_finite()).then(|| Time::new::<second>(period))
}

/// Cubic Hermite interpolant of the angle between two samples.
#[derive(Debug, Clone, Copy)]
struct HermiteSegment {
    start: f64,
    span: f64,
    angles: [f64; 2],
    rates: [f64; 2],
}

/// Interpolated angle at a time.
#[derive(Debug, Clone, Copy)]
struct SegmentPoint {
    time: f64,
    angle: f64,
}

impl HermiteSegment {
    fn locate_zero(&self, config: &AnalysisConfig) -> Result<f64, AnalysisError> {
        let solution = bisection::solve(
            self,
            &ZeroAngle,
            [self.start, self.start + self.span],
            &config.bisection(),
            |event: &bisection::Event<'_, _, _>| {
                if event.result().is_err() {
                    return Some(bisection::Action::assume_positive());
                }
                None
            },
        )?;

        if solution.status != bisection::Status::Converged {
            return Err(AnalysisError::Unconverged {
                start: self.start,
                residual: solution.residual,
                iters: solution.iters,
            });
        }

        Ok(solution.snapshot.output.time)
    }

    fn angle_at(&self, time: f64) -> f64 {
        let s = (time - self.start) / self.span;
        let s2 = s * s;
        let s3 = s2 * s;

        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        let [a0, a1] = self.angles;
        let [r0, r1] = self.rates;
        h00 * a0 + h10 * self.span * r0 + h01 * a1 + h11 * self.span * r1
    }
}

impl Model for HermiteSegment {
    type Input = f64;
    type Output = SegmentPoint;
    type Error = Infallible;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        Ok(SegmentPoint {
            time: *input,
            angle: self.angle_at(*input),
        })
    }
}

/// Drives the interpolated angle to zero.
struct ZeroAngle;

impl EquationProblem<1> for ZeroAngle {
    type Input = f64;
    type Output = SegmentPoint;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(x[0])
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([output.angle])
    }
}
