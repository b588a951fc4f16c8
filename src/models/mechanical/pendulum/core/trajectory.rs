use crate::support::ode::SolverStats;

/// A simulated pendulum trajectory.
///
/// Times are in seconds, angles in degrees, angular velocities in degrees
/// per second. All three sequences have the same length as the time grid
/// they were sampled on.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    time: Vec<f64>,
    angle: Vec<f64>,
    angular_velocity: Vec<f64>,
    stats: SolverStats,
}

/// One row of a [`Trajectory`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Time, s.
    pub time: f64,

    /// Angle from the downward vertical, deg.
    pub angle: f64,

    /// Angular velocity, deg/s.
    pub angular_velocity: f64,
}

impl Trajectory {
    /// Builds a trajectory from a time grid and states in radians.
    pub(super) fn from_radians(time: &[f64], states: &[[f64; 2]], stats: SolverStats) -> Self {
        debug_assert_eq!(time.len(), states.len());

        let (angle, angular_velocity): (Vec<f64>, Vec<f64>) = states
            .iter()
            .map(|[theta, omega]| (theta.to_degrees(), omega.to_degrees()))
            .unzip();

        Self {
            time: time.to_vec(),
            angle,
            angular_velocity,
            stats,
        }
    }

    /// Sample times, s.
    #[must_use]
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Angles, deg.
    #[must_use]
    pub fn angle(&self) -> &[f64] {
        &self.angle
    }

    /// Angular velocities, deg/s.
    #[must_use]
    pub fn angular_velocity(&self) -> &[f64] {
        &self.angular_velocity
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the trajectory has no samples.
    ///
    /// Trajectories produced by a simulation always have at least one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Work the integrator performed to produce this trajectory.
    #[must_use]
    pub fn solver_stats(&self) -> &SolverStats {
        &self.stats
    }

    /// Iterates over rows in time order.
    pub fn samples(&self) -> impl ExactSizeIterator<Item = Sample> + '_ {
        self.time
            .iter()
            .zip(&self.angle)
            .zip(&self.angular_velocity)
            .map(|((&time, &angle), &angular_velocity)| Sample {
                time,
                angle,
                angular_velocity,
            })
    }

    /// Iterates over `(angle, angular velocity)` pairs for a phase portrait.
    pub fn phase_portrait(&self) -> impl ExactSizeIterator<Item = (f64, f64)> + '_ {
        self.angle
            .iter()
            .copied()
            .zip(self.angular_velocity.iter().copied())
    }

    /// Consumes the trajectory and returns `(time, angle, angular_velocity)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        (self.time, self.angle, self.angular_velocity)
    }
}
