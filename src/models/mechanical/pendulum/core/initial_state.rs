use uom::si::{
    angle::radian,
    angular_velocity::radian_per_second,
    f64::{Angle, AngularVelocity},
};

use super::{ConfigurationError, PendulumState};

/// Pendulum state at `t = 0`.
///
/// Angles are measured from the downward vertical.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialState {
    /// Initial angle, `θ0`.
    pub angle: Angle,

    /// Initial angular velocity, `ω0`.
    pub angular_velocity: AngularVelocity,
}

impl InitialState {
    /// Creates an initial state from an angle in radians and an angular velocity in rad/s.
    #[must_use]
    pub fn from_radians(angle: f64, angular_velocity: f64) -> Self {
        Self {
            angle: Angle::new::<radian>(angle),
            angular_velocity: AngularVelocity::new::<radian_per_second>(angular_velocity),
        }
    }

    /// Returns the integrator state in radians and rad/s.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NonFiniteInitialState`] if either value
    /// is infinite or `NaN`.
    pub(super) fn to_pendulum_state(self) -> Result<PendulumState, ConfigurationError> {
        let state = PendulumState {
            angle: self.angle.get::<radian>(),
            angular_velocity: self.angular_velocity.get::<radian_per_second>(),
        };
        if state.angle.is_finite() && state.angular_velocity.is_finite() {
            Ok(state)
        } else {
            Err(ConfigurationError::NonFiniteInitialState)
        }
    }
}
