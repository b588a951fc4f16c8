//! Closed-form equation of motion.
//!
//! The pendulum swings about a pivot that moves horizontally as
//! `A·sin(w·t)`. With kinetic energy
//!
//! ```text
//! T = ½·I_cm·θ̇² + ½·M·(vx² + vy²)
//! vx = r_cm·θ̇·cos θ + A·w·cos(w·t)
//! vy = r_cm·θ̇·sin θ
//! ```
//!
//! potential `V = −M·g·r_cm·cos θ`, and a generalized resistance `R` collecting
//! damping and magnetic torques, the Euler-Lagrange equation
//! `d/dt(∂L/∂θ̇) − ∂L/∂θ + R = 0` is linear in `θ̈`. The terms coupling `θ̇`
//! to the base velocity cancel, leaving
//!
//! ```text
//! (I_cm + M·r_cm²)·θ̈ = M·r_cm·A·w²·cos θ·sin(w·t) − M·g·r_cm·sin θ − R
//! ```
//!
//! which is what [`EquationOfMotion`] evaluates.

use std::{
    f64::consts::{FRAC_PI_2, PI},
    sync::OnceLock,
};

use tracing::debug;
use uom::si::{
    angle::radian,
    angular_acceleration::radian_per_second_squared,
    angular_velocity::radian_per_second,
    energy::joule,
    f64::{
        Angle, AngularAcceleration, AngularVelocity, Energy, Length, MomentOfInertia, Time, Torque,
    },
    length::meter,
    moment_of_inertia::kilogram_square_meter,
    time::second,
    torque::newton_meter,
};

use crate::support::constraint::{Constrained, StrictlyPositive};

use super::{DerivationError, PendulumParameters};

/// Velocity scale below which the quadratic and Coulomb damping terms are smoothed.
pub const DEFAULT_REGULARIZATION: f64 = 1e-5;

/// Polar angle of the fixed dipole's field axis, `2π − π/2`.
const FIXED_DIPOLE_AXIS: f64 = 2.0 * PI - FRAC_PI_2;

/// Numeric form of the pendulum's equation of motion.
///
/// Building the equation is separate from evaluating it: the process-wide
/// instance from [`shared`](Self::shared) is built on first use, while tests
/// and callers needing a different regularization construct their own and
/// pass it by reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquationOfMotion {
    regularization: f64,
}

impl Default for EquationOfMotion {
    fn default() -> Self {
        Self::new()
    }
}

impl EquationOfMotion {
    /// Creates the equation with [`DEFAULT_REGULARIZATION`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            regularization: DEFAULT_REGULARIZATION,
        }
    }

    /// Creates the equation with a custom damping regularization.
    ///
    /// The Coulomb and quadratic terms use `ω / (|ω| + ε)` in place of `sign(ω)`.
    #[must_use]
    pub fn with_regularization(epsilon: Constrained<f64, StrictlyPositive>) -> Self {
        Self {
            regularization: epsilon.into_inner(),
        }
    }

    /// Returns the process-wide equation, building it on first use.
    pub fn shared() -> &'static Self {
        static SHARED: OnceLock<EquationOfMotion> = OnceLock::new();

        SHARED.get_or_init(|| {
            let equation = Self::new();
            debug!(
                regularization = equation.regularization,
                "built pendulum equation of motion"
            );
            equation
        })
    }

    /// The damping regularization `ε`.
    #[must_use]
    pub fn regularization(&self) -> f64 {
        self.regularization
    }

    /// Solves the equation of motion for `θ̈` given a parameter set.
    ///
    /// The result holds SI magnitudes and the precomputed coefficients
    /// that every evaluation needs.
    ///
    /// # Errors
    ///
    /// Returns [`DerivationError::NoUniqueSolution`] if the coefficient of
    /// `θ̈`, the effective inertia `I_cm + M·r_cm²`, is zero or not finite.
    pub fn resolve(
        &self,
        parameters: &PendulumParameters,
    ) -> Result<Coefficients, DerivationError> {
        let [
            mass,
            length,
            gravity,
            com_distance,
            com_inertia,
            base_amplitude,
            base_frequency,
            viscous,
            quadratic,
            coulomb,
            dipole,
            offset,
            permeability,
        ] = parameters.to_si_array();

        let effective_inertia = com_inertia + mass * com_distance * com_distance;
        if effective_inertia == 0.0 || !effective_inertia.is_finite() {
            return Err(DerivationError::NoUniqueSolution {
                coefficient: MomentOfInertia::new::<kilogram_square_meter>(effective_inertia),
            });
        }

        Ok(Coefficients {
            mass,
            length,
            gravity,
            com_distance,
            com_inertia,
            base_amplitude,
            base_frequency,
            viscous,
            quadratic,
            coulomb,
            offset,
            effective_inertia,
            dipole_prefactor: 3.0 * permeability * dipole * dipole / (4.0 * PI),
        })
    }

    /// Angular acceleration `θ̈` at time `t`.
    #[must_use]
    pub fn angular_acceleration(
        &self,
        t: Time,
        angle: Angle,
        angular_velocity: AngularVelocity,
        coefficients: &Coefficients,
    ) -> AngularAcceleration {
        AngularAcceleration::new::<radian_per_second_squared>(self.acceleration(
            t.get::<second>(),
            angle.get::<radian>(),
            angular_velocity.get::<radian_per_second>(),
            coefficients,
        ))
    }

    /// Dipole-dipole torque on the pendulum.
    #[must_use]
    pub fn magnetic_torque(&self, angle: Angle, coefficients: &Coefficients) -> Torque {
        Torque::new::<newton_meter>(magnetic(angle.get::<radian>(), coefficients))
    }

    /// Combined viscous, quadratic, and Coulomb damping torque.
    #[must_use]
    pub fn damping_torque(
        &self,
        angular_velocity: AngularVelocity,
        coefficients: &Coefficients,
    ) -> Torque {
        Torque::new::<newton_meter>(
            self.damping(angular_velocity.get::<radian_per_second>(), coefficients),
        )
    }

    /// Distance between the two dipoles.
    #[must_use]
    pub fn separation(&self, angle: Angle, coefficients: &Coefficients) -> Length {
        Length::new::<meter>(separation(angle.get::<radian>(), coefficients))
    }

    /// Mechanical energy `T + V`, excluding the magnetic potential.
    ///
    /// Conserved when damping, base motion, and the magnetic interaction are
    /// all absent.
    #[must_use]
    pub fn mechanical_energy(
        &self,
        t: Time,
        angle: Angle,
        angular_velocity: AngularVelocity,
        coefficients: &Coefficients,
    ) -> Energy {
        let c = coefficients;
        let t = t.get::<second>();
        let (sin, cos) = angle.get::<radian>().sin_cos();
        let omega = angular_velocity.get::<radian_per_second>();

        let vx = c.com_distance * omega * cos
            + c.base_amplitude * c.base_frequency * (c.base_frequency * t).cos();
        let vy = c.com_distance * omega * sin;

        let kinetic = 0.5 * c.com_inertia * omega * omega + 0.5 * c.mass * (vx * vx + vy * vy);
        let potential = -c.mass * c.gravity * c.com_distance * cos;
        Energy::new::<joule>(kinetic + potential)
    }

    /// Time derivative of the state `[θ, ω]`.
    pub(super) fn state_derivative(
        &self,
        t: f64,
        [angle, angular_velocity]: [f64; 2],
        coefficients: &Coefficients,
    ) -> [f64; 2] {
        [
            angular_velocity,
            self.acceleration(t, angle, angular_velocity, coefficients),
        ]
    }

    fn acceleration(&self, t: f64, angle: f64, angular_velocity: f64, c: &Coefficients) -> f64 {
        let (sin, cos) = angle.sin_cos();
        let base = c.mass
            * c.com_distance
            * c.base_amplitude
            * c.base_frequency
            * c.base_frequency
            * cos
            * (c.base_frequency * t).sin();
        let gravity = c.mass * c.gravity * c.com_distance * sin;
        let resistance = self.damping(angular_velocity, c) + magnetic(angle, c);

        (base - gravity - resistance) / c.effective_inertia
    }

    fn damping(&self, omega: f64, c: &Coefficients) -> f64 {
        let direction = omega / (omega.abs() + self.regularization);
        c.viscous * omega + c.quadratic * omega * omega * direction + c.coulomb * direction
    }
}

/// SI coefficients of the equation of motion for one parameter set.
///
/// Produced by [`EquationOfMotion::resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    mass: f64,
    length: f64,
    gravity: f64,
    com_distance: f64,
    com_inertia: f64,
    base_amplitude: f64,
    base_frequency: f64,
    viscous: f64,
    quadratic: f64,
    coulomb: f64,
    offset: f64,
    effective_inertia: f64,

    /// `3·μ·m² / 4π`, the dipole force scale before dividing by `r⁴`.
    dipole_prefactor: f64,
}

impl Coefficients {
    /// Moment of inertia about the pivot, `I_cm + M·r_cm²`.
    #[must_use]
    pub fn effective_inertia(&self) -> MomentOfInertia {
        MomentOfInertia::new::<kilogram_square_meter>(self.effective_inertia)
    }

    /// Gravitational restoring torque per radian at small angles, `M·g·r_cm`.
    #[must_use]
    pub fn restoring_stiffness(&self) -> Torque {
        Torque::new::<newton_meter>(self.mass * self.gravity * self.com_distance)
    }
}

fn separation(angle: f64, c: &Coefficients) -> f64 {
    // Law of cosines rewritten as d² + 4·l·(l+d)·sin²(θ/2) to avoid
    // cancellation near θ = 0.
    let half_sin = (0.5 * angle).sin();
    let reach = c.length + c.offset;
    (c.offset * c.offset + 4.0 * c.length * reach * half_sin * half_sin).sqrt()
}

fn magnetic(angle: f64, c: &Coefficients) -> f64 {
    if c.dipole_prefactor == 0.0 {
        return 0.0;
    }

    let r = separation(angle, c);
    let a = FIXED_DIPOLE_AXIS;
    let b = FRAC_PI_2 - angle;
    let phi = FRAC_PI_2 - (c.length / r * angle.sin()).clamp(-1.0, 1.0).asin();

    let scale = c.dipole_prefactor / r.powi(4);
    let radial =
        scale * (2.0 * (phi - a).cos() * (phi - b).cos() - (phi - a).sin() * (phi - b).sin());
    let tangential = scale * (2.0 * phi - a - b).sin();

    c.length * (radial * (phi - angle).cos() - tangential * (phi - angle).sin())
}
