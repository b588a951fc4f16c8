use std::f64::consts::PI;

use uom::si::{
    acceleration::meter_per_second_squared,
    angular_velocity::radian_per_second,
    f64::{Acceleration, AngularVelocity, Length, Mass, MomentOfInertia, Torque},
    length::meter,
    mass::kilogram,
    moment_of_inertia::kilogram_square_meter,
    torque::newton_meter,
};

use crate::support::{
    constraint::NonNegative,
    units::{
        MagneticDipoleMoment, MagneticPermeability, QuadraticDampingCoefficient,
        ViscousDampingCoefficient, from_si, si_value,
    },
};

use super::ConfigurationError;

/// Number of scalar parameters in the flat representation.
pub const PARAMETER_COUNT: usize = 13;

/// Field names in flat-array order.
///
/// Index `i` of [`PendulumParameters::to_si_array`] holds the field named
/// `PARAMETER_NAMES[i]`.
pub const PARAMETER_NAMES: [&str; PARAMETER_COUNT] = [
    "pendulum_mass",
    "length",
    "gravity",
    "com_distance",
    "com_inertia",
    "base_amplitude",
    "base_frequency",
    "viscous_damping",
    "quadratic_damping",
    "coulomb_damping",
    "dipole_moment",
    "magnet_offset",
    "permeability",
];

/// Physical constants describing a base-excited pendulum near a fixed magnet.
///
/// Fields are listed in the canonical flat-array order used by
/// [`from_si_array`](Self::from_si_array) and [`to_si_array`](Self::to_si_array).
///
/// The [`Default`] values describe a laboratory pendulum: a 208 mm arm with a
/// neodymium dipole swinging over a matching magnet, driven at 1.5 Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendulumParameters {
    /// Mass of the swinging body, `M`.
    pub pendulum_mass: Mass,

    /// Pivot-to-dipole distance, `l`.
    pub length: Length,

    /// Gravitational acceleration, `g`.
    pub gravity: Acceleration,

    /// Pivot-to-center-of-mass distance, `r_cm`.
    pub com_distance: Length,

    /// Moment of inertia about the center of mass, `I_cm`.
    pub com_inertia: MomentOfInertia,

    /// Amplitude of the horizontal pivot motion, `A`.
    pub base_amplitude: Length,

    /// Angular frequency of the horizontal pivot motion, `w`.
    pub base_frequency: AngularVelocity,

    /// Torque per unit angular velocity, `mu_v`.
    pub viscous_damping: ViscousDampingCoefficient,

    /// Torque per unit squared angular velocity, `mu_q`.
    pub quadratic_damping: QuadraticDampingCoefficient,

    /// Magnitude of the dry-friction torque, `mu_c`.
    pub coulomb_damping: Torque,

    /// Dipole moment of both the pendulum magnet and the fixed magnet, `m`.
    pub dipole_moment: MagneticDipoleMoment,

    /// Dipole separation at zero angle, `d`.
    pub magnet_offset: Length,

    /// Permeability of the surrounding medium, `mu`.
    pub permeability: MagneticPermeability,
}

impl Default for PendulumParameters {
    fn default() -> Self {
        Self {
            pendulum_mass: Mass::new::<kilogram>(0.1038),
            length: Length::new::<meter>(0.208),
            gravity: Acceleration::new::<meter_per_second_squared>(9.81),
            com_distance: Length::new::<meter>(0.142),
            com_inertia: MomentOfInertia::new::<kilogram_square_meter>(0.00071),
            base_amplitude: Length::new::<meter>(0.0097),
            base_frequency: AngularVelocity::new::<radian_per_second>(3.0 * PI),
            viscous_damping: from_si(0.00012),
            quadratic_damping: from_si(0.000_009),
            coulomb_damping: Torque::new::<newton_meter>(0.0022),
            dipole_moment: from_si(0.85),
            magnet_offset: Length::new::<meter>(0.036),
            permeability: from_si(1.257e-6),
        }
    }
}

impl PendulumParameters {
    /// Builds parameters from SI magnitudes in canonical order.
    ///
    /// No validation is performed here; see [`validate`](Self::validate).
    #[must_use]
    pub fn from_si_array(values: [f64; PARAMETER_COUNT]) -> Self {
        let [
            pendulum_mass,
            length,
            gravity,
            com_distance,
            com_inertia,
            base_amplitude,
            base_frequency,
            viscous_damping,
            quadratic_damping,
            coulomb_damping,
            dipole_moment,
            magnet_offset,
            permeability,
        ] = values;

        Self {
            pendulum_mass: Mass::new::<kilogram>(pendulum_mass),
            length: Length::new::<meter>(length),
            gravity: Acceleration::new::<meter_per_second_squared>(gravity),
            com_distance: Length::new::<meter>(com_distance),
            com_inertia: MomentOfInertia::new::<kilogram_square_meter>(com_inertia),
            base_amplitude: Length::new::<meter>(base_amplitude),
            base_frequency: AngularVelocity::new::<radian_per_second>(base_frequency),
            viscous_damping: from_si(viscous_damping),
            quadratic_damping: from_si(quadratic_damping),
            coulomb_damping: Torque::new::<newton_meter>(coulomb_damping),
            dipole_moment: from_si(dipole_moment),
            magnet_offset: Length::new::<meter>(magnet_offset),
            permeability: from_si(permeability),
        }
    }

    /// Builds and validates parameters from a slice of SI magnitudes in canonical order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::ParameterCount`] if the slice does not hold
    /// exactly [`PARAMETER_COUNT`] values, or any error from [`validate`](Self::validate).
    pub fn try_from_si_slice(values: &[f64]) -> Result<Self, ConfigurationError> {
        let values: [f64; PARAMETER_COUNT] =
            values
                .try_into()
                .map_err(|_| ConfigurationError::ParameterCount {
                    expected: PARAMETER_COUNT,
                    found: values.len(),
                })?;

        let parameters = Self::from_si_array(values);
        parameters.validate()?;
        Ok(parameters)
    }

    /// Returns the SI magnitudes in canonical order.
    #[must_use]
    pub fn to_si_array(&self) -> [f64; PARAMETER_COUNT] {
        [
            self.pendulum_mass.get::<kilogram>(),
            self.length.get::<meter>(),
            self.gravity.get::<meter_per_second_squared>(),
            self.com_distance.get::<meter>(),
            self.com_inertia.get::<kilogram_square_meter>(),
            self.base_amplitude.get::<meter>(),
            self.base_frequency.get::<radian_per_second>(),
            si_value(&self.viscous_damping),
            si_value(&self.quadratic_damping),
            self.coulomb_damping.get::<newton_meter>(),
            si_value(&self.dipole_moment),
            self.magnet_offset.get::<meter>(),
            si_value(&self.permeability),
        ]
    }

    /// Whether the dipole-dipole interaction contributes any torque.
    #[must_use]
    pub fn has_magnetic_coupling(&self) -> bool {
        si_value(&self.dipole_moment) != 0.0 && si_value(&self.permeability) != 0.0
    }

    /// Checks that the parameters describe a physically meaningful pendulum.
    ///
    /// Masses, inertias, damping coefficients and permeability must be
    /// non-negative, every value must be finite, and the dipole separation
    /// must stay positive for all angles.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] found.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if let Some(name) = PARAMETER_NAMES
            .iter()
            .zip(self.to_si_array())
            .find_map(|(name, value)| (!value.is_finite()).then_some(*name))
        {
            return Err(ConfigurationError::NonFiniteParameter { name });
        }

        let non_negative = [
            ("pendulum_mass", self.pendulum_mass.get::<kilogram>()),
            ("com_inertia", self.com_inertia.get::<kilogram_square_meter>()),
            ("viscous_damping", si_value(&self.viscous_damping)),
            ("quadratic_damping", si_value(&self.quadratic_damping)),
            ("coulomb_damping", self.coulomb_damping.get::<newton_meter>()),
            ("permeability", si_value(&self.permeability)),
        ];
        for (name, value) in non_negative {
            NonNegative::new(value)
                .map_err(|source| ConfigurationError::InvalidParameter { name, source })?;
        }

        // The squared separation is d² + 4·l·(l+d)·sin²(θ/2), which vanishes
        // only at θ = 0 with d = 0.
        let length = self.length.get::<meter>();
        let reach = length + self.magnet_offset.get::<meter>();
        let touching = self.magnet_offset.get::<meter>() == 0.0 && self.has_magnetic_coupling();
        if length <= 0.0 || reach <= 0.0 || touching {
            return Err(ConfigurationError::DegenerateGeometry {
                length: self.length,
                offset: self.magnet_offset,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::support::constraint::ConstraintError;

    const LAB: [f64; PARAMETER_COUNT] = [
        0.1038, 0.208, 9.81, 0.142, 0.00071, 0.0097, 3.0 * PI, 0.00012, 0.000_009, 0.0022, 0.85,
        0.036, 1.257e-6,
    ];

    #[test]
    fn default_matches_laboratory_values() {
        assert_eq!(PendulumParameters::default().to_si_array(), LAB);
        assert!(PendulumParameters::default().validate().is_ok());
    }

    #[test]
    fn flat_order_is_pinned() {
        let values: [f64; PARAMETER_COUNT] = std::array::from_fn(|i| (i + 1) as f64);
        let p = PendulumParameters::from_si_array(values);

        assert_eq!(p.pendulum_mass.get::<kilogram>(), 1.0);
        assert_eq!(p.length.get::<meter>(), 2.0);
        assert_eq!(p.gravity.get::<meter_per_second_squared>(), 3.0);
        assert_eq!(p.com_distance.get::<meter>(), 4.0);
        assert_eq!(p.com_inertia.get::<kilogram_square_meter>(), 5.0);
        assert_eq!(p.base_amplitude.get::<meter>(), 6.0);
        assert_eq!(p.base_frequency.get::<radian_per_second>(), 7.0);
        assert_eq!(si_value(&p.viscous_damping), 8.0);
        assert_eq!(si_value(&p.quadratic_damping), 9.0);
        assert_eq!(p.coulomb_damping.get::<newton_meter>(), 10.0);
        assert_eq!(si_value(&p.dipole_moment), 11.0);
        assert_eq!(p.magnet_offset.get::<meter>(), 12.0);
        assert_eq!(si_value(&p.permeability), 13.0);

        assert_eq!(p.to_si_array(), values);
    }

    #[test]
    fn slice_arity_is_checked() {
        assert_eq!(
            PendulumParameters::try_from_si_slice(&LAB[..12]),
            Err(ConfigurationError::ParameterCount {
                expected: 13,
                found: 12
            })
        );
        assert!(PendulumParameters::try_from_si_slice(&LAB).is_ok());
    }

    #[test]
    fn rejects_negative_damping() {
        let mut values = LAB;
        values[9] = -0.0022;
        assert_eq!(
            PendulumParameters::from_si_array(values).validate(),
            Err(ConfigurationError::InvalidParameter {
                name: "coulomb_damping",
                source: ConstraintError::Negative
            })
        );
    }

    #[test]
    fn rejects_non_finite_values() {
        let mut values = LAB;
        values[2] = f64::NAN;
        assert_eq!(
            PendulumParameters::from_si_array(values).validate(),
            Err(ConfigurationError::NonFiniteParameter { name: "gravity" })
        );
    }

    #[test]
    fn rejects_degenerate_geometry() {
        let degenerate = |length: f64, offset: f64, dipole: f64| {
            let mut values = LAB;
            values[1] = length;
            values[10] = dipole;
            values[11] = offset;
            matches!(
                PendulumParameters::from_si_array(values).validate(),
                Err(ConfigurationError::DegenerateGeometry { .. })
            )
        };

        assert!(degenerate(0.0, 0.036, 0.85));
        assert!(degenerate(-0.2, 0.036, 0.85));
        assert!(degenerate(0.2, -0.3, 0.85));
        assert!(degenerate(0.2, 0.0, 0.85));

        // Without a dipole, a zero offset is harmless.
        assert!(!degenerate(0.2, 0.0, 0.0));
    }
}
