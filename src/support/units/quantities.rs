use std::marker::PhantomData;

use uom::{
    si::{Dimension, ISQ, Quantity, SI},
    typenum::{N1, N2, P1, P2, Z0},
};

/// Viscous damping torque coefficient, N·m·s (kg·m²/s) in SI.
///
/// Multiplies angular velocity (rad/s) to give a torque.
pub type ViscousDampingCoefficient = Quantity<ISQ<P2, P1, N1, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Quadratic damping torque coefficient, N·m·s² (kg·m²) in SI.
///
/// Multiplies the squared angular velocity to give a torque.
pub type QuadraticDampingCoefficient = Quantity<ISQ<P2, P1, Z0, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Magnetic dipole moment, A·m² in SI.
pub type MagneticDipoleMoment = Quantity<ISQ<P2, Z0, Z0, P1, Z0, Z0, Z0>, SI<f64>, f64>;

/// Magnetic permeability, H/m (kg·m/(s²·A²)) in SI.
pub type MagneticPermeability = Quantity<ISQ<P1, P1, N2, N2, Z0, Z0, Z0>, SI<f64>, f64>;

/// Builds a quantity from its magnitude in SI base units.
#[must_use]
pub fn from_si<D>(value: f64) -> Quantity<D, SI<f64>, f64>
where
    D: Dimension + ?Sized,
{
    Quantity {
        dimension: PhantomData,
        units: PhantomData,
        value,
    }
}

/// Returns the magnitude of a quantity in SI base units.
#[must_use]
pub fn si_value<D>(quantity: &Quantity<D, SI<f64>, f64>) -> f64
where
    D: Dimension + ?Sized,
{
    quantity.value
}
