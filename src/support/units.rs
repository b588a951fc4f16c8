//! Extensions to [`uom`].
//!
//! This crate uses [`uom`] for physical quantities wherever `uom` provides
//! them (mass, length, torque, angular velocity, ...). A few quantities that
//! appear in the pendulum model have no stock `uom` type; this module defines
//! them as [`Quantity`](uom::si::Quantity) aliases.
//!
//! `uom` ships no units for these dimensions, so values are constructed from
//! and read back as SI base-unit magnitudes with [`from_si`] and
//! [`si_value`]:
//!
//! ```
//! use pendulum_models::support::units::{MagneticPermeability, from_si, si_value};
//!
//! let mu_0: MagneticPermeability = from_si(1.257e-6);
//! assert_eq!(si_value(&mu_0), 1.257e-6);
//! ```

mod quantities;

pub use quantities::{
    MagneticDipoleMoment, MagneticPermeability, QuadraticDampingCoefficient,
    ViscousDampingCoefficient, from_si, si_value,
};
