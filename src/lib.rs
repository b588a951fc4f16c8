//! # Pendulum Models
//!
//! Simulation of a base-excited pendulum with magnetic dipole interaction,
//! built as [Twine](https://github.com/isentropic-dev/twine) models.
//!
//! ## Crate layout
//!
//! - [`models`]: Domain-specific [`twine_core::Model`] implementations.
//! - [`support`]: Supporting utilities used by models.
//!
//! ## Quick start
//!
//! ```
//! use pendulum_models::models::mechanical::pendulum::simulate_raw;
//!
//! // 2 seconds at 100 Hz, released from 0.5 rad, laboratory parameters.
//! let time: Vec<f64> = (0..200).map(|i| 2.0 * f64::from(i) / 199.0).collect();
//! let parameters = [
//!     0.1038, 0.208, 9.81, 0.142, 0.00071, 0.0097, 3.0 * std::f64::consts::PI, 0.00012,
//!     0.000009, 0.0022, 0.85, 0.036, 1.257e-6,
//! ];
//!
//! let trajectory = simulate_raw(&time, [0.5, 0.0], &parameters)?;
//! assert_eq!(trajectory.angle().len(), time.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Utility code lifecycle
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.
//!
//! Utility code starts inside a model's internal `core` module and moves to
//! [`support`] once it is useful beyond that model. The ODE integrator in
//! [`support::ode`] took that path.

pub mod models;
pub mod support;
