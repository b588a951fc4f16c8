//! Mechanical systems models.
//!
//! This module contains models for rigid-body mechanical systems such as
//! driven and damped pendulums.

pub mod pendulum;
