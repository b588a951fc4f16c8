//! Supporting utilities used by models.
//!
//! - [`constraint`]: Numeric invariants enforced at construction.
//! - [`ode`]: Adaptive ODE integration with stiffness switching.
//! - [`units`]: Quantity types missing from [`uom`].

pub mod constraint;
pub mod ode;
pub mod units;
