//! Public Twine models.
//!
//! Models are the primary public interface of this crate. They are grouped
//! into domain-specific submodules; currently only [`mechanical`].
//!
//! # Model structure
//!
//! Each model lives in its own module with an internal `core` submodule that
//! holds the computation and domain logic. The `core` module itself is not
//! public; the model module re-exports the parts of its API that callers need.
//!
//! [`twine_core::Model`] implementations are thin adapters that delegate to
//! the core. One core may back several adapters, as the pendulum's
//! vector field and full simulation do.

pub mod mechanical;
