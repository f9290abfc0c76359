//! Gravitational N-body integration with variational equations and the MEGNO
//! chaos indicator.
//!
//! A [`Simulation`](simulation::Simulation) evolves point masses under direct
//! Newtonian gravity with either a fixed-step symplectic leapfrog or the
//! adaptive IAS15 integrator. Optionally each particle gets a variational
//! shadow that follows the linearized dynamics; the growth of those
//! deviations feeds a running MEGNO estimate.

pub mod config;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod megno;
pub mod particle;
pub mod simulation;
pub mod state;
pub mod store;
pub mod variational;

pub use error::{NbodyError, Result};

#[cfg(test)]
mod config_test;
#[cfg(test)]
mod megno_test;
