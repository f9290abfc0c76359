//! Time integration for N-body systems
//!
//! This module provides integrators for evolving the particle buffer forward
//! in time. Every integrator advances real and variational particles through
//! the same sub-steps, so the tangent dynamics always follow the trajectory
//! they linearize.
//!
//! - [`Leapfrog`]: fixed-step, symplectic, bit-reproducible
//! - [`Ias15`]: adaptive 15th-order Gauss-Radau predictor-corrector
//!
//! The driver holds one of them as an [`IntegratorVariant`].

use crate::config::{IntegratorKind, LeapfrogForm, SimulationConfig};
use crate::error::Result;
use crate::forces::ForceModel;
use crate::state::SimulationState;
use crate::store::ParticleStore;

pub mod ias15;
pub mod leapfrog;

#[cfg(test)]
mod leapfrog_test;

pub use ias15::{Ias15, Ias15Stats};
pub use leapfrog::Leapfrog;

/// A time integrator for N-body systems
///
/// Integrators advance the particle buffer by computing accelerations from a
/// force model and updating positions and velocities.
pub trait Integrator: Send + Sync {
    /// Advance the system by one accepted step
    ///
    /// Adds the elapsed time to `state.time`, counts the step in
    /// `state.steps`, and returns the elapsed time. Fixed-step integrators
    /// take exactly `state.dt`; adaptive ones may take less and store their
    /// proposal for the next step back into `state.dt`.
    ///
    /// # Arguments
    ///
    /// * `particles` - Particle buffer (modified in place)
    /// * `state` - Clock and physical constants (modified in place)
    /// * `force` - Force model to compute accelerations
    fn step(
        &mut self,
        particles: &mut ParticleStore,
        state: &mut SimulationState,
        force: &dyn ForceModel,
    ) -> Result<f64>;

    /// Advance the system by `n_steps` accepted steps
    ///
    /// # Returns
    ///
    /// Final time after integration
    fn integrate(
        &mut self,
        particles: &mut ParticleStore,
        state: &mut SimulationState,
        n_steps: usize,
        force: &dyn ForceModel,
    ) -> Result<f64> {
        for _ in 0..n_steps {
            self.step(particles, state, force)?;
        }
        Ok(state.time)
    }

    /// Drop anything cached from earlier steps
    ///
    /// Must be called after the particle buffer is changed outside of `step`.
    fn reset(&mut self) {}

    /// Whether the accelerations a step leaves in the buffer belong to its
    /// final positions
    fn synchronized_accelerations(&self) -> bool {
        true
    }
}

/// The integrator a simulation runs with
///
/// A closed set of variants; each wraps a concrete [`Integrator`].
#[derive(Debug, Clone)]
pub enum IntegratorVariant {
    Symplectic(Leapfrog),
    AdaptiveHighOrder(Ias15),
}

impl IntegratorVariant {
    /// Builds the integrator selected by `config`
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody::config::{IntegratorKind, SimulationConfig};
    /// use nbody::integrator::IntegratorVariant;
    ///
    /// let config = SimulationConfig { integrator: IntegratorKind::Ias15, ..Default::default() };
    /// let variant = IntegratorVariant::from_config(&config);
    /// assert_eq!(variant.kind(), IntegratorKind::Ias15);
    /// ```
    pub fn from_config(config: &SimulationConfig) -> Self {
        match config.integrator {
            IntegratorKind::Leapfrog => IntegratorVariant::Symplectic(match config.leapfrog_form {
                LeapfrogForm::Kdk => Leapfrog::new(),
                LeapfrogForm::Dkd => Leapfrog::new_dkd(),
            }),
            IntegratorKind::Ias15 => {
                IntegratorVariant::AdaptiveHighOrder(Ias15::from_config(&config.ias15))
            }
        }
    }

    pub fn kind(&self) -> IntegratorKind {
        match self {
            IntegratorVariant::Symplectic(_) => IntegratorKind::Leapfrog,
            IntegratorVariant::AdaptiveHighOrder(_) => IntegratorKind::Ias15,
        }
    }

    pub fn as_integrator(&self) -> &dyn Integrator {
        match self {
            IntegratorVariant::Symplectic(i) => i,
            IntegratorVariant::AdaptiveHighOrder(i) => i,
        }
    }

    pub fn as_integrator_mut(&mut self) -> &mut dyn Integrator {
        match self {
            IntegratorVariant::Symplectic(i) => i,
            IntegratorVariant::AdaptiveHighOrder(i) => i,
        }
    }
}

impl Integrator for IntegratorVariant {
    fn step(
        &mut self,
        particles: &mut ParticleStore,
        state: &mut SimulationState,
        force: &dyn ForceModel,
    ) -> Result<f64> {
        self.as_integrator_mut().step(particles, state, force)
    }

    fn reset(&mut self) {
        self.as_integrator_mut().reset();
    }

    fn synchronized_accelerations(&self) -> bool {
        self.as_integrator().synchronized_accelerations()
    }
}
