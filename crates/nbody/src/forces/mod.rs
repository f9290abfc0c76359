//! Force models for N-body simulations
//!
//! This module provides the `ForceModel` trait and the direct-summation
//! gravity that implements it, including the linearized force that drives the
//! variational particles.

use crate::error::Result;
use crate::state::SimulationState;
use crate::store::ParticleStore;

pub mod gravity;


pub use gravity::DirectGravity;

/// Gaussian gravitational constant k (AU, days, solar masses)
pub const GAUSSIAN_K: f64 = 0.01720209895;

/// Gravitational constant in AU³ M☉⁻¹ day⁻², k²
pub const G_AU_DAY: f64 = GAUSSIAN_K * GAUSSIAN_K;

/// Gravitational constant in AU³ M☉⁻¹ year⁻²
/// G = 4π² ≈ 39.478417
pub const G_AU_YEAR: f64 = 39.478417;

/// A source of acceleration on every particle in the buffer
///
/// Implementations write `acceleration` in place for the real particles and,
/// when the store carries variational particles, the linearized acceleration
/// of each shadow evaluated on the same real geometry.
///
/// # Examples
///
/// ```
/// use nbody::config::BoxConfig;
/// use nbody::forces::{DirectGravity, ForceModel};
/// use nbody::particle::Particle;
/// use nbody::state::SimulationState;
/// use nbody::store::ParticleStore;
///
/// let mut store = ParticleStore::new();
/// store.add_particle(Particle::new(1.0, [0.0, 0.0, 0.0], [0.0; 3])).unwrap();
/// store.add_particle(Particle::new(1e-3, [1.0, 0.0, 0.0], [0.0; 3])).unwrap();
///
/// let state = SimulationState::new(0.01, 1.0, BoxConfig::default());
/// DirectGravity.accelerations(&mut store, &state).unwrap();
///
/// // The light body is pulled toward the heavy one
/// assert!(store.real()[1].acceleration.x < 0.0);
/// ```
pub trait ForceModel: Send + Sync {
    /// Overwrite the acceleration of every particle in `particles`
    ///
    /// # Errors
    ///
    /// `SingularGeometry` if two real particles coincide.
    fn accelerations(&self, particles: &mut ParticleStore, state: &SimulationState) -> Result<()>;

    /// Potential energy of the real particles (optional)
    ///
    /// Default implementation returns 0.0. Override for force models
    /// that contribute to potential energy (e.g., gravity).
    fn potential_energy(&self, _particles: &ParticleStore, _state: &SimulationState) -> Result<f64> {
        Ok(0.0)
    }

    /// Largest acceleration error on a real particle caused by rounding the
    /// positions and the summed terms to `f64`
    ///
    /// Adaptive integrators use it as the noise floor of their error
    /// estimate. The default of 0.0 means unknown.
    fn roundoff_acceleration(&self, _particles: &ParticleStore, _state: &SimulationState) -> f64 {
        0.0
    }
}
