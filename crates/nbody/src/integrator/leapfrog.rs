use crate::error::Result;
use crate::forces::ForceModel;
use crate::integrator::Integrator;
use crate::state::SimulationState;
use crate::store::ParticleStore;

/// Symplectic leapfrog integrator (2nd order)
///
/// The leapfrog integrator is a symplectic method that conserves energy
/// and angular momentum to machine precision over long timescales. It's
/// the standard choice for N-body simulations.
///
/// The algorithm alternates between velocity updates (kicks) and position
/// updates (drifts):
///
/// 1. Kick: v(t + dt/2) = v(t) + a(t) * dt/2
/// 2. Drift: x(t + dt) = x(t) + v(t + dt/2) * dt
/// 3. Kick: v(t + dt) = v(t + dt/2) + a(t + dt) * dt/2
///
/// Kicks and drifts act on the whole buffer, so each variational particle is
/// kicked by the Jacobian evaluated on exactly the geometry that kicks the
/// real particles. The step size is `state.dt` and never changes; results are
/// bit-reproducible for identical inputs.
///
/// # Examples
///
/// ```
/// use nbody::config::BoxConfig;
/// use nbody::forces::DirectGravity;
/// use nbody::integrator::{Integrator, Leapfrog};
/// use nbody::particle::Particle;
/// use nbody::state::SimulationState;
/// use nbody::store::ParticleStore;
///
/// let mut store = ParticleStore::new();
/// store.add_particle(Particle::new(1.0, [0.0; 3], [0.0; 3])).unwrap();
/// store.add_particle(Particle::new(1e-3, [1.0, 0.0, 0.0], [0.0, 1.0, 0.0])).unwrap();
/// let mut state = SimulationState::new(0.01, 1.0, BoxConfig::default());
///
/// let mut integrator = Leapfrog::new();
/// let elapsed = integrator.step(&mut store, &mut state, &DirectGravity).unwrap();
///
/// assert_eq!(elapsed, 0.01);
/// assert!(state.time > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leapfrog {
    /// Whether to use the drift-kick-drift (DKD) variant
    ///
    /// If true, uses DKD form with a single force evaluation at the midpoint.
    /// If false, uses KDK form (kick-drift-kick).
    /// For gravity-only simulations, both are second order and symplectic.
    pub use_dkd: bool,
}

impl Leapfrog {
    /// Creates a new leapfrog integrator with default settings
    ///
    /// Uses the kick-drift-kick (KDK) form by default.
    pub fn new() -> Self {
        Self { use_dkd: false }
    }

    /// Creates a leapfrog integrator using drift-kick-drift form
    pub fn new_dkd() -> Self {
        Self { use_dkd: true }
    }

    /// Perform a kick step: update velocities from the stored accelerations
    fn kick(&self, particles: &mut ParticleStore, dt: f64) {
        particles.all_mut().iter_mut().for_each(|p| {
            p.velocity += p.acceleration * dt;
        });
    }

    /// Perform a drift step: update positions
    fn drift(&self, particles: &mut ParticleStore, dt: f64) {
        particles.all_mut().iter_mut().for_each(|p| {
            p.position += p.velocity * dt;
        });
    }
}

impl Default for Leapfrog {
    fn default() -> Self {
        Self::new()
    }
}

impl Integrator for Leapfrog {
    fn step(
        &mut self,
        particles: &mut ParticleStore,
        state: &mut SimulationState,
        force: &dyn ForceModel,
    ) -> Result<f64> {
        let dt = state.dt;

        if self.use_dkd {
            // Drift-Kick-Drift form
            self.drift(particles, dt / 2.0);
            force.accelerations(particles, state)?;
            self.kick(particles, dt);
            self.drift(particles, dt / 2.0);
        } else {
            // Kick-Drift-Kick form (default)
            force.accelerations(particles, state)?;
            self.kick(particles, dt / 2.0);
            self.drift(particles, dt);
            force.accelerations(particles, state)?;
            self.kick(particles, dt / 2.0);
        }

        state.advance(dt);
        Ok(dt)
    }

    /// DKD leaves the midpoint accelerations behind
    fn synchronized_accelerations(&self) -> bool {
        !self.use_dkd
    }
}
