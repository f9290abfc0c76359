use crate::error::{NbodyError, Result};
use crate::particle::Particle;
use nalgebra::Vector3;

/// Flat particle buffer holding real particles followed by their shadows
///
/// Indices `[0, N)` are the real particles. Once the variational subsystem is
/// initialized, indices `[N, 2N)` hold one variational particle per real
/// particle, in the same order: shadow `N + i` tracks real particle `i`.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    n_real: usize,
    variational: bool,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a real particle and returns its index
    ///
    /// # Errors
    ///
    /// * `InvalidState` once variational particles have been added
    /// * `Configuration` for a non-positive or non-finite mass, or a
    ///   non-finite position or velocity
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody::particle::Particle;
    /// use nbody::store::ParticleStore;
    ///
    /// let mut store = ParticleStore::new();
    /// let idx = store.add_particle(Particle::new(1.0, [0.0; 3], [0.0; 3])).unwrap();
    ///
    /// assert_eq!(idx, 0);
    /// assert_eq!(store.particle_count(), 1);
    /// assert!(store.add_particle(Particle::new(0.0, [1.0, 0.0, 0.0], [0.0; 3])).is_err());
    /// ```
    pub fn add_particle(&mut self, particle: Particle) -> Result<usize> {
        if self.variational {
            return Err(NbodyError::InvalidState(
                "cannot add a particle after variational particles were initialized".into(),
            ));
        }
        if !particle.is_finite() {
            return Err(NbodyError::Configuration(format!(
                "particle {} has a non-finite component",
                self.n_real
            )));
        }
        if particle.mass <= 0.0 {
            return Err(NbodyError::Configuration(format!(
                "particle {} has non-positive mass {}",
                self.n_real, particle.mass
            )));
        }

        let idx = self.n_real;
        self.particles.push(Particle {
            acceleration: Vector3::zeros(),
            ..particle
        });
        self.n_real += 1;
        Ok(idx)
    }

    /// Number of real particles, N
    pub fn particle_count(&self) -> usize {
        self.n_real
    }

    /// Length of the whole buffer (N, or 2N once variational)
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn has_variational(&self) -> bool {
        self.variational
    }

    pub fn real(&self) -> &[Particle] {
        &self.particles[..self.n_real]
    }

    pub fn real_mut(&mut self) -> &mut [Particle] {
        &mut self.particles[..self.n_real]
    }

    /// Shadow particles; empty before variational initialization
    pub fn variational(&self) -> &[Particle] {
        &self.particles[self.n_real..]
    }

    pub fn variational_mut(&mut self) -> &mut [Particle] {
        &mut self.particles[self.n_real..]
    }

    /// The whole buffer, real followed by variational
    pub fn all(&self) -> &[Particle] {
        &self.particles
    }

    pub fn all_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Simultaneous mutable access to the real and variational halves
    pub fn split_mut(&mut self) -> (&mut [Particle], &mut [Particle]) {
        self.particles.split_at_mut(self.n_real)
    }

    /// Appends the shadow set; called once by the variational subsystem
    pub(crate) fn attach_variational(&mut self, shadows: Vec<Particle>) -> Result<()> {
        if self.variational {
            return Err(NbodyError::InvalidState(
                "variational particles are already initialized".into(),
            ));
        }
        if shadows.len() != self.n_real {
            return Err(NbodyError::InvalidState(format!(
                "expected {} variational particles, got {}",
                self.n_real,
                shadows.len()
            )));
        }
        self.particles.extend(shadows);
        self.variational = true;
        Ok(())
    }

    /// Total mass of the real particles
    pub fn total_mass(&self) -> f64 {
        self.real().iter().map(|p| p.mass).sum()
    }

    /// Total momentum of the real particles
    ///
    /// This should stay at its initial value for an isolated system (useful for
    /// checking numerical drift)
    pub fn total_momentum(&self) -> Vector3<f64> {
        self.real()
            .iter()
            .map(|p| p.momentum())
            .fold(Vector3::zeros(), |acc, p| acc + p)
    }

    /// Total angular momentum of the real particles about the origin
    pub fn total_angular_momentum(&self) -> Vector3<f64> {
        self.real()
            .iter()
            .map(|p| p.angular_momentum())
            .fold(Vector3::zeros(), |acc, l| acc + l)
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.real().iter().map(|p| p.kinetic_energy()).sum()
    }

    /// Mass-weighted position and velocity of the real particles
    ///
    /// Returns zero vectors for an empty store.
    pub fn center_of_mass(&self) -> (Vector3<f64>, Vector3<f64>) {
        let mass = self.total_mass();
        if mass <= 0.0 {
            return (Vector3::zeros(), Vector3::zeros());
        }
        let (r, v) = self.real().iter().fold(
            (Vector3::zeros(), Vector3::zeros()),
            |(r, v), p| (r + p.position * p.mass, v + p.velocity * p.mass),
        );
        (r / mass, v / mass)
    }

    /// Shifts the real particles into the centre-of-momentum frame
    ///
    /// # Errors
    ///
    /// `InvalidState` once variational particles exist, since the shift must
    /// happen before the deviations are seeded.
    pub fn move_to_center_of_momentum(&mut self) -> Result<()> {
        if self.variational {
            return Err(NbodyError::InvalidState(
                "cannot change frame after variational particles were initialized".into(),
            ));
        }
        let (r_com, v_com) = self.center_of_mass();
        self.real_mut().iter_mut().for_each(|p| {
            p.position -= r_com;
            p.velocity -= v_com;
        });
        Ok(())
    }
}
