use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A point mass, or the deviation vector shadowing one.
///
/// Real and variational particles share this layout. For a variational
/// particle `position` and `velocity` hold the tangent-space deviation
/// (δr, δv) and `acceleration` holds δa; its `mass` mirrors the real particle
/// it shadows and never sources a force.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    #[serde(default = "Vector3::zeros")]
    pub acceleration: Vector3<f64>,
    pub mass: f64,
}

impl Particle {
    /// Creates a particle with zeroed acceleration
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody::particle::Particle;
    ///
    /// let sun = Particle::new(1.0, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
    /// assert_eq!(sun.mass, 1.0);
    /// assert_eq!(sun.acceleration.norm(), 0.0);
    /// ```
    pub fn new(mass: f64, position: [f64; 3], velocity: [f64; 3]) -> Self {
        Particle {
            position: Vector3::from(position),
            velocity: Vector3::from(velocity),
            acceleration: Vector3::zeros(),
            mass,
        }
    }

    pub fn momentum(&self) -> Vector3<f64> {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.norm_squared()
    }

    pub fn distance_to(&self, other: &Particle) -> f64 {
        (self.position - other.position).norm()
    }

    /// Angular momentum about the origin, r × (m v)
    pub fn angular_momentum(&self) -> Vector3<f64> {
        self.position.cross(&self.momentum())
    }

    /// Squared norm of the phase-space 6-vector (r, v)
    ///
    /// For a variational particle this is its contribution to δ².
    pub fn phase_norm_squared(&self) -> f64 {
        self.position.norm_squared() + self.velocity.norm_squared()
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.position.iter().all(|c| c.is_finite())
            && self.velocity.iter().all(|c| c.is_finite())
            && self.mass.is_finite()
    }
}
