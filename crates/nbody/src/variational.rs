//! Variational (tangent-space) particles
//!
//! Each real particle gets one shadow whose position and velocity hold a
//! deviation vector (δr, δv). The force evaluator drives the shadows with the
//! Jacobian of the gravitational field, so the shadows follow the linearized
//! dynamics around the real trajectory. The growth of the combined deviation
//!
//! ```text
//! δ = sqrt(Σᵢ |δrᵢ|² + |δvᵢ|²)
//! ```
//!
//! is what the MEGNO accumulator measures. Deviations are never
//! renormalized: MEGNO only consumes the logarithmic derivative δ̇/δ, which is
//! independent of the overall scale.

use crate::config::{DeviationSeed, validate_axis, validate_epsilon};
use crate::error::{NbodyError, Result};
use crate::particle::Particle;
use crate::store::ParticleStore;
use nalgebra::Vector3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;
use rand_distr::StandardNormal;

/// Appends one variational particle per real particle
///
/// The initial 6N-dimensional deviation vector has direction chosen by `seed`
/// and length exactly `epsilon`. Each shadow copies the mass of the particle it
/// tracks.
///
/// # Errors
///
/// * `InvalidState` if called twice, or before any real particle exists
/// * `Configuration` for a non-positive or non-finite `epsilon`, or an axis
///   outside `0..6`
///
/// # Examples
///
/// ```
/// use nbody::config::DeviationSeed;
/// use nbody::particle::Particle;
/// use nbody::store::ParticleStore;
/// use nbody::variational::{deviation_magnitude, init_variational};
///
/// let mut store = ParticleStore::new();
/// store.add_particle(Particle::new(1.0, [0.0; 3], [0.0; 3])).unwrap();
/// store.add_particle(Particle::new(1e-3, [1.0, 0.0, 0.0], [0.0, 1.0, 0.0])).unwrap();
///
/// init_variational(&mut store, 1e-8, DeviationSeed::Random(7)).unwrap();
///
/// assert_eq!(store.len(), 4);
/// assert!((deviation_magnitude(&store) - 1e-8).abs() < 1e-20);
/// assert!(init_variational(&mut store, 1e-8, DeviationSeed::Random(7)).is_err());
/// ```
pub fn init_variational(
    particles: &mut ParticleStore,
    epsilon: f64,
    seed: DeviationSeed,
) -> Result<()> {
    if particles.has_variational() {
        return Err(NbodyError::InvalidState(
            "variational particles are already initialized".into(),
        ));
    }
    let n = particles.particle_count();
    if n == 0 {
        return Err(NbodyError::InvalidState(
            "cannot initialize variational particles without real particles".into(),
        ));
    }
    validate_epsilon(epsilon)?;

    let directions: Vec<[f64; 6]> = match seed {
        DeviationSeed::Random(value) => {
            let mut rng = ChaChaRng::seed_from_u64(value);
            (0..n)
                .map(|_| std::array::from_fn(|_| rng.sample(StandardNormal)))
                .collect()
        }
        DeviationSeed::Axis(k) => {
            validate_axis(k)?;
            (0..n)
                .map(|_| std::array::from_fn(|c| if c == k { 1.0 } else { 0.0 }))
                .collect()
        }
    };

    let norm = directions
        .iter()
        .flatten()
        .map(|c| c * c)
        .sum::<f64>()
        .sqrt();
    if !norm.is_normal() {
        return Err(NbodyError::Configuration(
            "initial deviation direction has zero length".into(),
        ));
    }
    let scale = epsilon / norm;

    let shadows = particles
        .real()
        .iter()
        .zip(&directions)
        .map(|(real, c)| Particle {
            position: Vector3::new(c[0], c[1], c[2]) * scale,
            velocity: Vector3::new(c[3], c[4], c[5]) * scale,
            acceleration: Vector3::zeros(),
            mass: real.mass,
        })
        .collect();
    particles.attach_variational(shadows)?;

    tracing::debug!(n, epsilon, ?seed, "seeded variational particles");
    Ok(())
}

/// Magnitude of the combined deviation vector, 0 without variational particles
pub fn deviation_magnitude(particles: &ParticleStore) -> f64 {
    particles
        .variational()
        .iter()
        .map(Particle::phase_norm_squared)
        .sum::<f64>()
        .sqrt()
}

/// Logarithmic growth rate δ̇/δ of the combined deviation vector
///
/// Evaluated analytically from the current deviations and the variational
/// accelerations in the buffer:
///
/// ```text
/// δ̇/δ = Σᵢ (δrᵢ · δvᵢ + δvᵢ · δaᵢ) / δ²
/// ```
///
/// Returns `None` when δ² is zero or subnormal (the deviation collapsed), or
/// when there are no variational particles.
pub fn deviation_growth_rate(particles: &ParticleStore) -> Option<f64> {
    let (numerator, delta2) = particles
        .variational()
        .iter()
        .fold((0.0, 0.0), |(num, d2), p| {
            (
                num + p.position.dot(&p.velocity) + p.velocity.dot(&p.acceleration),
                d2 + p.phase_norm_squared(),
            )
        });

    if !delta2.is_normal() {
        return None;
    }
    let rate = numerator / delta2;
    rate.is_finite().then_some(rate)
}
