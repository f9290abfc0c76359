//! Direct N-body gravity (O(N²) implementation) and its tangent map

use crate::config::BoxConfig;
use crate::error::{NbodyError, Result};
use crate::forces::ForceModel;
use crate::state::SimulationState;
use crate::store::ParticleStore;
use nalgebra::Vector3;

/// Direct O(N²) gravitational force computation
///
/// Sums the Newtonian attraction over every pair of real particles, once per
/// pair, without softening:
///
/// ```text
/// aᵢ = G Σⱼ≠ᵢ mⱼ dᵢⱼ / |dᵢⱼ|³,   dᵢⱼ = rⱼ − rᵢ
/// ```
///
/// When variational particles are present, the same pass applies the Jacobian
/// of that field to the deviation vectors:
///
/// ```text
/// δaᵢ = G Σⱼ≠ᵢ mⱼ [ δᵢⱼ / |dᵢⱼ|³ − 3 (dᵢⱼ · δᵢⱼ) dᵢⱼ / |dᵢⱼ|⁵ ],   δᵢⱼ = δrⱼ − δrᵢ
/// ```
///
/// Both sums read the one `dᵢⱼ` computed for the pair, so real and tangent
/// dynamics always see identical geometry.
///
/// Best for:
/// - Few-body systems (planetary systems, N < 100)
/// - Chaos indicators, which need the exact linearization
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectGravity;

impl ForceModel for DirectGravity {
    fn accelerations(&self, particles: &mut ParticleStore, state: &SimulationState) -> Result<()> {
        let g = state.g;
        let (real, shadows) = particles.split_mut();
        let variational = !shadows.is_empty();

        real.iter_mut()
            .chain(shadows.iter_mut())
            .for_each(|p| p.acceleration = Vector3::zeros());

        let n = real.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let d = displacement(&state.domain, &real[i].position, &real[j].position);
                let r2 = d.norm_squared();
                if r2 == 0.0 {
                    return Err(NbodyError::SingularGeometry { i, j });
                }
                let r = r2.sqrt();
                let inv_r3 = 1.0 / (r2 * r);
                let (m_i, m_j) = (real[i].mass, real[j].mass);

                real[i].acceleration += d * (g * m_j * inv_r3);
                real[j].acceleration -= d * (g * m_i * inv_r3);

                if variational {
                    let dd = shadows[j].position - shadows[i].position;
                    let inv_r5 = inv_r3 / r2;
                    let jacobian = dd * inv_r3 - d * (3.0 * d.dot(&dd) * inv_r5);

                    shadows[i].acceleration += jacobian * (g * m_j);
                    shadows[j].acceleration -= jacobian * (g * m_i);
                }
            }
        }

        Ok(())
    }

    fn potential_energy(&self, particles: &ParticleStore, state: &SimulationState) -> Result<f64> {
        let real = particles.real();
        let mut potential = 0.0;
        for (i, a) in real.iter().enumerate() {
            for (offset, b) in real[i + 1..].iter().enumerate() {
                let r = displacement(&state.domain, &a.position, &b.position).norm();
                if r == 0.0 {
                    return Err(NbodyError::SingularGeometry { i, j: i + 1 + offset });
                }
                potential -= state.g * a.mass * b.mass / r;
            }
        }
        Ok(potential)
    }

    /// Each pair term is off by about ε·(1 + 2(|rᵢ| + |rⱼ|)/|dᵢⱼ|) of itself:
    /// the rounding of the term plus the change of G mⱼ / |dᵢⱼ|² under position
    /// errors of one unit in the last place
    fn roundoff_acceleration(&self, particles: &ParticleStore, state: &SimulationState) -> f64 {
        let real = particles.real();
        let mut noise = vec![0.0; real.len()];

        for i in 0..real.len() {
            for j in (i + 1)..real.len() {
                let r = displacement(&state.domain, &real[i].position, &real[j].position).norm();
                if r == 0.0 {
                    continue;
                }
                let lever = 1.0 + 2.0 * (real[i].position.norm() + real[j].position.norm()) / r;
                let term = state.g.abs() * lever / (r * r);
                noise[i] += term * real[j].mass.abs();
                noise[j] += term * real[i].mass.abs();
            }
        }

        f64::EPSILON * noise.into_iter().fold(0.0, f64::max)
    }
}

/// Displacement `to − from`, wrapped to the nearest image on periodic axes
///
/// # Examples
///
/// ```
/// use nalgebra::Vector3;
/// use nbody::config::BoxConfig;
/// use nbody::forces::gravity::displacement;
///
/// let domain = BoxConfig::periodic(10.0);
/// let d = displacement(&domain, &Vector3::new(4.5, 0.0, 0.0), &Vector3::new(-4.5, 0.0, 0.0));
/// assert!((d.x - 1.0).abs() < 1e-12);
/// ```
pub fn displacement(domain: &BoxConfig, from: &Vector3<f64>, to: &Vector3<f64>) -> Vector3<f64> {
    let mut d = to - from;
    if domain.is_periodic() {
        for axis in 0..3 {
            if domain.periodic[axis] {
                let size = domain.size[axis];
                d[axis] -= size * (d[axis] / size).round();
            }
        }
    }
    d
}
