//! Configuration types for setting up a simulation.
//!
//! Everything here is plain data that derives `serde` traits, so a caller may
//! build it in code or deserialize it (missing fields fall back to defaults):
//!
//! ```json
//! {
//!   "integrator": "ias15",
//!   "dt": 10.0,
//!   "g": 2.959122082855911e-4,
//!   "domain": { "size": [100.0, 100.0, 100.0], "periodic": [false, false, false] },
//!   "variational": { "epsilon": 1e-16, "seed": { "random": 42 } },
//!   "ias15": { "epsilon": 1e-9, "minDt": 0.0 }
//! }
//! ```
//!
//! [`SimulationConfig::validate`] rejects malformed values before any state is
//! built, so a run never starts from a bad configuration.

use crate::error::{NbodyError, Result};
use serde::{Deserialize, Serialize};

/// Which integrator the driver advances the system with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegratorKind {
    /// Fixed-step symplectic leapfrog
    #[default]
    Leapfrog,
    /// Adaptive 15th-order Gauss-Radau predictor-corrector
    Ias15,
}

/// Ordering of the leapfrog sub-steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeapfrogForm {
    /// Kick-drift-kick: two force evaluations per step, accelerations in the
    /// buffer match the final positions.
    Kdk,
    /// Drift-kick-drift: one force evaluation per step at the midpoint.
    #[default]
    Dkd,
}

/// Simulation domain
///
/// Only periodic axes have an effect: displacements along them are wrapped to
/// the nearest image. Open axes use the raw displacement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoxConfig {
    /// Edge length per axis
    pub size: [f64; 3],
    /// Periodic flag per axis
    pub periodic: [bool; 3],
}

impl BoxConfig {
    /// A cube of edge `size` with open boundaries on every axis
    pub fn open(size: f64) -> Self {
        Self {
            size: [size; 3],
            periodic: [false; 3],
        }
    }

    /// A cube of edge `size` that is periodic along every axis
    pub fn periodic(size: f64) -> Self {
        Self {
            size: [size; 3],
            periodic: [true; 3],
        }
    }

    pub fn is_periodic(&self) -> bool {
        self.periodic.iter().any(|&p| p)
    }

    fn validate(&self) -> Result<()> {
        for (axis, &edge) in self.size.iter().enumerate() {
            if !(edge.is_finite() && edge > 0.0) {
                return Err(NbodyError::Configuration(format!(
                    "box size along axis {axis} must be positive and finite, got {edge}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self::open(100.0)
    }
}

/// How the initial deviation vector of the variational particles is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviationSeed {
    /// Gaussian direction in the 6N-dimensional tangent space, drawn from a
    /// ChaCha generator seeded with the given value
    Random(u64),
    /// Every shadow deviates along phase-space component `k` (0..3 position,
    /// 3..6 velocity)
    Axis(usize),
}

impl Default for DeviationSeed {
    fn default() -> Self {
        DeviationSeed::Random(0)
    }
}

/// Variational particle seeding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VariationalConfig {
    /// Initial magnitude of the full deviation vector
    pub epsilon: f64,
    pub seed: DeviationSeed,
}

impl Default for VariationalConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-16,
            seed: DeviationSeed::default(),
        }
    }
}

/// Tuning of the adaptive integrator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ias15Config {
    /// Relative tolerance on the highest-order coefficient
    pub epsilon: f64,
    /// Smallest step the integrator may shrink to before giving up
    pub min_dt: f64,
    /// Largest step the integrator may grow to (0 disables the cap)
    pub max_dt: f64,
}

impl Default for Ias15Config {
    fn default() -> Self {
        Self {
            epsilon: 1e-9,
            min_dt: 0.0,
            max_dt: 0.0,
        }
    }
}

impl Ias15Config {
    fn validate(&self) -> Result<()> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(NbodyError::Configuration(format!(
                "IAS15 tolerance must be positive and finite, got {}",
                self.epsilon
            )));
        }
        if !(self.min_dt.is_finite() && self.min_dt >= 0.0) {
            return Err(NbodyError::Configuration(format!(
                "IAS15 minimum step must be non-negative, got {}",
                self.min_dt
            )));
        }
        if !(self.max_dt.is_finite() && self.max_dt >= 0.0) {
            return Err(NbodyError::Configuration(format!(
                "IAS15 maximum step must be non-negative, got {}",
                self.max_dt
            )));
        }
        if self.max_dt > 0.0 && self.max_dt < self.min_dt {
            return Err(NbodyError::Configuration(format!(
                "IAS15 maximum step {} is below minimum step {}",
                self.max_dt, self.min_dt
            )));
        }
        Ok(())
    }
}

/// Complete simulation setup
///
/// # Examples
///
/// ```
/// use nbody::config::{IntegratorKind, SimulationConfig};
///
/// let config = SimulationConfig {
///     integrator: IntegratorKind::Ias15,
///     dt: 10.0,
///     ..SimulationConfig::default()
/// };
/// assert!(config.validate().is_ok());
///
/// let broken = SimulationConfig { dt: -1.0, ..SimulationConfig::default() };
/// assert!(broken.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    pub integrator: IntegratorKind,
    pub leapfrog_form: LeapfrogForm,
    /// Fixed step (leapfrog) or initial proposed step (IAS15)
    pub dt: f64,
    /// Gravitational constant
    pub g: f64,
    pub domain: BoxConfig,
    pub variational: VariationalConfig,
    pub ias15: Ias15Config,
    /// Clip the final step of `integrate` so the run ends on the target time
    pub exact_finish_time: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            integrator: IntegratorKind::default(),
            leapfrog_form: LeapfrogForm::default(),
            dt: 0.001,
            g: 1.0,
            domain: BoxConfig::default(),
            variational: VariationalConfig::default(),
            ias15: Ias15Config::default(),
            exact_finish_time: false,
        }
    }
}

impl SimulationConfig {
    /// Checks every field, returning the first problem found
    pub fn validate(&self) -> Result<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(NbodyError::Configuration(format!(
                "time step must be positive and finite, got {}",
                self.dt
            )));
        }
        if !(self.g.is_finite() && self.g > 0.0) {
            return Err(NbodyError::Configuration(format!(
                "gravitational constant must be positive and finite, got {}",
                self.g
            )));
        }
        validate_epsilon(self.variational.epsilon)?;
        if let DeviationSeed::Axis(k) = self.variational.seed {
            validate_axis(k)?;
        }
        self.domain.validate()?;
        self.ias15.validate()
    }
}

pub(crate) fn validate_epsilon(epsilon: f64) -> Result<()> {
    if epsilon.is_finite() && epsilon > 0.0 {
        Ok(())
    } else {
        Err(NbodyError::Configuration(format!(
            "variational epsilon must be positive and finite, got {epsilon}"
        )))
    }
}

pub(crate) fn validate_axis(k: usize) -> Result<()> {
    if k < 6 {
        Ok(())
    } else {
        Err(NbodyError::Configuration(format!(
            "deviation axis must be in 0..6, got {k}"
        )))
    }
}
