use crate::config::{BoxConfig, SimulationConfig};

/// Global state of a run, threaded explicitly through every step
///
/// The particle buffer lives separately in
/// [`ParticleStore`](crate::store::ParticleStore); this holds the clock and the
/// physical constants the force evaluator and integrators read.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    /// Current simulation time
    pub time: f64,
    /// Fixed step for leapfrog, next proposed step for IAS15
    pub dt: f64,
    /// Number of accepted steps
    pub steps: u64,
    /// Gravitational constant
    pub g: f64,
    pub domain: BoxConfig,
}

impl SimulationState {
    /// Creates a state at `t = 0`
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody::config::BoxConfig;
    /// use nbody::state::SimulationState;
    ///
    /// let state = SimulationState::new(0.01, 1.0, BoxConfig::open(10.0));
    /// assert_eq!(state.time, 0.0);
    /// assert_eq!(state.steps, 0);
    /// ```
    pub fn new(dt: f64, g: f64, domain: BoxConfig) -> Self {
        Self {
            time: 0.0,
            dt,
            steps: 0,
            g,
            domain,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.dt, config.g, config.domain)
    }

    /// Records an accepted step of length `dt`
    pub(crate) fn advance(&mut self, dt: f64) {
        self.time += dt;
        self.steps += 1;
    }
}
