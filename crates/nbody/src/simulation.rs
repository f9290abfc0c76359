//! Simulation driver
//!
//! [`Simulation`] owns the particle buffer, the clock, the selected
//! integrator, the force model and the MEGNO accumulator, and runs them in
//! lock-step. Output is left to the caller: [`Simulation::integrate`] hands
//! the simulation to a heartbeat closure after every accepted step, and
//! [`Cadence`] decides when such a heartbeat should actually report.

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::forces::{DirectGravity, ForceModel};
use crate::integrator::{Integrator, IntegratorVariant};
use crate::megno::Megno;
use crate::particle::Particle;
use crate::state::SimulationState;
use crate::store::ParticleStore;
use crate::variational::{deviation_growth_rate, init_variational};

/// A complete N-body run
///
/// # Examples
///
/// ```
/// use nbody::config::SimulationConfig;
/// use nbody::particle::Particle;
/// use nbody::simulation::Simulation;
///
/// let config = SimulationConfig { dt: 0.25, ..Default::default() };
/// let mut sim = Simulation::new(config).unwrap();
/// sim.add_particle(Particle::new(1.0, [0.0; 3], [0.0; 3])).unwrap();
/// sim.add_particle(Particle::new(1e-3, [1.0, 0.0, 0.0], [0.0, 1.0, 0.0])).unwrap();
/// sim.move_to_center_of_momentum().unwrap();
/// sim.init_variational().unwrap();
///
/// let mut beats = 0;
/// sim.integrate(1.0, |_| beats += 1).unwrap();
///
/// assert_eq!(beats, 4);
/// assert_eq!(sim.time(), 1.0);
/// assert_eq!(sim.megno().elapsed(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    state: SimulationState,
    particles: ParticleStore,
    integrator: IntegratorVariant,
    force: DirectGravity,
    megno: Megno,
    last_step: f64,
}

impl Simulation {
    /// Builds an empty simulation
    ///
    /// # Errors
    ///
    /// `Configuration` if any field of `config` is out of range.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let state = SimulationState::from_config(&config);
        let integrator = IntegratorVariant::from_config(&config);
        tracing::debug!(integrator = ?integrator.kind(), dt = config.dt, g = config.g, "created simulation");

        Ok(Self {
            config,
            state,
            particles: ParticleStore::new(),
            integrator,
            force: DirectGravity,
            megno: Megno::new(),
            last_step: 0.0,
        })
    }

    /// Adds a real particle, returning its index
    ///
    /// # Errors
    ///
    /// See [`ParticleStore::add_particle`].
    pub fn add_particle(&mut self, particle: Particle) -> Result<usize> {
        let idx = self.particles.add_particle(particle)?;
        self.integrator.reset();
        Ok(idx)
    }

    pub fn particle_count(&self) -> usize {
        self.particles.particle_count()
    }

    /// Shifts the real particles into the centre-of-momentum frame
    pub fn move_to_center_of_momentum(&mut self) -> Result<()> {
        self.particles.move_to_center_of_momentum()?;
        self.integrator.reset();
        Ok(())
    }

    /// Seeds one variational particle per real particle using the configured
    /// deviation size and seed, and starts the MEGNO clock
    pub fn init_variational(&mut self) -> Result<()> {
        let variational = self.config.variational;
        init_variational(&mut self.particles, variational.epsilon, variational.seed)?;
        self.megno = Megno::new();
        self.integrator.reset();
        Ok(())
    }

    /// Takes one accepted step and returns the time it covered
    ///
    /// When variational particles are present the MEGNO accumulator is
    /// updated from the deviation at the end of the step. Integrators that
    /// leave midpoint accelerations behind get one extra force evaluation at
    /// the final positions first, so δ̇/δ reads δr, δv and δa at one instant.
    ///
    /// # Errors
    ///
    /// Fatal integrator errors (`SingularGeometry`, `StepSizeCollapse`) are
    /// returned unchanged and the clock stays at the last accepted step.
    pub fn step(&mut self) -> Result<f64> {
        let elapsed = self
            .integrator
            .step(&mut self.particles, &mut self.state, &self.force)?;
        self.last_step = elapsed;

        if self.particles.has_variational() {
            if !self.integrator.synchronized_accelerations() {
                self.force.accelerations(&mut self.particles, &self.state)?;
            }
            self.megno
                .update(elapsed, deviation_growth_rate(&self.particles));
        }
        Ok(elapsed)
    }

    /// Steps until the clock reaches `target_time`, calling `heartbeat` after
    /// every accepted step
    ///
    /// The last step may overshoot `target_time` unless `exact_finish_time`
    /// is set, in which case it is shortened to land on it and the step size
    /// in effect before is restored afterwards.
    ///
    /// Returns the final time.
    pub fn integrate<F>(&mut self, target_time: f64, mut heartbeat: F) -> Result<f64>
    where
        F: FnMut(&Simulation),
    {
        tracing::info!(
            t = self.state.time,
            target_time,
            n = self.particles.particle_count(),
            variational = self.particles.has_variational(),
            "integrating"
        );

        while self.state.time < target_time {
            let nominal = self.state.dt;
            let clipped = self.config.exact_finish_time && self.state.time + nominal > target_time;
            if clipped {
                self.state.dt = target_time - self.state.time;
            }

            let result = self.step();
            if clipped {
                self.state.dt = nominal;
            }
            if let Err(err) = result {
                tracing::error!(t = self.state.time, %err, "integration aborted");
                return Err(err);
            }

            heartbeat(self);
        }

        tracing::info!(
            t = self.state.time,
            steps = self.state.steps,
            megno = self.megno.current_value(),
            "integration finished"
        );
        Ok(self.state.time)
    }

    pub fn time(&self) -> f64 {
        self.state.time
    }

    /// Length of the last accepted step, 0 before the first one
    pub fn last_step(&self) -> f64 {
        self.last_step
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn particles(&self) -> &ParticleStore {
        &self.particles
    }

    pub fn megno(&self) -> &Megno {
        &self.megno
    }

    /// Current MEGNO value, 0 before the first step with a valid deviation
    pub fn current_megno(&self) -> f64 {
        self.megno.current_value()
    }

    /// Total energy of the real particles, kinetic plus potential
    pub fn energy(&self) -> Result<f64> {
        let potential = self.force.potential_energy(&self.particles, &self.state)?;
        Ok(self.particles.kinetic_energy() + potential)
    }

    pub fn integrator(&self) -> &IntegratorVariant {
        &self.integrator
    }
}

/// Output cadence for heartbeats
///
/// Reports `true` for the step that carried the clock across a multiple of
/// `interval`, so a heartbeat fires once per interval whatever the step size.
///
/// # Examples
///
/// ```
/// use nbody::simulation::Cadence;
///
/// let every_year = Cadence::new(365.25);
/// assert!(every_year.crossed(370.0, 10.0));
/// assert!(!every_year.crossed(380.0, 10.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cadence {
    interval: f64,
}

impl Cadence {
    pub fn new(interval: f64) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Whether a step of length `dt` ending at `time` crossed a multiple of
    /// the interval
    pub fn crossed(&self, time: f64, dt: f64) -> bool {
        if self.interval.is_nan() || self.interval <= 0.0 {
            return true;
        }
        (time / self.interval).floor() != ((time - dt) / self.interval).floor()
    }

    /// [`Cadence::crossed`] for the last step `sim` took
    pub fn check(&self, sim: &Simulation) -> bool {
        sim.last_step() > 0.0 && self.crossed(sim.time(), sim.last_step())
    }
}
