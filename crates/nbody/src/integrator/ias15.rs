//! Adaptive 15th-order Gauss-Radau integrator (IAS15)
//!
//! Each step expands the acceleration over the step as a polynomial in the
//! normalized time h ∈ [0, 1]:
//!
//! ```text
//! a(h) = a₀ + b₀ h + b₁ h² + … + b₆ h⁷
//! ```
//!
//! The seven coefficients are found by a predictor-corrector iteration that
//! samples the force at the Gauss-Radau nodes. The size of the last
//! coefficient relative to the acceleration measures the truncation error and
//! sets the next step:
//!
//! ```text
//! dt_next = dt · (ε / (max|b₆| / max|a|))^(1/7)
//! ```
//!
//! A step whose proposed successor is much smaller than itself is rejected and
//! retried. Coefficients are extrapolated from one step to the next, so a
//! smooth orbit typically converges in two iterations.
//!
//! Positions are rounded to `f64` before every force evaluation, which puts a
//! floor under the b₆ estimate that no step size can get below. The floor is
//! estimated from [`ForceModel::roundoff_acceleration`] at the start of each
//! step, and the controller never aims for a tolerance tighter than it. The
//! running positions and velocities carry Kahan compensation terms so that
//! long runs do not accumulate the rounding of every update.
//!
//! # References
//! - Rein & Spiegel (2015) MNRAS 446, 1424 - "IAS15: a fast, adaptive,
//!   high-order integrator for gravitational dynamics"
//! - Everhart (1985) - "An efficient integrator that uses Gauss-Radau spacings"

use crate::config::Ias15Config;
use crate::error::{NbodyError, Result};
use crate::forces::ForceModel;
use crate::integrator::Integrator;
use crate::state::SimulationState;
use crate::store::ParticleStore;

/// Gauss-Radau nodes on [0, 1], including the left endpoint
const NODES: [f64; 8] = [
    0.0,
    0.0562625605369221464656521910318,
    0.180240691736892364987579942780,
    0.352624717113169637373907769648,
    0.547153626330555383001448554766,
    0.734210177215410531523210605558,
    0.885320946839095768090359771030,
    0.977520613561287501891174488626,
];

/// Weights of a₀, b₀…b₆ in the position polynomial, ∫∫ hᵏ
const POSITION_WEIGHTS: [f64; 8] = [
    1.0 / 2.0,
    1.0 / 6.0,
    1.0 / 12.0,
    1.0 / 20.0,
    1.0 / 30.0,
    1.0 / 42.0,
    1.0 / 56.0,
    1.0 / 72.0,
];

/// Weights of a₀, b₀…b₆ in the velocity polynomial, ∫ hᵏ
const VELOCITY_WEIGHTS: [f64; 8] = [
    1.0,
    1.0 / 2.0,
    1.0 / 3.0,
    1.0 / 4.0,
    1.0 / 5.0,
    1.0 / 6.0,
    1.0 / 7.0,
    1.0 / 8.0,
];

/// Ratio between proposed and attempted step below which a step is rejected;
/// its inverse caps the growth of the step.
const SAFETY_FACTOR: f64 = 0.25;

/// Converged when the last correction to b₆ is this small relative to a
const CORRECTOR_TOLERANCE: f64 = 1e-16;

const MAX_ITERATIONS: usize = 12;

/// Step ratios above this make extrapolated coefficients useless
const MAX_PREDICTION_RATIO: f64 = 20.0;

/// Proposed steps shorter than this many units in the last place of the
/// clock no longer make progress
const STALL_ULPS: f64 = 64.0;

/// One coefficient vector per polynomial order
type Coefficients = [Vec<f64>; 7];

fn zeroed(len: usize) -> Coefficients {
    std::array::from_fn(|_| vec![0.0; len])
}

/// Largest finite, non-zero magnitude in `values`, 0 if there is none
fn largest_magnitude(values: &[f64]) -> f64 {
    values
        .iter()
        .map(|v| v.abs())
        .filter(|v| v.is_normal())
        .fold(0.0_f64, f64::max)
}

/// Kahan summation: adds `term` to `sum`, carrying the lost low-order bits in
/// `compensation` (the true value is `sum − compensation`)
fn compensated_add(sum: &mut f64, compensation: &mut f64, term: f64) {
    let y = term - *compensation;
    let t = *sum + y;
    *compensation = (t - *sum) - y;
    *sum = t;
}

/// Conversion tables between the divided-difference form `g` and the power
/// form `b` of the acceleration polynomial
///
/// Derived once from [`NODES`]:
/// - `rr[i][j] = hᵢ − hⱼ`
/// - `c[m][k]`: coefficient of hᵏ in Πᵢ₌₁..ₘ (h − hᵢ), so bₖ = Σₘ c[m][k] gₘ
/// - `d[j][k]`: complete homogeneous polynomial of degree j−k in h₁…hₖ₊₁,
///   so gₖ = Σⱼ d[j][k] bⱼ
/// - `noise_gain`: RMS factor by which independent errors in the eight
///   acceleration samples show up in b₆, the divided difference over all nodes
#[derive(Debug, Clone)]
struct RadauTables {
    rr: [[f64; 8]; 8],
    c: [[f64; 7]; 7],
    d: [[f64; 7]; 7],
    noise_gain: f64,
}

impl RadauTables {
    fn new() -> Self {
        let mut rr = [[0.0; 8]; 8];
        for (i, row) in rr.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = NODES[i] - NODES[j];
            }
        }

        let mut c = [[0.0; 7]; 7];
        let mut poly = [0.0; 8];
        poly[0] = 1.0;
        for (m, row) in c.iter_mut().enumerate() {
            if m > 0 {
                // poly ← poly · (h − h_m)
                for k in (0..=m).rev() {
                    let lower = if k > 0 { poly[k - 1] } else { 0.0 };
                    poly[k] = lower - NODES[m] * poly[k];
                }
            }
            row[..=m].copy_from_slice(&poly[..=m]);
        }

        // hom[p][r]: complete homogeneous polynomial of degree r in h₁…hₚ
        let mut hom = [[0.0; 8]; 8];
        hom[0][0] = 1.0;
        for p in 1..8 {
            hom[p][0] = 1.0;
            for r in 1..8 {
                hom[p][r] = hom[p - 1][r] + NODES[p] * hom[p][r - 1];
            }
        }
        let mut d = [[0.0; 7]; 7];
        for (j, row) in d.iter_mut().enumerate() {
            for (k, value) in row.iter_mut().enumerate().take(j + 1) {
                *value = hom[k + 1][j - k];
            }
        }

        // b₆ = Σₙ aₙ / Πⱼ≠ₙ (hₙ − hⱼ)
        let noise_gain = (0..8)
            .map(|n| {
                let weight: f64 = (0..8).filter(|&j| j != n).map(|j| rr[n][j]).product();
                1.0 / (weight * weight)
            })
            .sum::<f64>()
            .sqrt();

        Self { rr, c, d, noise_gain }
    }
}

/// Counters describing the integrator's work so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ias15Stats {
    pub accepted_steps: u64,
    pub rejected_steps: u64,
    pub force_evaluations: u64,
    /// Predictor-corrector iterations of the last attempt
    pub last_iterations: usize,
}

/// IAS15 adaptive integrator
///
/// The state machine of one call to [`Integrator::step`]:
///
/// ```text
/// Propose(dt) → Evaluate(error) → Accept(dt_done, dt_next)
///                               → Reject(dt_shrunk) → Propose(dt_shrunk) …
/// ```
///
/// terminating on acceptance or with `StepSizeCollapse` once the shrunk step
/// drops below `min_dt`, or once a step it proposes no longer moves the clock
/// forward by more than a few units in the last place.
///
/// # Examples
///
/// ```
/// use nbody::config::BoxConfig;
/// use nbody::forces::DirectGravity;
/// use nbody::integrator::{Ias15, Integrator};
/// use nbody::particle::Particle;
/// use nbody::state::SimulationState;
/// use nbody::store::ParticleStore;
///
/// let mut store = ParticleStore::new();
/// store.add_particle(Particle::new(1.0, [0.0; 3], [0.0; 3])).unwrap();
/// store.add_particle(Particle::new(1e-3, [1.0, 0.0, 0.0], [0.0, 1.0, 0.0])).unwrap();
/// let mut state = SimulationState::new(0.01, 1.0, BoxConfig::default());
///
/// let mut integrator = Ias15::new(1e-9);
/// let elapsed = integrator.step(&mut store, &mut state, &DirectGravity).unwrap();
///
/// assert!(elapsed > 0.0);
/// assert_eq!(state.time, elapsed);
/// ```
#[derive(Debug, Clone)]
pub struct Ias15 {
    /// Relative tolerance on b₆, raised to the round-off floor of the estimate
    /// when it is tighter than that
    pub epsilon: f64,
    /// Rejections below this step size abort the run (0 = only when the step
    /// stops advancing time)
    pub min_dt: f64,
    /// Cap on the proposed step (0 = uncapped)
    pub max_dt: f64,
    tables: RadauTables,
    x0: Vec<f64>,
    v0: Vec<f64>,
    /// Compensation terms of x₀ and v₀
    csx: Vec<f64>,
    csv: Vec<f64>,
    a0: Vec<f64>,
    at: Vec<f64>,
    g: Coefficients,
    b: Coefficients,
    e: Coefficients,
    /// Accepted `b` and `e` of the last step, before extrapolation
    br: Coefficients,
    er: Coefficients,
    dt_last_done: f64,
    dt_proposed: f64,
    /// Time and buffer length of the accelerations left in the store
    warm: Option<(f64, usize)>,
    warned_convergence: bool,
    warned_floor: bool,
    stats: Ias15Stats,
}

impl Ias15 {
    /// Creates an integrator with tolerance `epsilon` and no step limits
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            min_dt: 0.0,
            max_dt: 0.0,
            tables: RadauTables::new(),
            x0: Vec::new(),
            v0: Vec::new(),
            csx: Vec::new(),
            csv: Vec::new(),
            a0: Vec::new(),
            at: Vec::new(),
            g: zeroed(0),
            b: zeroed(0),
            e: zeroed(0),
            br: zeroed(0),
            er: zeroed(0),
            dt_last_done: 0.0,
            dt_proposed: 0.0,
            warm: None,
            warned_convergence: false,
            warned_floor: false,
            stats: Ias15Stats::default(),
        }
    }

    pub fn from_config(config: &Ias15Config) -> Self {
        Self {
            min_dt: config.min_dt,
            max_dt: config.max_dt,
            ..Self::new(config.epsilon)
        }
    }

    pub fn stats(&self) -> Ias15Stats {
        self.stats
    }

    /// Length of the last accepted step, 0 before the first one
    pub fn last_step(&self) -> f64 {
        self.dt_last_done
    }

    fn resize(&mut self, n3: usize) {
        self.x0 = vec![0.0; n3];
        self.v0 = vec![0.0; n3];
        self.csx = vec![0.0; n3];
        self.csv = vec![0.0; n3];
        self.a0 = vec![0.0; n3];
        self.at = vec![0.0; n3];
        self.g = zeroed(n3);
        self.b = zeroed(n3);
        self.e = zeroed(n3);
        self.br = zeroed(n3);
        self.er = zeroed(n3);
        self.dt_last_done = 0.0;
        self.warm = None;
    }

    fn evaluate(
        &mut self,
        particles: &mut ParticleStore,
        state: &SimulationState,
        force: &dyn ForceModel,
    ) -> Result<()> {
        self.stats.force_evaluations += 1;
        force.accelerations(particles, state)
    }

    /// Snapshot positions, velocities and accelerations at the step start
    ///
    /// The compensation terms only belong to the values this integrator wrote
    /// itself, so they are dropped unless the store is exactly as the last
    /// accepted step left it.
    fn load(&mut self, particles: &ParticleStore, continued: bool) {
        if !continued {
            self.csx.fill(0.0);
            self.csv.fill(0.0);
        }
        for (i, p) in particles.all().iter().enumerate() {
            for axis in 0..3 {
                let k = 3 * i + axis;
                self.x0[k] = p.position[axis];
                self.v0[k] = p.velocity[axis];
                self.a0[k] = p.acceleration[axis];
            }
        }
    }

    /// Put the start-of-step snapshot back into the store
    fn restore(&self, particles: &mut ParticleStore) {
        for (i, p) in particles.all_mut().iter_mut().enumerate() {
            for axis in 0..3 {
                let k = 3 * i + axis;
                p.position[axis] = self.x0[k];
                p.velocity[axis] = self.v0[k];
                p.acceleration[axis] = self.a0[k];
            }
        }
    }

    /// Write positions and velocities at fraction `h` of a step `dt`
    fn predict(&self, particles: &mut ParticleStore, dt: f64, h: f64) {
        let b = &self.b;
        for (i, p) in particles.all_mut().iter_mut().enumerate() {
            for axis in 0..3 {
                let k = 3 * i + axis;
                let mut x_poly = POSITION_WEIGHTS[7] * b[6][k];
                let mut v_poly = VELOCITY_WEIGHTS[7] * b[6][k];
                for order in (0..6).rev() {
                    x_poly = x_poly * h + POSITION_WEIGHTS[order + 1] * b[order][k];
                    v_poly = v_poly * h + VELOCITY_WEIGHTS[order + 1] * b[order][k];
                }
                x_poly = x_poly * h + POSITION_WEIGHTS[0] * self.a0[k];
                v_poly = v_poly * h + VELOCITY_WEIGHTS[0] * self.a0[k];

                let dth = dt * h;
                p.position[axis] = self.x0[k] + (dth * self.v0[k] + dth * dth * x_poly - self.csx[k]);
                p.velocity[axis] = self.v0[k] + (dth * v_poly - self.csv[k]);
            }
        }
    }

    fn read_accelerations(&mut self, particles: &ParticleStore) {
        for (i, p) in particles.all().iter().enumerate() {
            for axis in 0..3 {
                self.at[3 * i + axis] = p.acceleration[axis];
            }
        }
    }

    /// gₖ from the current bⱼ
    fn g_from_b(&mut self) {
        let d = &self.tables.d;
        for k in 0..self.x0.len() {
            for order in 0..7 {
                self.g[order][k] = (order..7).map(|j| d[j][order] * self.b[j][k]).sum();
            }
        }
    }

    /// Fold the acceleration sampled at node `n` into g and b
    ///
    /// Returns the largest change of gₙ₋₁ together with the largest sampled
    /// acceleration, both over all components.
    fn correct(&mut self, n: usize) -> (f64, f64) {
        let rr = &self.tables.rr;
        let c = &self.tables.c;
        let m = n - 1;
        let mut max_change = 0.0_f64;
        let mut max_accel = 0.0_f64;

        for k in 0..self.x0.len() {
            let mut value = (self.at[k] - self.a0[k]) / rr[n][0];
            for j in 1..n {
                value = (value - self.g[j - 1][k]) / rr[n][j];
            }
            let change = value - self.g[m][k];
            self.g[m][k] = value;
            for order in 0..m {
                self.b[order][k] += c[m][order] * change;
            }
            self.b[m][k] += change;

            let change = change.abs();
            if change.is_normal() && change > max_change {
                max_change = change;
            }
            let accel = self.at[k].abs();
            if accel.is_normal() && accel > max_accel {
                max_accel = accel;
            }
        }

        (max_change, max_accel)
    }

    /// Iterate the predictor-corrector over all nodes until b converges
    fn converge(
        &mut self,
        particles: &mut ParticleStore,
        state: &SimulationState,
        force: &dyn ForceModel,
        dt: f64,
    ) -> Result<usize> {
        let mut error = f64::INFINITY;
        let mut error_last = 2.0;
        let mut iterations = 0;

        loop {
            if error < CORRECTOR_TOLERANCE {
                break;
            }
            if iterations > 2 && error_last <= error {
                // Round-off dominated, further iterations only oscillate
                break;
            }
            if iterations >= MAX_ITERATIONS {
                if !self.warned_convergence {
                    self.warned_convergence = true;
                    tracing::warn!(
                        t = state.time,
                        dt,
                        error,
                        "predictor-corrector did not converge, continuing with last iterate"
                    );
                }
                break;
            }

            error_last = error;
            iterations += 1;

            for n in 1..8 {
                self.predict(particles, dt, NODES[n]);
                self.evaluate(particles, state, force)?;
                self.read_accelerations(particles);
                let (max_change, max_accel) = self.correct(n);
                if n == 7 {
                    error = if max_accel > 0.0 {
                        max_change / max_accel
                    } else {
                        0.0
                    };
                }
            }
        }

        Ok(iterations)
    }

    /// Relative size of the highest-order coefficient, max|b₆| / max|a|
    fn truncation_error(&self) -> f64 {
        largest_magnitude(&self.b[6]) / largest_magnitude(&self.at)
    }

    /// Tolerance the step controller aims for at the current positions
    ///
    /// The b₆ estimate cannot resolve anything below the rounding noise of the
    /// sampled accelerations, so `epsilon` is raised to that floor when it is
    /// tighter. Close encounters far from the origin raise the floor.
    fn tolerance(
        &mut self,
        particles: &ParticleStore,
        state: &SimulationState,
        force: &dyn ForceModel,
    ) -> f64 {
        let max_accel = largest_magnitude(&self.a0);
        if max_accel == 0.0 {
            return self.epsilon;
        }
        let floor =
            self.tables.noise_gain * force.roundoff_acceleration(particles, state) / max_accel;

        if floor > self.epsilon && !self.warned_floor {
            self.warned_floor = true;
            tracing::warn!(
                t = state.time,
                epsilon = self.epsilon,
                floor,
                "tolerance is below the round-off floor of the error estimate, using the floor"
            );
        }
        self.epsilon.max(floor)
    }

    /// Extrapolate `b` and `e` from the last accepted coefficients to a step
    /// `ratio` times as long
    fn extrapolate(&mut self, ratio: f64) {
        if ratio.abs() > MAX_PREDICTION_RATIO {
            for order in 0..7 {
                self.e[order].fill(0.0);
                self.b[order].fill(0.0);
            }
            return;
        }

        let q1 = ratio;
        let q2 = q1 * q1;
        let q3 = q1 * q2;
        let q4 = q2 * q2;
        let q5 = q2 * q3;
        let q6 = q3 * q3;
        let q7 = q3 * q4;

        for k in 0..self.x0.len() {
            let last_b: [f64; 7] = std::array::from_fn(|o| self.br[o][k]);
            let last_e: [f64; 7] = std::array::from_fn(|o| self.er[o][k]);
            let [b0, b1, b2, b3, b4, b5, b6] = last_b;

            // Error of the previous extrapolation, carried forward
            let be: [f64; 7] = std::array::from_fn(|o| last_b[o] - last_e[o]);

            let e_new = [
                q1 * (b6 * 7.0 + b5 * 6.0 + b4 * 5.0 + b3 * 4.0 + b2 * 3.0 + b1 * 2.0 + b0),
                q2 * (b6 * 21.0 + b5 * 15.0 + b4 * 10.0 + b3 * 6.0 + b2 * 3.0 + b1),
                q3 * (b6 * 35.0 + b5 * 20.0 + b4 * 10.0 + b3 * 4.0 + b2),
                q4 * (b6 * 35.0 + b5 * 15.0 + b4 * 5.0 + b3),
                q5 * (b6 * 21.0 + b5 * 6.0 + b4),
                q6 * (b6 * 7.0 + b5),
                q7 * b6,
            ];

            for order in 0..7 {
                self.e[order][k] = e_new[order];
                self.b[order][k] = e_new[order] + be[order];
            }
        }
    }

    fn backup_coefficients(&mut self) {
        for order in 0..7 {
            self.br[order].copy_from_slice(&self.b[order]);
            self.er[order].copy_from_slice(&self.e[order]);
        }
    }

    /// Re-derive the coefficient guess when the step differs from the one
    /// the last extrapolation assumed
    fn repredict(&mut self, dt: f64) {
        if self.dt_last_done != 0.0 {
            self.extrapolate(dt / self.dt_last_done);
        } else {
            for order in 0..7 {
                self.b[order].fill(0.0);
                self.e[order].fill(0.0);
            }
        }
    }

    /// Advance x₀, v₀ over the full step and write them to the store
    fn finish(&mut self, particles: &mut ParticleStore, dt: f64) {
        for k in 0..self.x0.len() {
            let mut x_poly = POSITION_WEIGHTS[7] * self.b[6][k];
            let mut v_poly = VELOCITY_WEIGHTS[7] * self.b[6][k];
            for order in (0..6).rev() {
                x_poly += POSITION_WEIGHTS[order + 1] * self.b[order][k];
                v_poly += VELOCITY_WEIGHTS[order + 1] * self.b[order][k];
            }
            x_poly += POSITION_WEIGHTS[0] * self.a0[k];
            v_poly += VELOCITY_WEIGHTS[0] * self.a0[k];

            let dx = dt * self.v0[k] + dt * dt * x_poly;
            compensated_add(&mut self.x0[k], &mut self.csx[k], dx);
            compensated_add(&mut self.v0[k], &mut self.csv[k], dt * v_poly);
        }
        for (i, p) in particles.all_mut().iter_mut().enumerate() {
            for axis in 0..3 {
                let k = 3 * i + axis;
                p.position[axis] = self.x0[k];
                p.velocity[axis] = self.v0[k];
            }
        }
    }

    /// A step that can no longer advance the clock
    fn unusable(state: &SimulationState, dt: f64) -> bool {
        !dt.is_finite() || dt == 0.0 || state.time + dt == state.time
    }

    /// A step that advances the clock by only a handful of representable
    /// increments
    fn stalled(state: &SimulationState, dt: f64) -> bool {
        dt.abs() < STALL_ULPS * f64::EPSILON * state.time.abs()
    }
}

impl Default for Ias15 {
    fn default() -> Self {
        Self::from_config(&Ias15Config::default())
    }
}

impl Integrator for Ias15 {
    fn step(
        &mut self,
        particles: &mut ParticleStore,
        state: &mut SimulationState,
        force: &dyn ForceModel,
    ) -> Result<f64> {
        if particles.is_empty() {
            let dt = state.dt;
            state.advance(dt);
            return Ok(dt);
        }

        let n3 = 3 * particles.len();
        if n3 != self.x0.len() {
            self.resize(n3);
        }

        let continued = self.warm == Some((state.time, particles.len()));
        if !continued {
            self.evaluate(particles, state, force)?;
        }
        self.load(particles, continued);
        let tolerance = self.tolerance(particles, state, force);

        // Only the integrator's own proposals are checked for stalling; a
        // caller may shorten a step to land on an output time
        let requested = state.dt != self.dt_proposed;
        if requested {
            self.repredict(state.dt);
        }

        loop {
            let dt = state.dt;
            if Self::unusable(state, dt) || (!requested && Self::stalled(state, dt)) {
                return Err(NbodyError::StepSizeCollapse {
                    time: state.time,
                    dt,
                });
            }

            self.g_from_b();
            let iterations = match self.converge(particles, state, force, dt) {
                Ok(iterations) => iterations,
                Err(err) => {
                    self.restore(particles);
                    self.warm = None;
                    return Err(err);
                }
            };
            self.stats.last_iterations = iterations;

            let error = self.truncation_error();
            let mut dt_new = if error.is_normal() {
                (tolerance / error).powf(1.0 / 7.0) * dt
            } else {
                dt / SAFETY_FACTOR
            };

            if (dt_new / dt).abs() < SAFETY_FACTOR {
                self.stats.rejected_steps += 1;
                tracing::trace!(t = state.time, dt, dt_new, error, "IAS15 step rejected");
                self.restore(particles);
                // min_dt bounds rejections only, not requested steps
                if Self::unusable(state, dt_new)
                    || Self::stalled(state, dt_new)
                    || dt_new.abs() < self.min_dt
                {
                    return Err(NbodyError::StepSizeCollapse {
                        time: state.time,
                        dt: dt_new,
                    });
                }
                state.dt = dt_new;
                self.repredict(dt_new);
                continue;
            }

            if (dt_new / dt).abs() > 1.0 / SAFETY_FACTOR {
                dt_new = dt / SAFETY_FACTOR;
            }
            if self.max_dt > 0.0 && dt_new.abs() > self.max_dt {
                dt_new = self.max_dt.copysign(dt_new);
            }

            self.finish(particles, dt);
            state.advance(dt);
            state.dt = dt_new;
            self.dt_last_done = dt;
            self.dt_proposed = dt_new;

            self.backup_coefficients();
            self.extrapolate(dt_new / dt);

            // Accelerations matching the final positions, reused as a₀ next step
            self.evaluate(particles, state, force)?;
            self.warm = Some((state.time, particles.len()));
            self.stats.accepted_steps += 1;

            tracing::trace!(t = state.time, dt, dt_new, iterations, "IAS15 step accepted");
            return Ok(dt);
        }
    }

    fn reset(&mut self) {
        self.resize(0);
        self.dt_proposed = 0.0;
        self.warned_convergence = false;
        self.warned_floor = false;
    }
}
