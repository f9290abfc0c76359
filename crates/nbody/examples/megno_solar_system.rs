//! MEGNO of the outer Solar System
//!
//! Integrates the Sun, Jupiter and Saturn with variational particles and
//! prints the time and MEGNO every 362 days. Y(t) settling near 2 marks the
//! configuration as regular.
//!
//! Run with: cargo run --package nbody --example megno_solar_system -- [days] [config.json]
//!
//! The optional JSON file is deserialized into a `SimulationConfig`; missing
//! fields take their defaults. Set `RUST_LOG=debug` for integrator logging.

use std::env;
use std::fs;

use nbody::config::{DeviationSeed, IntegratorKind, SimulationConfig, VariationalConfig};
use nbody::forces::G_AU_DAY;
use nbody::particle::Particle;
use nbody::simulation::{Cadence, Simulation};
use tracing_subscriber::EnvFilter;

/// Sun (with the inner planets folded in), Jupiter and Saturn; AU and AU/day
const POSITIONS: [[f64; 3]; 3] = [
    [-4.06428567034226e-3, -6.08813756435987e-3, -1.66162304225834e-6],
    [3.40546614227466e+0, 3.62978190075864e+0, 3.42386261766577e-2],
    [6.60801554403466e+0, 6.38084674585064e+0, -1.36145963724542e-1],
];
const VELOCITIES: [[f64; 3]; 3] = [
    [6.69048890636161e-6, -6.33922479583593e-6, -3.13202145590767e-9],
    [-5.59797969310664e-3, 5.51815399480116e-3, -2.66711392865591e-6],
    [-4.17354020307064e-3, 3.99723751748116e-3, 1.67206320571441e-5],
];
const MASSES: [f64; 3] = [1.00000597682, 1.0 / 1047.000355, 1.0 / 3501.0006];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = env::args().skip(1);
    let t_max: f64 = match args.next() {
        Some(days) => days.parse()?,
        None => 1.0e6,
    };
    let config = match args.next() {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => SimulationConfig {
            integrator: IntegratorKind::Leapfrog,
            dt: 10.0,
            g: G_AU_DAY,
            variational: VariationalConfig {
                epsilon: 1e-16,
                seed: DeviationSeed::Random(0),
            },
            ..Default::default()
        },
    };

    let mut sim = Simulation::new(config)?;
    for ((position, velocity), mass) in POSITIONS.iter().zip(&VELOCITIES).zip(MASSES) {
        sim.add_particle(Particle::new(mass, *position, *velocity))?;
    }
    sim.move_to_center_of_momentum()?;
    sim.init_variational()?;

    let output = Cadence::new(362.0);
    let timing = Cadence::new(1000.0 * sim.state().dt);
    sim.integrate(t_max, |s| {
        if timing.check(s) {
            tracing::debug!(t = s.time(), steps = s.state().steps, "progress");
        }
        if output.check(s) {
            println!("        {:.20e}     {:.20e}", s.time(), s.current_megno());
        }
    })?;

    let megno = sim.megno();
    println!(
        "# t = {:.6e}  <Y> = {:.6}  lyapunov = {:.6e}",
        sim.time(),
        megno.mean_value(),
        megno.lyapunov()
    );
    Ok(())
}
