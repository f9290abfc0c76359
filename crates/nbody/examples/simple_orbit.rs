//! Simple orbital integration example
//!
//! Integrates a single planet around a Sun-like star with both integrators
//! and compares how well they conserve energy and angular momentum.
//!
//! Run with: cargo run --package nbody --example simple_orbit

use nbody::config::{IntegratorKind, SimulationConfig};
use nbody::forces::G_AU_YEAR;
use nbody::particle::Particle;
use nbody::simulation::{Cadence, Simulation};

fn run(integrator: IntegratorKind) -> nbody::Result<()> {
    let orbital_period = 1.0; // year, for 1 AU around 1 M☉
    let config = SimulationConfig {
        integrator,
        dt: orbital_period / 1000.0,
        g: G_AU_YEAR,
        exact_finish_time: true,
        ..Default::default()
    };

    let mut sim = Simulation::new(config)?;

    // Earth-like planet at 1 AU on an eccentric orbit, started at aphelion
    let r = 1.0;
    let e = 0.3;
    let earth_mass = 3.0e-6; // M☉
    let v_aphelion = (G_AU_YEAR * (1.0 + earth_mass) * (1.0 - e) / (r * (1.0 + e))).sqrt();
    sim.add_particle(Particle::new(1.0, [0.0; 3], [0.0; 3]))?;
    sim.add_particle(Particle::new(earth_mass, [r * (1.0 + e), 0.0, 0.0], [0.0, v_aphelion, 0.0]))?;
    sim.move_to_center_of_momentum()?;

    let initial_energy = sim.energy()?;
    let initial_l = sim.particles().total_angular_momentum().norm();

    println!("\n{:?}", integrator);
    println!("{}", "-".repeat(60));
    println!("  Initial energy: {:.6e} M☉ AU² year⁻²", initial_energy);
    println!("  Angular momentum: {:.6e} M☉ AU² year⁻¹", initial_l);

    let every_orbit = Cadence::new(orbital_period);
    let mut orbit_count = 0;
    sim.integrate(10.0 * orbital_period, |s| {
        if every_orbit.check(s) {
            orbit_count += 1;
            let planet = &s.particles().real()[1];
            let star = &s.particles().real()[0];
            let energy = s.energy().unwrap_or(f64::NAN);
            let energy_error = ((energy - initial_energy) / initial_energy).abs();
            println!(
                "  Orbit {:>2}: r = {:.6} AU, ΔE = {:.2e}",
                orbit_count,
                planet.distance_to(star),
                energy_error
            );
        }
    })?;

    let energy_error = ((sim.energy()? - initial_energy) / initial_energy).abs();
    let l_error =
        ((sim.particles().total_angular_momentum().norm() - initial_l) / initial_l).abs();

    println!("  Steps: {}", sim.state().steps);
    println!("  Energy error: {:.2e}", energy_error);
    println!("  Angular momentum error: {:.2e}", l_error);

    Ok(())
}

fn main() -> nbody::Result<()> {
    println!("N-body Integrator Test: Single Planet Orbit");
    println!("{}", "=".repeat(60));

    run(IntegratorKind::Leapfrog)?;
    run(IntegratorKind::Ias15)?;

    println!("\nTest complete!");
    Ok(())
}
