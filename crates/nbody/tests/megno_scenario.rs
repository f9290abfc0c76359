//! End-to-end MEGNO runs through the public driver API.

use nbody::config::{DeviationSeed, IntegratorKind, SimulationConfig, VariationalConfig};
use nbody::forces::G_AU_DAY;
use nbody::particle::Particle;
use nbody::simulation::{Cadence, Simulation};

/// Sun (with the inner planets folded in), Jupiter and Saturn; positions in
/// AU, velocities in AU/day
fn outer_solar_system() -> Vec<Particle> {
    vec![
        Particle::new(
            1.00000597682,
            [-4.06428567034226e-3, -6.08813756435987e-3, -1.66162304225834e-6],
            [6.69048890636161e-6, -6.33922479583593e-6, -3.13202145590767e-9],
        ),
        Particle::new(
            1.0 / 1047.000355,
            [3.40546614227466e+0, 3.62978190075864e+0, 3.42386261766577e-2],
            [-5.59797969310664e-3, 5.51815399480116e-3, -2.66711392865591e-6],
        ),
        Particle::new(
            1.0 / 3501.0006,
            [6.60801554403466e+0, 6.38084674585064e+0, -1.36145963724542e-1],
            [-4.17354020307064e-3, 3.99723751748116e-3, 1.67206320571441e-5],
        ),
    ]
}

fn build(config: SimulationConfig, particles: Vec<Particle>) -> Simulation {
    let mut sim = Simulation::new(config).unwrap();
    for p in particles {
        sim.add_particle(p).unwrap();
    }
    sim.move_to_center_of_momentum().unwrap();
    sim.init_variational().unwrap();
    sim
}

fn outer_solar_system_config(integrator: IntegratorKind) -> SimulationConfig {
    SimulationConfig {
        integrator,
        dt: 10.0,
        g: G_AU_DAY,
        variational: VariationalConfig {
            epsilon: 1e-16,
            seed: DeviationSeed::Random(2014),
        },
        ..Default::default()
    }
}

/// MEGNO sampled each time the clock crosses a multiple of 362 days
fn sampled_megno(integrator: IntegratorKind, t_end: f64) -> Vec<(f64, f64)> {
    let mut sim = build(outer_solar_system_config(integrator), outer_solar_system());
    assert_eq!(sim.particles().len(), 6);

    let cadence = Cadence::new(362.0);
    let mut samples = Vec::new();
    sim.integrate(t_end, |s| {
        if cadence.check(s) {
            samples.push((s.time(), s.current_megno()));
        }
    })
    .unwrap();
    samples
}

#[test]
fn test_outer_solar_system_megno_rises_early() {
    let samples = sampled_megno(IntegratorKind::Leapfrog, 362.0 * 3.0 + 1.0);

    assert_eq!(samples.len(), 3);
    for window in samples.windows(2) {
        assert!(
            window[1].1 >= window[0].1,
            "MEGNO decreased between t = {} and t = {}: {:?}",
            window[0].0,
            window[1].0,
            samples
        );
    }
    assert!(samples.iter().all(|(_, y)| y.is_finite()));
}

#[test]
fn test_outer_solar_system_runs_are_reproducible() {
    for integrator in [IntegratorKind::Leapfrog, IntegratorKind::Ias15] {
        let a = sampled_megno(integrator, 362.0 * 5.0);
        let b = sampled_megno(integrator, 362.0 * 5.0);

        assert_eq!(a.len(), b.len());
        for ((ta, ya), (tb, yb)) in a.iter().zip(&b) {
            assert_eq!(ta, tb);
            assert!((ya - yb).abs() <= 1e-10 * ya.abs().max(1.0));
        }
    }
}

#[test]
fn test_outer_solar_system_is_regular() {
    // Jupiter and Saturn are not chaotic on these time scales: Y stays near 2
    let mut sim = build(outer_solar_system_config(IntegratorKind::Ias15), outer_solar_system());
    sim.integrate(2.0e5, |_| {}).unwrap();

    let y = sim.current_megno();
    assert!(y > 1.0 && y < 3.0, "MEGNO = {y}");
    assert!(!sim.megno().is_degenerate());
}

#[test]
fn test_two_body_megno_tends_to_two() {
    let config = SimulationConfig {
        dt: 0.01,
        variational: VariationalConfig {
            epsilon: 1e-10,
            seed: DeviationSeed::Random(5),
        },
        ..Default::default()
    };
    let planet_speed = (1.001_f64).sqrt();
    let mut sim = build(
        config,
        vec![
            Particle::new(1.0, [0.0; 3], [0.0; 3]),
            Particle::new(1e-3, [1.0, 0.0, 0.0], [0.0, planet_speed, 0.0]),
        ],
    );

    sim.integrate(300.0, |_| {}).unwrap();

    let megno = sim.megno();
    assert!((megno.current_value() - 2.0).abs() < 0.3, "Y = {}", megno.current_value());
    assert!((megno.mean_value() - 2.0).abs() < 0.5, "<Y> = {}", megno.mean_value());
    assert!(megno.lyapunov().abs() < 0.02, "lambda = {}", megno.lyapunov());
}

#[test]
fn test_close_planet_pair_is_chaotic() {
    // Two Jupiter-mass planets two mutual Hill radii apart
    let config = SimulationConfig {
        integrator: IntegratorKind::Ias15,
        dt: 0.01,
        variational: VariationalConfig {
            epsilon: 1e-10,
            seed: DeviationSeed::Random(5),
        },
        ..Default::default()
    };
    let mut sim = build(
        config,
        vec![
            Particle::new(1.0, [0.0; 3], [0.0; 3]),
            Particle::new(1e-3, [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            Particle::new(1e-3, [-1.2, 0.0, 0.0], [0.0, -(1.0_f64 / 1.2).sqrt(), 0.0]),
        ],
    );

    sim.integrate(500.0, |_| {}).unwrap();

    let y = sim.current_megno();
    assert!(y > 4.0, "MEGNO = {y}");
    assert!(sim.megno().lyapunov() > 0.0);
}
