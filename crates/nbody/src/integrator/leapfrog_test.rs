use std::f64::consts::PI;

use crate::config::{BoxConfig, DeviationSeed};
use crate::forces::{DirectGravity, ForceModel};
use crate::integrator::{Integrator, Leapfrog};
use crate::particle::Particle;
use crate::state::SimulationState;
use crate::store::ParticleStore;
use crate::variational::{deviation_magnitude, init_variational};

/// Sun-like star and a light planet on an orbit of semi-major axis 1 with
/// eccentricity `e`, started at apocentre, in the centre-of-momentum frame
fn make_test_system(e: f64) -> ParticleStore {
    let (m_star, m_planet) = (1.0, 1e-3);
    let r = 1.0 + e;
    let v = ((m_star + m_planet) * (1.0 - e) / r).sqrt();

    let mut store = ParticleStore::new();
    store.add_particle(Particle::new(m_star, [0.0; 3], [0.0; 3])).unwrap();
    store.add_particle(Particle::new(m_planet, [r, 0.0, 0.0], [0.0, v, 0.0])).unwrap();
    store.move_to_center_of_momentum().unwrap();
    store
}

fn total_energy(store: &ParticleStore, state: &SimulationState) -> f64 {
    store.kinetic_energy() + DirectGravity.potential_energy(store, state).unwrap()
}

#[test]
fn test_leapfrog_advances_time() {
    let mut store = make_test_system(0.0);
    let mut state = SimulationState::new(0.01, 1.0, BoxConfig::default());
    let mut integrator = Leapfrog::new();

    assert_eq!(state.time, 0.0);

    let elapsed = integrator.step(&mut store, &mut state, &DirectGravity).unwrap();

    assert_eq!(elapsed, 0.01);
    assert!((state.time - 0.01).abs() < 1e-15);
    assert_eq!(state.steps, 1);
    // Fixed-step: the step size is never touched
    assert_eq!(state.dt, 0.01);
}

#[test]
fn test_leapfrog_changes_position() {
    let mut store = make_test_system(0.0);
    let initial_pos = store.real()[1].position;
    let mut state = SimulationState::new(0.01, 1.0, BoxConfig::default());

    Leapfrog::new().step(&mut store, &mut state, &DirectGravity).unwrap();

    assert!((store.real()[1].position - initial_pos).norm() > 0.0);
}

#[test]
fn test_leapfrog_circular_orbit() {
    let mut store = make_test_system(0.0);
    let initial_r = store.real()[0].distance_to(&store.real()[1]);

    // 1000 steps per orbit, one full period
    let period = 2.0 * PI / (1.0_f64 + 1e-3).sqrt();
    let mut state = SimulationState::new(period / 1000.0, 1.0, BoxConfig::default());
    Leapfrog::new()
        .integrate(&mut store, &mut state, 1000, &DirectGravity)
        .unwrap();

    let final_r = store.real()[0].distance_to(&store.real()[1]);
    let error = (final_r - initial_r).abs() / initial_r;
    assert!(error < 1e-3, "Radius error: {:.2e}", error);
}

#[test]
fn test_leapfrog_conserves_energy() {
    let mut store = make_test_system(0.5);
    let mut state = SimulationState::new(0.005, 1.0, BoxConfig::default());
    let initial = total_energy(&store, &state);

    // Symplectic: the energy error oscillates but does not drift, so the
    // worst error over ten orbits is as small as over one
    let mut worst = 0.0_f64;
    let mut integrator = Leapfrog::new_dkd();
    for _ in 0..(10 * 1257) {
        integrator.step(&mut store, &mut state, &DirectGravity).unwrap();
        let error = ((total_energy(&store, &state) - initial) / initial).abs();
        worst = worst.max(error);
    }

    assert!(worst < 1e-3, "Energy error: {:.2e}", worst);
}

#[test]
fn test_leapfrog_conserves_angular_momentum() {
    let mut store = make_test_system(0.3);
    let initial = store.total_angular_momentum();
    let mut state = SimulationState::new(0.01, 1.0, BoxConfig::default());

    Leapfrog::new()
        .integrate(&mut store, &mut state, 5000, &DirectGravity)
        .unwrap();

    let drift = (store.total_angular_momentum() - initial).norm() / initial.norm();
    assert!(drift < 1e-11, "Angular momentum drift: {:.2e}", drift);
}

#[test]
fn test_leapfrog_is_deterministic() {
    let run = || {
        let mut store = make_test_system(0.2);
        init_variational(&mut store, 1e-8, DeviationSeed::Random(1)).unwrap();
        let mut state = SimulationState::new(0.01, 1.0, BoxConfig::default());
        Leapfrog::new_dkd()
            .integrate(&mut store, &mut state, 500, &DirectGravity)
            .unwrap();
        (store, state)
    };

    let (store_a, state_a) = run();
    let (store_b, state_b) = run();

    assert_eq!(store_a.all(), store_b.all());
    assert_eq!(state_a, state_b);
}

#[test]
fn test_kdk_and_dkd_agree() {
    let mut kdk_store = make_test_system(0.1);
    let mut dkd_store = kdk_store.clone();
    let mut kdk_state = SimulationState::new(0.001, 1.0, BoxConfig::default());
    let mut dkd_state = kdk_state.clone();

    Leapfrog::new()
        .integrate(&mut kdk_store, &mut kdk_state, 1000, &DirectGravity)
        .unwrap();
    Leapfrog::new_dkd()
        .integrate(&mut dkd_store, &mut dkd_state, 1000, &DirectGravity)
        .unwrap();

    // Both are second order; after one time unit they differ by O(dt²)
    let diff = (kdk_store.real()[1].position - dkd_store.real()[1].position).norm();
    assert!(diff < 1e-4, "KDK/DKD difference: {:.2e}", diff);
    assert_eq!(kdk_state.time, dkd_state.time);
}

#[test]
fn test_shadows_track_linearized_trajectory() {
    let dt = 0.01;
    let n_steps = 300;

    let mut tangent = make_test_system(0.4);
    init_variational(&mut tangent, 1e-7, DeviationSeed::Random(9)).unwrap();

    // A second copy started from the real state displaced by the deviation
    let mut displaced = ParticleStore::new();
    for (real, shadow) in tangent.real().iter().zip(tangent.variational()) {
        let mut p = *real;
        p.position += shadow.position;
        p.velocity += shadow.velocity;
        displaced.add_particle(p).unwrap();
    }

    let mut state = SimulationState::new(dt, 1.0, BoxConfig::default());
    Leapfrog::new_dkd()
        .integrate(&mut tangent, &mut state, n_steps, &DirectGravity)
        .unwrap();
    let mut state = SimulationState::new(dt, 1.0, BoxConfig::default());
    Leapfrog::new_dkd()
        .integrate(&mut displaced, &mut state, n_steps, &DirectGravity)
        .unwrap();

    for i in 0..tangent.particle_count() {
        let difference = displaced.real()[i].position - tangent.real()[i].position;
        let shadow = tangent.variational()[i].position;
        assert!(
            (difference - shadow).norm() < 1e-4 * shadow.norm(),
            "particle {i}: difference {difference:?}, shadow {shadow:?}"
        );
    }
}

#[test]
fn test_leapfrog_propagates_singular_geometry() {
    let mut store = ParticleStore::new();
    store.add_particle(Particle::new(1.0, [0.5, 0.0, 0.0], [0.0; 3])).unwrap();
    store.add_particle(Particle::new(1.0, [0.5, 0.0, 0.0], [0.0; 3])).unwrap();
    let mut state = SimulationState::new(0.01, 1.0, BoxConfig::default());

    let result = Leapfrog::new().step(&mut store, &mut state, &DirectGravity);

    assert!(result.unwrap_err().is_fatal());
    assert_eq!(state.steps, 0);
}

#[test]
fn test_deviation_scales_with_initial_size() {
    let run = |epsilon: f64| {
        let mut store = make_test_system(0.6);
        init_variational(&mut store, epsilon, DeviationSeed::Random(11)).unwrap();
        let mut state = SimulationState::new(0.005, 1.0, BoxConfig::default());
        Leapfrog::new_dkd()
            .integrate(&mut store, &mut state, 2000, &DirectGravity)
            .unwrap();
        store
    };

    let single = run(1e-9);
    let double = run(2e-9);

    assert_eq!(single.real(), double.real());
    for (a, b) in single.variational().iter().zip(double.variational()) {
        assert!((b.position - 2.0 * a.position).norm() <= 1e-9 * b.position.norm());
        assert!((b.velocity - 2.0 * a.velocity).norm() <= 1e-9 * b.velocity.norm());
    }
    let ratio = deviation_magnitude(&double) / deviation_magnitude(&single);
    assert!((ratio - 2.0).abs() < 1e-9, "ratio {ratio}");
}
