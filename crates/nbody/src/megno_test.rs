use approx::assert_relative_eq;

use crate::megno::Megno;

#[test]
fn test_initial_values() {
    let megno = Megno::new();

    assert_eq!(megno.current_value(), 0.0);
    assert_eq!(megno.mean_value(), 0.0);
    assert_eq!(megno.lyapunov(), 0.0);
    assert_eq!(megno.elapsed(), 0.0);
    assert!(!megno.is_degenerate());
}

#[test]
fn test_constant_rate_gives_linear_growth() {
    // Exponential growth δ ∝ exp(λt): Y(t) = λ t, ⟨Y⟩ = λ t / 2, slope λ
    let lambda = 0.3;
    let dt = 1e-3;
    let mut megno = Megno::new();
    for _ in 0..20_000 {
        megno.update(dt, Some(lambda));
    }

    let t = megno.elapsed();
    assert_relative_eq!(t, 20.0, max_relative = 1e-12);
    assert_relative_eq!(megno.current_value(), lambda * t, max_relative = 1e-3);
    assert_relative_eq!(megno.mean_value(), lambda * t / 2.0, max_relative = 1e-3);
    assert_relative_eq!(megno.lyapunov(), lambda, max_relative = 1e-3);
}

#[test]
fn test_power_law_growth_converges_to_two() {
    // Linear growth δ ∝ t has δ̇/δ = 1/t, the quasi-periodic signature
    let dt = 0.01;
    let mut megno = Megno::new();
    let mut t = 0.0;
    for _ in 0..10_000 {
        t += dt;
        megno.update(dt, Some(1.0 / t));
    }

    assert_relative_eq!(megno.current_value(), 2.0, max_relative = 1e-9);
    assert_relative_eq!(megno.mean_value(), 2.0, max_relative = 1e-9);
    assert!(megno.lyapunov().abs() < 1e-9);
}

#[test]
fn test_degenerate_step_keeps_last_value() {
    let mut megno = Megno::new();
    megno.update(0.5, Some(1.0));
    megno.update(0.5, Some(1.0));
    let before = megno.current_value();
    let integral = megno.y_integral();

    megno.update(0.5, None);

    assert_eq!(megno.current_value(), before);
    assert_eq!(megno.y_integral(), integral);
    assert_eq!(megno.elapsed(), 1.5);
    assert_eq!(megno.degenerate_steps(), 1);
    assert!(megno.is_degenerate());

    megno.update(0.5, None);
    assert_eq!(megno.degenerate_steps(), 2);
}

#[test]
fn test_single_step_value() {
    let mut megno = Megno::new();
    megno.update(2.0, Some(0.25));

    // ∫ rate s ds ≈ rate · t · dt = 0.25 · 2 · 2 = 1, Y = 2 · 1 / 2
    assert_relative_eq!(megno.y_integral(), 1.0);
    assert_relative_eq!(megno.current_value(), 1.0);
    // One sample is not enough for a slope
    assert_eq!(megno.lyapunov(), 0.0);
}
