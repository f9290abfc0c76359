use crate::config::{
    BoxConfig, DeviationSeed, Ias15Config, IntegratorKind, LeapfrogForm, SimulationConfig,
    VariationalConfig,
};
use crate::error::NbodyError;

fn assert_configuration_error(config: &SimulationConfig) {
    match config.validate() {
        Err(NbodyError::Configuration(_)) => {}
        other => panic!("expected a configuration error, got {other:?}"),
    }
}

#[test]
fn test_defaults() {
    let config = SimulationConfig::default();

    assert_eq!(config.integrator, IntegratorKind::Leapfrog);
    assert_eq!(config.leapfrog_form, LeapfrogForm::Dkd);
    assert_eq!(config.variational.epsilon, 1e-16);
    assert_eq!(config.variational.seed, DeviationSeed::Random(0));
    assert_eq!(config.ias15.epsilon, 1e-9);
    assert!(!config.exact_finish_time);
    assert!(!config.domain.is_periodic());
    assert!(config.validate().is_ok());
}

#[test]
fn test_rejects_bad_step_and_constant() {
    for dt in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert_configuration_error(&SimulationConfig { dt, ..Default::default() });
    }
    for g in [0.0, -6.67e-11, f64::NAN] {
        assert_configuration_error(&SimulationConfig { g, ..Default::default() });
    }
}

#[test]
fn test_rejects_bad_variational_settings() {
    for epsilon in [0.0, -1e-16, f64::NAN] {
        assert_configuration_error(&SimulationConfig {
            variational: VariationalConfig { epsilon, ..Default::default() },
            ..Default::default()
        });
    }
    assert_configuration_error(&SimulationConfig {
        variational: VariationalConfig {
            seed: DeviationSeed::Axis(6),
            ..Default::default()
        },
        ..Default::default()
    });
}

#[test]
fn test_rejects_bad_box() {
    assert_configuration_error(&SimulationConfig {
        domain: BoxConfig::periodic(0.0),
        ..Default::default()
    });
    assert_configuration_error(&SimulationConfig {
        domain: BoxConfig {
            size: [1.0, -1.0, 1.0],
            periodic: [false; 3],
        },
        ..Default::default()
    });
}

#[test]
fn test_rejects_bad_ias15_tuning() {
    let bad = [
        Ias15Config { epsilon: 0.0, ..Default::default() },
        Ias15Config { min_dt: -1.0, ..Default::default() },
        Ias15Config { max_dt: f64::INFINITY, ..Default::default() },
        Ias15Config { min_dt: 1.0, max_dt: 0.5, ..Default::default() },
    ];
    for ias15 in bad {
        assert_configuration_error(&SimulationConfig { ias15, ..Default::default() });
    }
}

#[test]
fn test_json_round_trip() {
    let config = SimulationConfig {
        integrator: IntegratorKind::Ias15,
        leapfrog_form: LeapfrogForm::Kdk,
        dt: 10.0,
        g: 2.959122082855911e-4,
        domain: BoxConfig::periodic(50.0),
        variational: VariationalConfig {
            epsilon: 1e-12,
            seed: DeviationSeed::Axis(3),
        },
        ias15: Ias15Config {
            epsilon: 1e-10,
            min_dt: 1e-6,
            max_dt: 100.0,
        },
        exact_finish_time: true,
    };

    let json = serde_json::to_string(&config).unwrap();
    let back: SimulationConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(back, config);
}

#[test]
fn test_json_missing_fields_use_defaults() {
    let json = r#"{
        "integrator": "ias15",
        "dt": 10.0,
        "variational": { "seed": { "random": 42 } },
        "ias15": { "minDt": 0.001 },
        "exactFinishTime": true
    }"#;
    let config: SimulationConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.integrator, IntegratorKind::Ias15);
    assert_eq!(config.dt, 10.0);
    assert_eq!(config.g, 1.0);
    assert_eq!(config.variational.epsilon, 1e-16);
    assert_eq!(config.variational.seed, DeviationSeed::Random(42));
    assert_eq!(config.ias15.epsilon, 1e-9);
    assert_eq!(config.ias15.min_dt, 0.001);
    assert!(config.exact_finish_time);
    assert_eq!(config.domain, BoxConfig::default());
}
