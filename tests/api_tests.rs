use chargefield::api::{simulate, simulate_form};
use chargefield::config::Config;
use chargefield::charge::Charge;
use chargefield::error::FieldError;
use std::collections::HashMap;

fn quick_config() -> Config {
    let mut config = Config::default();
    config.region.x1 = -3.0;
    config.region.y1 = -3.0;
    config.region.x2 = 3.0;
    config.region.y2 = 3.0;
    config.region.lres = 4.0;
    config.render.density = 0.5;
    config.render.max_steps = 200;
    config
}

#[test]
fn test_simulate_pair() {
    let charges = vec![Charge::new(0.0, 0.0, 1.0), Charge::new(1.0, 0.0, 1.0)];
    let sim = simulate(&charges, &quick_config()).unwrap();

    assert_eq!(sim.grid.dims(), (24, 24));
    assert_eq!(
        sim.field_values,
        vec![
            "Charge at (0.0, 0.0): |E| = 9.00e+09 N/C",
            "Charge at (1.0, 0.0): |E| = 9.00e+09 N/C",
        ]
    );

    let summary = sim.summary();
    assert_eq!(summary.charge_count, 2);
    assert_eq!(summary.image_mime, "image/svg+xml");
    assert!(!summary.image_base64.is_empty());

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["gridRows"], 24);
    assert_eq!(json["fieldValues"][1], "Charge at (1.0, 0.0): |E| = 9.00e+09 N/C");
    assert!(json["imageBase64"].is_string());
}

#[test]
fn test_simulate_form_matches_direct() {
    let fields: HashMap<String, String> = [
        ("num_charges", "2"),
        ("x0", "-1"),
        ("y0", "0"),
        ("q0", "1"),
        ("x1", "1"),
        ("y1", "0"),
        ("q1", "-1"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let config = quick_config();
    let from_form = simulate_form(&fields, &config).unwrap();
    let direct = simulate(
        &[Charge::new(-1.0, 0.0, 1.0), Charge::new(1.0, 0.0, -1.0)],
        &config,
    )
    .unwrap();

    assert_eq!(from_form.grid, direct.grid);
    assert_eq!(from_form.field_values, direct.field_values);
    assert_eq!(from_form.image, direct.image);
}

#[test]
fn test_bad_form_fails_before_work() {
    let fields: HashMap<String, String> = [("num_charges", "1"), ("x0", "0"), ("y0", "0")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let err = simulate_form(&fields, &quick_config()).unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn test_limits() {
    let mut config = quick_config();
    config.solver.max_charges = 1;
    let charges = vec![Charge::new(0.0, 0.0, 1.0), Charge::new(1.0, 0.0, 1.0)];
    assert!(simulate(&charges, &config).unwrap_err().is_invalid_input());

    let mut config = quick_config();
    config.solver.max_grid_points = 100;
    assert!(matches!(
        simulate(&charges, &config),
        Err(FieldError::InvalidRegion(_))
    ));
}

#[test]
fn test_runs_are_independent() {
    let config = quick_config();
    let a = simulate(&[Charge::new(0.0, 0.0, 1.0)], &config).unwrap();
    let _ = simulate(&[Charge::new(2.0, 2.0, -4.0)], &config).unwrap();
    let again = simulate(&[Charge::new(0.0, 0.0, 1.0)], &config).unwrap();
    assert_eq!(a.grid, again.grid);
    assert_eq!(a.image, again.image);
}
