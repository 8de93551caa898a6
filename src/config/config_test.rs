use serial_test::serial;
use temp_env::with_vars;

use super::*;

fn cleanup_all_coap_env_vars() {
    for (key, _) in std::env::vars() {
        if key.starts_with("COAP__") || key == "CONFIG_PATH" {
            std::env::remove_var(&key);
        }
    }
}

#[test]
#[serial]
fn default_config_should_initialize_with_hardcoded_values() {
    let settings = Settings::default();

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 5683);
    assert!(!settings.server.multicast);
    assert_eq!(settings.sensor.lower_bound, 12.5);
    assert_eq!(settings.sensor.upper_bound, 32.9);
    assert_eq!(settings.schedule.plain_temperature, IntervalRange::new(3_000, 6_000));
    assert_eq!(settings.schedule.json_temperature, IntervalRange::new(23_000, 27_000));
    assert_eq!(settings.schedule.advanced, IntervalRange::new(3_000, 10_900));
    assert_eq!(settings.observe.observer_buffer_size, 10);
    assert!(settings.validate().is_ok());
}

#[test]
#[serial]
fn new_should_merge_environment_overrides() {
    cleanup_all_coap_env_vars();
    with_vars(
        vec![
            ("COAP__SERVER__PORT", Some("5684")),
            ("COAP__SENSOR__UPPER_BOUND", Some("40.5")),
        ],
        || {
            let settings = Settings::new().unwrap();

            assert_eq!(settings.server.port, 5684);
            assert_eq!(settings.sensor.upper_bound, 40.5);
        },
    );
}

#[test]
#[serial]
fn with_override_config_should_merge_file_settings() {
    cleanup_all_coap_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("override.toml");

    std::fs::write(
        &config_path,
        r#"
        [server]
        host = "127.0.0.1"

        [schedule.advanced]
        min_ms = 100
        max_ms = 200
        "#,
    )
    .unwrap();

    let empty_vars: Vec<(&str, Option<&str>)> = vec![];
    with_vars(empty_vars, || {
        let base = Settings::new().expect("success");
        let settings = base.with_override_config(config_path.to_str().unwrap()).unwrap();

        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 5683);
        assert_eq!(settings.schedule.advanced, IntervalRange::new(100, 200));
        assert_eq!(settings.schedule.plain_temperature, IntervalRange::new(3_000, 6_000));
    });
}

#[test]
#[serial]
fn environment_variables_should_have_highest_priority() {
    cleanup_all_coap_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("node.toml");
    std::fs::write(
        &config_path,
        r#"
        [server]
        port = 6000
        "#,
    )
    .unwrap();

    with_vars(
        vec![
            ("CONFIG_PATH", Some(config_path.to_str().unwrap())),
            ("COAP__SERVER__PORT", Some("7000")),
        ],
        || {
            let settings = Settings::new().unwrap();
            assert_eq!(settings.server.port, 7000);
        },
    );
}

#[test]
fn validation_should_reject_inverted_sensor_bounds() {
    let mut settings = Settings::default();
    settings.sensor.lower_bound = 40.0;

    assert!(settings.validate().is_err());
}

#[test]
fn validation_should_reject_non_finite_sensor_bounds() {
    let mut settings = Settings::default();
    settings.sensor.upper_bound = f64::INFINITY;

    assert!(settings.validate().is_err());
}

#[test]
fn validation_should_reject_inverted_interval() {
    let mut settings = Settings::default();
    settings.schedule.json_temperature = IntervalRange::new(27_000, 23_000);

    let err = settings.validate().unwrap_err();
    assert!(err.to_string().contains("schedule.json_temperature"));
}

#[test]
fn validation_should_reject_zero_interval() {
    let mut settings = Settings::default();
    settings.schedule.plain_temperature = IntervalRange::new(0, 10);

    assert!(settings.validate().is_err());
}

#[test]
fn validation_accepts_degenerate_interval() {
    let mut settings = Settings::default();
    settings.schedule.advanced = IntervalRange::new(500, 500);

    assert!(settings.validate().is_ok());
}

#[test]
fn validation_should_reject_zero_port_and_buffer() {
    let mut settings = Settings::default();
    settings.server.port = 0;
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.observe.observer_buffer_size = 0;
    assert!(settings.validate().is_err());
}

#[test]
fn sensor_clamp_keeps_values_in_range() {
    let sensor = SensorConfig::default();

    assert_eq!(sensor.clamp(100.0), 32.9);
    assert_eq!(sensor.clamp(-3.0), 12.5);
    assert_eq!(sensor.clamp(20.0), 20.0);
}

#[test]
fn debug_output_should_include_every_section() {
    let mut settings = Settings::default();
    settings.sensor.upper_bound = 40.5;
    settings.observe.observer_buffer_size = 7;

    let rendered = format!("{settings:?}");

    for section in ["server", "sensor", "schedule", "observe"] {
        assert!(rendered.contains(&format!("{section}: ")), "{section} missing from {rendered}");
    }
    assert!(rendered.contains("40.5"));
    assert!(rendered.contains("observer_buffer_size: 7"));
}
