//! Settings loaded from file and environment drive the built server.

use std::io::Write;

use observe_engine::IntervalRange;
use observe_engine::ServerBuilder;
use observe_engine::Settings;
use serial_test::serial;
use tempfile::NamedTempFile;
use tokio_util::sync::CancellationToken;

fn settings_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(content.as_bytes()).expect("write temp config");
    file
}

#[test]
#[serial]
fn test_config_path_and_env_layering() {
    let file = settings_file(
        r#"
        [server]
        port = 6000

        [schedule.plain_temperature]
        min_ms = 100
        max_ms = 200
        "#,
    );
    let path = file.path().to_str().unwrap().to_string();

    temp_env::with_vars(
        [
            ("CONFIG_PATH", Some(path.as_str())),
            ("COAP__SERVER__HOST", Some("127.0.0.1")),
        ],
        || {
            let settings = Settings::new().unwrap().validate().unwrap();

            assert_eq!(settings.server.endpoint(), "127.0.0.1:6000");
            assert_eq!(settings.schedule.plain_temperature, IntervalRange::new(100, 200));
            assert_eq!(settings.schedule.advanced, IntervalRange::new(3_000, 10_900));
        },
    );
}

#[test]
#[serial]
fn test_invalid_interval_is_rejected() {
    temp_env::with_vars(
        [
            ("COAP__SCHEDULE__ADVANCED__MIN_MS", Some("500")),
            ("COAP__SCHEDULE__ADVANCED__MAX_MS", Some("100")),
        ],
        || {
            let result = Settings::new().unwrap().validate();
            assert!(result.is_err());
        },
    );
}

#[tokio::test(start_paused = true)]
#[serial]
async fn test_server_built_from_settings() {
    let settings = Settings::default();

    let server = ServerBuilder::new(settings, CancellationToken::new())
        .with_default_resources()
        .build()
        .unwrap();

    assert_eq!(server.settings().server.port, 5683);
    assert_eq!(server.scheduler().active_entries(), 3);
    server.shutdown().await;
}
