//! Refresh scheduling and observer notification end to end.

use std::time::Duration;

use observe_engine::Request;
use observe_engine::SensorEncoding;
use observe_engine::ServerBuilder;
use observe_engine::Settings;
use observe_engine::Status;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::common::default_server;
use crate::common::scripted_sensor;

#[tokio::test(start_paused = true)]
async fn test_observer_sees_only_changes() {
    let server = ServerBuilder::new(Settings::default(), CancellationToken::new())
        .with_resource("room", scripted_sensor("room", SensorEncoding::PlainText, &[20.0, 20.0, 21.5, 21.5, 19.0]))
        .build()
        .unwrap();
    let mut observer = server.observe("room").unwrap();

    let mut seen = Vec::new();
    for _ in 0..3 {
        let n = observer.recv().await.unwrap();
        seen.push((n.sequence, String::from_utf8(n.payload.to_vec()).unwrap()));
    }

    assert_eq!(
        seen,
        vec![
            (1, "20".to_string()),
            (2, "21.5".to_string()),
            (3, "19".to_string()),
        ]
    );

    sleep(Duration::from_secs(10)).await;
    assert!(observer.receiver_mut().try_recv().is_err());
    assert_eq!(server.handle(&Request::get("room")).payload_str(), Some("19"));

    server.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_json_sensor_notification() {
    let server = ServerBuilder::new(Settings::default(), CancellationToken::new())
        .with_resource("dinning", scripted_sensor("dinning", SensorEncoding::Json, &[24.75]))
        .build()
        .unwrap();
    let mut observer = server.observe("dinning").unwrap();

    let n = observer.recv().await.unwrap();
    let reading: serde_json::Value = serde_json::from_slice(&n.payload).unwrap();

    assert_eq!(reading["name"], "dinning");
    assert_eq!(reading["value"], 24.75);
    server.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_refresh() {
    let shutdown = CancellationToken::new();
    let server = default_server(shutdown.clone());
    sleep(Duration::from_millis(1)).await;

    let before = server.handle(&Request::get("test"));
    assert_eq!(before.status, Status::Content);

    shutdown.cancel();
    server.shutdown().await;
    assert!(server.scheduler().is_stopped());
    assert_eq!(server.scheduler().active_entries(), 0);

    sleep(Duration::from_secs(60)).await;
    let after = server.handle(&Request::get("test"));
    assert_eq!(after.payload, before.payload);
}

#[tokio::test(start_paused = true)]
async fn test_deleting_room_ends_observation() {
    let server = default_server(CancellationToken::new());
    let mut observer = server.observe("dinning_room/temperature").unwrap();

    let deleted = server.handle(&Request::delete("dinning_room"));
    assert_eq!(deleted.status, Status::Deleted);

    while observer.recv().await.is_some() {}
    assert!(!server.scheduler().is_scheduled("dinning_room/temperature"));

    server.shutdown().await;
}
