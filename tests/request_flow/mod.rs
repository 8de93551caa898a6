//! Request dispatch through the public API, against the default tree.

use observe_engine::ContentFormat;
use observe_engine::Request;
use observe_engine::Status;
use tokio_util::sync::CancellationToken;

use crate::common::default_server;
use crate::common::enable_logger;

#[tokio::test(start_paused = true)]
async fn test_door_lifecycle() {
    enable_logger();
    let server = default_server(CancellationToken::new());

    let changed = server.handle(
        &Request::put("living_room/door")
            .with_query("status=CLOSED&color=green"),
    );
    assert_eq!(changed.status, Status::Changed);
    assert_eq!(changed.status.code(), (2, 4));
    assert_eq!(
        server.handle(&Request::get("living_room/door")).payload_str(),
        Some("CLOSED;color=green")
    );

    let created = server.handle(
        &Request::post("living_room/door")
            .with_query("create")
            .with_payload("back"),
    );
    assert_eq!(created.status, Status::Created);
    assert_eq!(created.location.as_deref(), Some("living_room/door/back"));

    // the new door starts open, independent of its parent
    assert_eq!(
        server.handle(&Request::get("living_room/door/back")).payload_str(),
        Some("OPEN")
    );

    let deleted = server.handle(&Request::delete("living_room/door"));
    assert_eq!(deleted.status, Status::Deleted);
    assert_eq!(
        server.handle(&Request::get("living_room/door/back")).status,
        Status::NotFound
    );

    server.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_door_rejections() {
    let server = default_server(CancellationToken::new());

    let cases = [
        (Request::put("main_door"), "empty query"),
        (Request::put("main_door").with_query("open=1"), "invalid query key"),
        (Request::put("main_door").with_query("status=ajar"), "invalid query value"),
        (Request::post("main_door").with_query("create"), "empty payload"),
        (
            Request::post("main_door").with_query("make").with_payload("x"),
            "invalid query",
        ),
    ];

    for (request, message) in cases {
        let response = server.handle(&request);
        assert_eq!(response.status, Status::BadRequest, "{message}");
        assert_eq!(response.payload_str(), Some(message));
    }
    assert_eq!(server.handle(&Request::get("main_door")).payload_str(), Some("OPEN"));

    server.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_content_negotiation() {
    let server = default_server(CancellationToken::new());

    let xml = server.handle(&Request::get("multiple_encoding"));
    assert_eq!(xml.content_format, Some(ContentFormat::Xml));
    assert_eq!(xml.payload_str(), Some("<value>0</value>"));

    let json = server.handle(&Request::get("multiple_encoding").with_accept(ContentFormat::Json));
    assert_eq!(json.content_format, Some(ContentFormat::Json));
    assert_eq!(json.payload_str(), Some(r#"{"value":"0"}"#));

    let text = server.handle(&Request::get("multiple_encoding").with_accept(ContentFormat::TextPlain));
    assert_eq!(text.content_format, Some(ContentFormat::TextPlain));
    assert_eq!(text.payload_str(), Some("0"));

    let fallback = server.handle(&Request::get("xml").with_accept(ContentFormat::Json));
    assert_eq!(fallback.content_format, Some(ContentFormat::Xml));

    server.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_basic_crud() {
    let server = default_server(CancellationToken::new());

    let created = server.handle(&Request::post("basic/notes").with_payload("first"));
    assert_eq!(created.status, Status::Created);

    let changed = server.handle(&Request::put("basic/notes").with_payload("second"));
    assert_eq!(changed.status, Status::Changed);
    assert_eq!(
        server.handle(&Request::get("basic/notes")).payload_str(),
        Some("second")
    );

    let deleted = server.handle(&Request::delete("basic"));
    assert_eq!(deleted.status, Status::Deleted);
    assert!(!server.tree().contains("basic/notes"));

    let hello = server.handle(&Request::delete("hello_world"));
    assert_eq!(hello.status, Status::MethodNotAllowed);
    assert_eq!(hello.status.code(), (4, 5));

    server.shutdown().await;
}
