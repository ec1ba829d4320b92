//! Stream-carrying messages.

use cqrs_bus::{OutcomeStatus, RawStream};
use serde_json::json;

use crate::support::{sample_bus, Attach, Received};

#[tokio::test]
async fn bare_name_delivers_stream() {
    let (bus, uploads) = sample_bus();
    let outcome = bus
        .execute_with_stream("UploadFile", RawStream::new(b"hello".to_vec()))
        .await;
    assert!(outcome.is_ok(), "{}", outcome.message);

    let uploads = uploads.lock().unwrap();
    assert_eq!(
        *uploads,
        vec![Received {
            file_name: None,
            label: None,
            bytes: b"hello".to_vec(),
        }]
    );
}

#[tokio::test]
async fn envelope_header_carries_arguments() {
    let (bus, uploads) = sample_bus();
    let header = json!({
        "name": "Attach",
        "args": json!({ "file_name": "report.pdf" }).to_string(),
    })
    .to_string();

    let stream = RawStream::new(vec![1, 2, 3]).with_label("report");
    let outcome = bus.execute_with_stream(&header, stream).await;
    assert!(outcome.is_ok(), "{}", outcome.message);

    let uploads = uploads.lock().unwrap();
    assert_eq!(uploads[0].file_name.as_deref(), Some("report.pdf"));
    assert_eq!(uploads[0].label.as_deref(), Some("report"));
    assert_eq!(uploads[0].bytes, vec![1, 2, 3]);
}

#[tokio::test]
async fn execute_without_stream_gives_empty_stream() {
    let (bus, uploads) = sample_bus();
    let outcome = bus.execute(r#"{ "name": "UploadFile" }"#).await;
    assert_eq!(outcome.status, OutcomeStatus::Ok);

    let uploads = uploads.lock().unwrap();
    assert!(uploads[0].bytes.is_empty());
}

#[tokio::test]
async fn stream_is_ignored_by_plain_handlers() {
    let (bus, uploads) = sample_bus();
    let header = json!({
        "name": "TestQuery",
        "args": json!({ "Value": 8 }).to_string(),
    })
    .to_string();

    let outcome = bus
        .execute_with_stream(&header, RawStream::new(b"unused".to_vec()))
        .await;
    assert_eq!(outcome.value, Some(json!(16)));
    assert!(uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn typed_send_with_stream() {
    let (bus, uploads) = sample_bus();
    let outcome = bus
        .send_with_stream(
            Attach {
                file_name: "a.txt".to_string(),
            },
            RawStream::new(b"abc".to_vec()),
        )
        .await;
    assert!(outcome.is_ok());
    let uploads = uploads.lock().unwrap();
    assert_eq!(uploads[0].file_name.as_deref(), Some("a.txt"));
    assert_eq!(uploads[0].bytes, b"abc".to_vec());
}

#[tokio::test]
async fn bare_name_for_shape_with_fields_is_rejected() {
    let (bus, uploads) = sample_bus();
    let outcome = bus
        .execute_with_stream("Attach", RawStream::new(b"abc".to_vec()))
        .await;
    assert_eq!(outcome.status, OutcomeStatus::HandlerError);
    assert_eq!(outcome.message, "Message Attach requires arguments");
    assert!(uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn canonical_header_carries_arguments() {
    let (bus, uploads) = sample_bus();
    let header = cqrs_bus::to_json(&Attach {
        file_name: "notes.txt".to_string(),
    })
    .unwrap();

    let outcome = bus
        .execute_with_stream(&header, RawStream::new(b"n".to_vec()))
        .await;
    assert!(outcome.is_ok(), "{}", outcome.message);
    assert_eq!(
        uploads.lock().unwrap()[0].file_name.as_deref(),
        Some("notes.txt")
    );
}

#[tokio::test]
async fn unknown_stream_message_is_not_found() {
    let (bus, _) = sample_bus();
    let outcome = bus
        .execute_with_stream("Nope", RawStream::new(b"x".to_vec()))
        .await;
    assert_eq!(outcome.status, OutcomeStatus::NotFound);
    assert_eq!(outcome.message, "Message Nope not found");
}
