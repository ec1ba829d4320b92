//! Message resolution through the public resolver.

use cqrs_bus::{BusError, Envelope, Message, MessageKind};

use crate::support::{sample_bus, SampleQuery, Tag, TestQuery, Upload};

#[test]
fn derived_names_and_kinds() {
    assert_eq!(SampleQuery::NAME, "SampleQuery");
    assert_eq!(Upload::NAME, "UploadFile");

    let (bus, _) = sample_bus();
    let upload = bus.types().get("UploadFile").unwrap();
    assert_eq!(upload.kind(), MessageKind::Command);
    assert!(!upload.requires_args());

    let query = bus.types().get("SampleQuery").unwrap();
    assert_eq!(query.kind(), MessageKind::Query);
    assert!(query.requires_args());
    assert!(query.response_shape().is_some());
}

#[test]
fn resolves_valid_envelope() {
    let (bus, _) = sample_bus();
    let resolved = bus
        .resolver()
        .resolve(r#"{ "name": "SampleQuery", "args": "{ \"Foo\": \"Bar\" }" }"#)
        .unwrap()
        .unwrap();

    assert_eq!(resolved.name(), "SampleQuery");
    let query: SampleQuery = resolved.into_message().unwrap();
    assert_eq!(query.foo, "Bar");
}

#[test]
fn rejects_empty_and_senseless_input() {
    let (bus, _) = sample_bus();
    let resolver = bus.resolver();

    assert!(matches!(resolver.resolve(""), Err(BusError::Parse(_))));
    assert!(matches!(
        resolver.resolve("senseless_input"),
        Err(BusError::Parse(_))
    ));
}

#[test]
fn blank_args_resolve_to_nothing() {
    let (bus, _) = sample_bus();
    let resolved = bus
        .resolver()
        .resolve(r#"{ "name": "SampleQuery", "args": "" }"#)
        .unwrap();
    assert!(resolved.is_none());
}

#[test]
fn missing_args_key_is_rejected() {
    let (bus, _) = sample_bus();
    let err = bus
        .resolver()
        .resolve(r#"{ "name": "SampleQuery" }"#)
        .unwrap_err();
    assert_eq!(err.to_string(), "Message SampleQuery requires arguments");
}

#[test]
fn optional_fields_still_require_args() {
    assert!(Tag::HAS_FIELDS);
    assert!(!Upload::HAS_FIELDS);

    let (bus, _) = sample_bus();
    assert!(bus.types().get("Tag").unwrap().requires_args());

    let err = bus.resolver().resolve(r#"{ "name": "Tag" }"#).unwrap_err();
    assert!(matches!(err, BusError::MissingArguments(ref name) if name == "Tag"));

    let resolved = bus
        .resolver()
        .resolve(r#"{ "name": "Tag", "args": "{}" }"#)
        .unwrap()
        .unwrap();
    assert_eq!(resolved.downcast_ref::<Tag>().unwrap().label, None);
}

#[test]
fn resolves_canonical_form() {
    let (bus, _) = sample_bus();
    let text = cqrs_bus::to_json(&TestQuery { value: 5 }).unwrap();
    let resolved = bus.resolver().resolve(&text).unwrap().unwrap();
    assert_eq!(resolved.downcast_ref::<TestQuery>().unwrap().value, 5);
}

#[test]
fn single_quoted_json_is_rejected() {
    let (bus, _) = sample_bus();
    let result = bus
        .resolver()
        .resolve("{ 'name': 'SampleQuery', 'args': '' }");
    assert!(matches!(result, Err(BusError::Parse(_))));
}

#[test]
fn unknown_name_is_not_found() {
    let (bus, _) = sample_bus();
    let err = bus
        .resolver()
        .resolve(r#"{ "name": "NotRegistered", "args": "{}" }"#)
        .unwrap_err();
    assert!(matches!(err, BusError::MessageNotFound(_)));
    assert_eq!(err.status_code(), 404);
}

#[test]
fn names_are_case_sensitive() {
    let (bus, _) = sample_bus();
    let err = bus
        .resolver()
        .resolve(r#"{ "name": "samplequery", "args": "{ \"Foo\": \"Bar\" }" }"#)
        .unwrap_err();
    assert!(matches!(err, BusError::MessageNotFound(_)));
}

#[test]
fn envelope_round_trip_through_resolver() {
    let (bus, _) = sample_bus();
    let envelope = Envelope::for_message(&TestQuery { value: 4 }).unwrap();
    let text = envelope.to_json().unwrap();

    let resolved = bus.resolver().resolve(&text).unwrap().unwrap();
    assert_eq!(resolved.downcast_ref::<TestQuery>().unwrap().value, 4);
}

#[test]
fn to_json_wraps_message_in_its_name() {
    let query = SampleQuery {
        foo: "bar".to_string(),
    };
    assert_eq!(
        cqrs_bus::to_json(&query).unwrap(),
        r#"{"SampleQuery":{"Foo":"bar"}}"#
    );
}

#[test]
fn lists_registered_shapes_in_name_order() {
    let (bus, _) = sample_bus();
    assert_eq!(
        bus.messages(),
        vec![
            "Attach",
            "SampleCommand",
            "SampleQuery",
            "Tag",
            "TestQuery",
            "Unhandled",
            "UploadFile"
        ]
    );
}
