//! Cross-format decoding of lists carrying opaque JSON payloads.
//!
//! A list encoded in one wire format must decode from the other with the
//! same structure at the untyped level, with the opaque payloads transcoded
//! rather than interpreted.

use apimachinery_extensions::RawJson;
use serde_json::{json, Value};

#[derive(Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
struct PayloadList {
    #[serde(
        default,
        rename = "apiVersion",
        skip_serializing_if = "String::is_empty"
    )]
    api_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    kind: String,
    #[serde(default)]
    items: Vec<PayloadItem>,
}

#[derive(Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
struct PayloadItem {
    name: String,
    payload: RawJson,
}

fn sample_list() -> PayloadList {
    PayloadList {
        api_version: "example.dev/v1".to_owned(),
        kind: "PayloadList".to_owned(),
        items: vec![
            PayloadItem {
                name: "hello".to_owned(),
                payload: RawJson::from_json(b"{\"hello\":\"world\"}"),
            },
            PayloadItem {
                name: "scalar".to_owned(),
                payload: RawJson::from_json(b"42"),
            },
            PayloadItem {
                name: "empty".to_owned(),
                payload: RawJson::default(),
            },
        ],
    }
}

/// Structural comparison of payloads: transcoding may reserialize the raw
/// bytes, so equality holds at the untyped level.
fn assert_payloads_equivalent(a: &PayloadList, b: &PayloadList) {
    assert_eq!(a.api_version, b.api_version);
    assert_eq!(a.kind, b.kind);
    assert_eq!(a.items.len(), b.items.len());
    for (left, right) in a.items.iter().zip(b.items.iter()) {
        assert_eq!(left.name, right.name);
        let left_value: Value = serde_json::from_slice(&left.payload.to_json()).unwrap();
        let right_value: Value = serde_json::from_slice(&right.payload.to_json()).unwrap();
        assert_eq!(left_value, right_value, "payload {name}", name = left.name);
    }
}

#[test]
fn json_encoded_lists_decode_from_cbor_and_back() {
    let original = sample_list();

    let json_bytes = serde_json::to_vec(&original).unwrap();
    let cbor_bytes = apimachinery_cbor::to_vec(&original).unwrap();

    let from_json: PayloadList = serde_json::from_slice(&json_bytes).unwrap();
    let from_cbor: PayloadList = apimachinery_cbor::from_slice(&cbor_bytes).unwrap();

    assert_payloads_equivalent(&from_json, &original);
    assert_payloads_equivalent(&from_cbor, &original);
    assert_payloads_equivalent(&from_json, &from_cbor);
}

#[test]
fn cbor_origin_payloads_transcode_to_json_cleanly() {
    let original = sample_list();
    let cbor_bytes = apimachinery_cbor::to_vec(&original).unwrap();

    // CBOR -> typed -> JSON -> typed keeps the untyped shape.
    let decoded: PayloadList = apimachinery_cbor::from_slice(&cbor_bytes).unwrap();
    let json_bytes = serde_json::to_vec(&decoded).unwrap();
    let reparsed: PayloadList = serde_json::from_slice(&json_bytes).unwrap();
    assert_payloads_equivalent(&reparsed, &original);
}

#[test]
fn opaque_payloads_are_transcoded_not_interpreted() {
    // The nested payload is carried through CBOR as a data item, not as
    // embedded JSON text.
    let list = PayloadList {
        items: vec![PayloadItem {
            name: "x".to_owned(),
            payload: RawJson::from_json(b"{\"x\":1}"),
        }],
        ..Default::default()
    };
    let cbor_bytes = apimachinery_cbor::to_vec(&list).unwrap();
    let untyped: Value = apimachinery_cbor::from_slice(&cbor_bytes).unwrap();
    assert_eq!(untyped["items"][0]["payload"], json!({"x": 1}));
}

#[test]
fn untyped_shapes_match_across_both_wire_formats() {
    let original = sample_list();

    let via_json: Value = serde_json::from_slice(&serde_json::to_vec(&original).unwrap()).unwrap();
    let via_cbor: Value =
        apimachinery_cbor::from_slice(&apimachinery_cbor::to_vec(&original).unwrap()).unwrap();
    assert_eq!(via_json, via_cbor);
}
