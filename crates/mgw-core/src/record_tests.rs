use serde_json::json;

use crate::record::{StatusRecord, ValidationError, REQUIRED_FIELDS};
use crate::test_support::{payload_with, sample_payload};

#[test]
fn decode_accepts_complete_payload() {
    let record = StatusRecord::decode(&sample_payload()).expect("valid payload");

    assert!(record.connected);
    assert_eq!(record.wireless_signal, 21);
    assert_eq!(record.lan_address, "192.168.1.20");
    assert_eq!(record.wan_address, "10.64.3.7");
    assert_eq!(record.mobile_signal, 18);
    assert_eq!(record.mobile_rssi, -71.0);
    assert_eq!(record.speaker_errors, 0x300);
    assert_eq!(record.storage_used_bytes(), 24 * 1024 * 1024 * 1024);
    assert!(record.fm_on);
    assert_eq!(record.temperature_c, 47.25);
    assert_eq!(record.active_playlist, 3);
    assert_eq!(record.reported_at, 1_760_000_000);
}

#[test]
fn decode_rejects_each_missing_field() {
    for field in REQUIRED_FIELDS {
        let mut payload = sample_payload();
        payload.as_object_mut().expect("object").remove(field);

        let err = StatusRecord::decode(&payload).expect_err("missing field must fail");
        assert_eq!(err, ValidationError::MissingFields(vec![field]), "field {field}");
    }
}

#[test]
fn decode_reports_all_missing_fields_in_order() {
    let err = StatusRecord::decode(&json!({"csqw": 10, "temp": 40.0})).expect_err("incomplete");

    let ValidationError::MissingFields(missing) = err else {
        panic!("expected missing fields, got {err:?}");
    };
    assert_eq!(missing.len(), 11);
    assert_eq!(missing.first().copied(), Some("conn"));
    assert!(!missing.contains(&"csqw"));
    assert!(!missing.contains(&"temp"));
    assert_eq!(missing.last().copied(), Some("timestamp"));
}

#[test]
fn decode_rejects_non_object() {
    assert_eq!(
        StatusRecord::decode(&json!([1, 2, 3])),
        Err(ValidationError::NotAnObject)
    );
}

#[test]
fn decode_does_not_range_check_signal() {
    let record = StatusRecord::decode(&payload_with("csqw", json!(150))).expect("no range check");
    assert_eq!(record.wireless_signal, 150);
}

#[test]
fn flags_accept_bool_or_zero_one() {
    let off = StatusRecord::decode(&payload_with("conn", json!(0))).expect("0 is false");
    assert!(!off.connected);

    let on = StatusRecord::decode(&payload_with("conn", json!(true))).expect("bool");
    assert!(on.connected);

    let fm = StatusRecord::decode(&payload_with("fmsta", json!(0))).expect("fm 0");
    assert!(!fm.fm_on);
}

#[test]
fn decode_rejects_unexpected_shapes() {
    let cases = [
        ("conn", json!("yes")),
        ("conn", json!(2)),
        ("csqw", json!(null)),
        ("csqw", json!("20")),
        ("csqw", json!(20.5)),
        ("iplan", json!(19216812)),
        ("spkerr", json!(-1)),
        ("temp", json!("hot")),
    ];

    for (field, value) in cases {
        let err = StatusRecord::decode(&payload_with(field, value.clone()))
            .expect_err("shape mismatch must fail");
        assert!(
            matches!(&err, ValidationError::InvalidType { field: f, .. } if *f == field),
            "{field}={value} gave {err:?}"
        );
    }
}

#[test]
fn decode_rejects_free_greater_than_total() {
    let payload = payload_with("sdfree", json!(33_u64 * 1024 * 1024 * 1024));

    let err = StatusRecord::decode(&payload).expect_err("inconsistent storage");
    assert!(matches!(err, ValidationError::StorageInconsistent { .. }));
}

#[test]
fn decode_rejects_negative_storage_sizes() {
    let cases = [
        ("sdtotal", json!(-1)),
        ("sdfree", json!(-1)),
        ("sdfree", json!(i64::MIN)),
    ];

    for (field, value) in cases {
        let err = StatusRecord::decode(&payload_with(field, value.clone()))
            .expect_err("negative storage must fail");
        assert!(
            matches!(&err, ValidationError::NegativeStorage { field: f, .. } if *f == field),
            "{field}={value} gave {err:?}"
        );
    }
}

#[test]
fn decode_rejects_free_below_zero_with_max_total() {
    let mut payload = payload_with("sdtotal", json!(i64::MAX));
    payload["sdfree"] = json!(-1);

    let err = StatusRecord::decode(&payload).expect_err("negative free must fail");

    assert_eq!(
        err,
        ValidationError::NegativeStorage {
            field: "sdfree",
            value: -1
        }
    );
    assert_eq!(err.to_string(), "field `sdfree` must not be negative, got -1");
}

#[test]
fn decode_accepts_storage_at_i64_max() {
    let mut payload = payload_with("sdtotal", json!(i64::MAX));
    payload["sdfree"] = json!(0);

    let record = StatusRecord::decode(&payload).expect("max storage is valid");

    assert_eq!(record.storage_used_bytes(), i64::MAX);
}

#[test]
fn used_bytes_saturates_for_undecoded_records() {
    let mut record = StatusRecord::decode(&sample_payload()).expect("valid payload");
    record.storage_total_bytes = i64::MAX;
    record.storage_free_bytes = -1;

    assert_eq!(record.storage_used_bytes(), i64::MAX);

    record.storage_total_bytes = i64::MIN;
    record.storage_free_bytes = 1;

    assert_eq!(record.storage_used_bytes(), i64::MIN);
}

#[test]
fn record_serializes_with_wire_keys() {
    let record = StatusRecord::decode(&sample_payload()).expect("valid payload");
    let value = serde_json::to_value(&record).expect("serialize");

    for field in REQUIRED_FIELDS {
        assert!(value.get(field).is_some(), "missing {field}");
    }
    assert_eq!(value["conn"], json!(true));
}

#[test]
fn missing_fields_message_names_keys() {
    let err = ValidationError::MissingFields(vec!["csqw", "temp"]);
    assert_eq!(err.to_string(), "missing required field(s): csqw, temp");
}
