use serde_json::{json, Value};

pub(crate) fn sample_payload() -> Value {
    json!({
        "conn": 1,
        "csqw": 21,
        "iplan": "192.168.1.20",
        "ipwan": "10.64.3.7",
        "csqm": 18,
        "rssim": -71,
        "spkerr": 0x300,
        "sdtotal": 32_u64 * 1024 * 1024 * 1024,
        "sdfree": 8_u64 * 1024 * 1024 * 1024,
        "fmsta": true,
        "temp": 47.25,
        "playlist": 3,
        "timestamp": 1_760_000_000
    })
}

pub(crate) fn payload_with(field: &str, value: Value) -> Value {
    let mut payload = sample_payload();
    payload[field] = value;
    payload
}
