use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Wire keys of a status report, in canonical order.
pub const REQUIRED_FIELDS: [&str; 13] = [
    "conn", "csqw", "iplan", "ipwan", "csqm", "rssim", "spkerr", "sdtotal", "sdfree", "fmsta",
    "temp", "playlist", "timestamp",
];

/// One status report pushed by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    #[serde(rename = "conn")]
    pub connected: bool,
    #[serde(rename = "csqw")]
    pub wireless_signal: i32,
    #[serde(rename = "iplan")]
    pub lan_address: String,
    #[serde(rename = "ipwan")]
    pub wan_address: String,
    #[serde(rename = "csqm")]
    pub mobile_signal: i32,
    #[serde(rename = "rssim")]
    pub mobile_rssi: f64,
    #[serde(rename = "spkerr")]
    pub speaker_errors: u32,
    #[serde(rename = "sdtotal")]
    pub storage_total_bytes: i64,
    #[serde(rename = "sdfree")]
    pub storage_free_bytes: i64,
    #[serde(rename = "fmsta")]
    pub fm_on: bool,
    #[serde(rename = "temp")]
    pub temperature_c: f64,
    #[serde(rename = "playlist")]
    pub active_playlist: i64,
    /// Device clock, epoch seconds. Not used for liveness.
    #[serde(rename = "timestamp")]
    pub reported_at: i64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("status payload must be a JSON object")]
    NotAnObject,
    #[error("missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("field `{field}` has an unexpected type, expected {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("field `{field}` must not be negative, got {value}")]
    NegativeStorage { field: &'static str, value: i64 },
    #[error("sdfree ({free}) exceeds sdtotal ({total})")]
    StorageInconsistent { total: i64, free: i64 },
}

impl StatusRecord {
    /// Validates a raw report and converts it into a record.
    ///
    /// Presence of every key in [`REQUIRED_FIELDS`] is checked first and all
    /// missing keys are reported together. Values are then type-checked
    /// strictly: integers must be JSON integers that fit, addresses must be
    /// strings, and the two flags accept a bool or `0`/`1`. Ranges are not
    /// checked here, but negative storage sizes are rejected.
    pub fn decode(raw: &Value) -> Result<Self, ValidationError> {
        let obj = raw.as_object().ok_or(ValidationError::NotAnObject)?;

        let missing = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|key| !obj.contains_key(*key))
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let record = Self {
            connected: flag(obj, "conn")?,
            wireless_signal: int(obj, "csqw")?,
            lan_address: text(obj, "iplan")?,
            wan_address: text(obj, "ipwan")?,
            mobile_signal: int(obj, "csqm")?,
            mobile_rssi: number(obj, "rssim")?,
            speaker_errors: int(obj, "spkerr")?,
            storage_total_bytes: int(obj, "sdtotal")?,
            storage_free_bytes: int(obj, "sdfree")?,
            fm_on: flag(obj, "fmsta")?,
            temperature_c: number(obj, "temp")?,
            active_playlist: int(obj, "playlist")?,
            reported_at: int(obj, "timestamp")?,
        };

        for (field, value) in [
            ("sdtotal", record.storage_total_bytes),
            ("sdfree", record.storage_free_bytes),
        ] {
            if value < 0 {
                return Err(ValidationError::NegativeStorage { field, value });
            }
        }

        if record.storage_free_bytes > record.storage_total_bytes {
            return Err(ValidationError::StorageInconsistent {
                total: record.storage_total_bytes,
                free: record.storage_free_bytes,
            });
        }

        Ok(record)
    }

    /// Saturates instead of overflowing for records restored without decoding.
    pub fn storage_used_bytes(&self) -> i64 {
        self.storage_total_bytes.saturating_sub(self.storage_free_bytes)
    }
}

fn flag(obj: &Map<String, Value>, field: &'static str) -> Result<bool, ValidationError> {
    match &obj[field] {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) if n.as_u64() == Some(0) => Ok(false),
        Value::Number(n) if n.as_u64() == Some(1) => Ok(true),
        _ => Err(ValidationError::InvalidType {
            field,
            expected: "bool or 0/1",
        }),
    }
}

fn int<T: TryFrom<i64>>(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<T, ValidationError> {
    obj[field]
        .as_i64()
        .and_then(|v| T::try_from(v).ok())
        .ok_or(ValidationError::InvalidType {
            field,
            expected: "integer in range",
        })
}

fn number(obj: &Map<String, Value>, field: &'static str) -> Result<f64, ValidationError> {
    obj[field].as_f64().ok_or(ValidationError::InvalidType {
        field,
        expected: "number",
    })
}

fn text(obj: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    obj[field]
        .as_str()
        .map(str::to_string)
        .ok_or(ValidationError::InvalidType {
            field,
            expected: "string",
        })
}
