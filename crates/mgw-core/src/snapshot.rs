use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::StatusRecord;

/// Persisted part of the service state. History is not included and starts
/// empty after every restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub current_status: Option<StatusRecord>,
    pub last_update_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub update_count: u64,
}
