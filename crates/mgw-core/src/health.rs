//! Categorical health derived from the latest status record.
//!
//! Everything here is a pure function of its inputs; callers supply `now`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::StatusRecord;

/// `csqw` value the modem reports when the signal is not detectable.
pub const SIGNAL_NOT_KNOWN: i32 = 99;

/// Silence shorter than this counts as online.
pub const ONLINE_WITHIN_SECS: u64 = 60;
/// Silence shorter than this (and not online) is labelled `offline`.
/// Anything longer is `unknown`.
pub const OFFLINE_WITHIN_SECS: u64 = 300;

pub const TEMPERATURE_WARNING_C: f64 = 60.0;
pub const TEMPERATURE_CRITICAL_C: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalQuality {
    Excellent,
    Good,
    Fair,
    Poor,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Online,
    Offline,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureStatus {
    Normal,
    Warning,
    Critical,
}

impl SignalQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Unknown => "unknown",
        }
    }
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
        }
    }
}

impl TemperatureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for SignalQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TemperatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    /// Seconds since the last report was received (not device uptime).
    pub uptime: u64,
    pub last_update_time: Option<DateTime<Utc>>,
    pub update_count: u64,
    pub signal_quality: SignalQuality,
    pub connection_status: ConnectionStatus,
    pub storage_usage: i64,
    pub temperature_status: TemperatureStatus,
}

pub fn signal_quality(csqw: i32) -> SignalQuality {
    match csqw {
        SIGNAL_NOT_KNOWN => SignalQuality::Unknown,
        v if v >= 20 => SignalQuality::Excellent,
        v if v >= 15 => SignalQuality::Good,
        v if v >= 10 => SignalQuality::Fair,
        _ => SignalQuality::Poor,
    }
}

pub fn connection_status(elapsed_secs: u64) -> ConnectionStatus {
    if elapsed_secs < ONLINE_WITHIN_SECS {
        ConnectionStatus::Online
    } else if elapsed_secs < OFFLINE_WITHIN_SECS {
        ConnectionStatus::Offline
    } else {
        ConnectionStatus::Unknown
    }
}

/// Used share of storage as a whole percent, 0 when `total` is 0.
///
/// Computed in floating point so extreme sizes cannot overflow.
pub fn storage_usage(total: i64, free: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    let total = total as f64;
    ((total - free as f64) / total * 100.0).round() as i64
}

pub fn temperature_status(celsius: f64) -> TemperatureStatus {
    if celsius < TEMPERATURE_WARNING_C {
        TemperatureStatus::Normal
    } else if celsius < TEMPERATURE_CRITICAL_C {
        TemperatureStatus::Warning
    } else {
        TemperatureStatus::Critical
    }
}

/// Whole seconds from `since` to `now`, 0 if the clock went backwards.
pub fn elapsed_secs(since: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from((now - since).num_seconds()).unwrap_or(0)
}

pub fn derive_health(
    current: Option<&StatusRecord>,
    last_received_at: Option<DateTime<Utc>>,
    update_count: u64,
    now: DateTime<Utc>,
) -> HealthMetrics {
    let (Some(record), Some(received_at)) = (current, last_received_at) else {
        return HealthMetrics {
            uptime: 0,
            last_update_time: last_received_at,
            update_count,
            signal_quality: SignalQuality::Unknown,
            connection_status: ConnectionStatus::Unknown,
            storage_usage: 0,
            temperature_status: TemperatureStatus::Normal,
        };
    };

    let uptime = elapsed_secs(received_at, now);

    HealthMetrics {
        uptime,
        last_update_time: Some(received_at),
        update_count,
        signal_quality: signal_quality(record.wireless_signal),
        connection_status: connection_status(uptime),
        storage_usage: storage_usage(record.storage_total_bytes, record.storage_free_bytes),
        temperature_status: temperature_status(record.temperature_c),
    }
}

const SPEAKER_BITS: [(u32, u8); 4] = [(0x100, 1), (0x200, 2), (0x400, 3), (0x800, 4)];

/// `spkerr` read as the 12-bit speaker status word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerStatus {
    pub active: Vec<u8>,
    pub summary: String,
    pub binary: String,
    pub decimal: String,
    pub hex: String,
}

impl SpeakerStatus {
    pub fn from_bits(bits: u32) -> Self {
        let active = SPEAKER_BITS
            .iter()
            .filter(|(mask, _)| bits & mask != 0)
            .map(|(_, speaker)| *speaker)
            .collect::<Vec<_>>();

        let summary = if active.is_empty() {
            "None".to_string()
        } else {
            active
                .iter()
                .map(|n| format!("Speaker {n}"))
                .collect::<Vec<_>>()
                .join(", ")
        };

        Self {
            active,
            summary,
            binary: format!("0b{bits:012b}"),
            decimal: bits.to_string(),
            hex: format!("0x{bits:03X}"),
        }
    }
}
