use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::format::{format_bytes, format_temperature};
use crate::health::{
    derive_health, ConnectionStatus, SignalQuality, SpeakerStatus, TemperatureStatus,
};
use crate::record::StatusRecord;

pub const NO_DATA_MESSAGE: &str = "No data received yet";

/// Display-ready status. Serializes flat, with `available` always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormattedStatus {
    Unavailable { available: bool, message: String },
    Available(Box<StatusView>),
}

impl FormattedStatus {
    pub fn unavailable() -> Self {
        Self::Unavailable {
            available: false,
            message: NO_DATA_MESSAGE.to_string(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn view(&self) -> Option<&StatusView> {
        match self {
            Self::Available(view) => Some(view),
            Self::Unavailable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusView {
    pub available: bool,
    pub connection: ConnectionView,
    pub signal: SignalView,
    pub storage: StorageView,
    pub system: SystemView,
    pub media: MediaView,
    pub metadata: MetadataView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionView {
    pub status: &'static str,
    #[serde(rename = "lanIP")]
    pub lan_ip: String,
    #[serde(rename = "wanIP")]
    pub wan_ip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalView {
    pub csqw: i32,
    pub csqm: i32,
    pub rssim: f64,
    pub quality: SignalQuality,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageView {
    pub total: String,
    pub free: String,
    pub used: String,
    pub usage_percent: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemView {
    pub temperature: String,
    pub temperature_status: TemperatureStatus,
    pub speaker_errors: u32,
    pub speakers: SpeakerStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaView {
    pub fm_status: &'static str,
    pub current_playlist: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataView {
    pub last_update: Option<DateTime<Utc>>,
    pub uptime: String,
    pub total_updates: u64,
    pub data_age: ConnectionStatus,
}

pub fn build_formatted_view(
    current: Option<&StatusRecord>,
    last_received_at: Option<DateTime<Utc>>,
    update_count: u64,
    now: DateTime<Utc>,
) -> FormattedStatus {
    let Some(record) = current else {
        return FormattedStatus::unavailable();
    };
    let metrics = derive_health(current, last_received_at, update_count, now);

    FormattedStatus::Available(Box::new(StatusView {
        available: true,
        connection: ConnectionView {
            status: if record.connected { "Connected" } else { "Disconnected" },
            lan_ip: record.lan_address.clone(),
            wan_ip: record.wan_address.clone(),
        },
        signal: SignalView {
            csqw: record.wireless_signal,
            csqm: record.mobile_signal,
            rssim: record.mobile_rssi,
            quality: metrics.signal_quality,
        },
        storage: StorageView {
            total: format_bytes(record.storage_total_bytes),
            free: format_bytes(record.storage_free_bytes),
            used: format_bytes(record.storage_used_bytes()),
            usage_percent: metrics.storage_usage,
        },
        system: SystemView {
            temperature: format_temperature(record.temperature_c),
            temperature_status: metrics.temperature_status,
            speaker_errors: record.speaker_errors,
            speakers: SpeakerStatus::from_bits(record.speaker_errors),
        },
        media: MediaView {
            fm_status: if record.fm_on { "ON" } else { "OFF" },
            current_playlist: record.active_playlist,
        },
        metadata: MetadataView {
            last_update: last_received_at,
            uptime: format!("{} seconds ago", metrics.uptime),
            total_updates: update_count,
            data_age: metrics.connection_status,
        },
    }))
}
