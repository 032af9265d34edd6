pub mod config;
pub mod format;
pub mod health;
pub mod history;
pub mod record;
pub mod service;
pub mod snapshot;
pub mod store;
pub mod view;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod format_tests;
#[cfg(test)]
mod history_tests;
#[cfg(test)]
mod record_tests;

pub use config::ServiceConfig;
pub use health::{
    derive_health, ConnectionStatus, HealthMetrics, SignalQuality, SpeakerStatus,
    TemperatureStatus,
};
pub use history::{HistoryBuffer, HistoryEntry};
pub use record::{StatusRecord, ValidationError};
pub use service::StatusService;
pub use snapshot::Snapshot;
pub use store::{JsonFileStore, MemoryStore, PersistenceError, SnapshotStore};
pub use view::{build_formatted_view, FormattedStatus, StatusView};
