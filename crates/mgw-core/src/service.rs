use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::ServiceConfig;
use crate::health::{derive_health, HealthMetrics};
use crate::history::{HistoryBuffer, HistoryEntry};
use crate::record::{StatusRecord, ValidationError};
use crate::snapshot::Snapshot;
use crate::store::SnapshotStore;
use crate::view::{build_formatted_view, FormattedStatus};

#[derive(Debug)]
struct ServiceState {
    current: Option<StatusRecord>,
    last_received_at: Option<DateTime<Utc>>,
    update_count: u64,
    history: HistoryBuffer,
}

impl ServiceState {
    fn empty(history_capacity: usize) -> Self {
        Self {
            current: None,
            last_received_at: None,
            update_count: 0,
            history: HistoryBuffer::with_capacity(history_capacity),
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_status: self.current.clone(),
            last_update_time: self.last_received_at,
            update_count: self.update_count,
        }
    }
}

/// Owner of the gateway status state. Construct once at startup and share
/// behind an `Arc`; every operation runs under a single lock.
pub struct StatusService<S: SnapshotStore> {
    store: S,
    config: ServiceConfig,
    state: Mutex<ServiceState>,
}

impl<S: SnapshotStore> StatusService<S> {
    /// Restores current status and counters from `store`. A missing or
    /// unreadable snapshot leaves the service empty.
    pub async fn open(store: S, config: ServiceConfig) -> Self {
        let mut state = ServiceState::empty(config.history_capacity);

        match store.load().await {
            Ok(Some(snapshot)) => {
                state.current = snapshot.current_status;
                state.last_received_at = snapshot.last_update_time;
                state.update_count = snapshot.update_count;
                info!(update_count = state.update_count, "loaded persisted status snapshot");
            }
            Ok(None) => {}
            Err(err) => error!(error = %err, "failed to load persisted status snapshot"),
        }

        Self {
            store,
            config,
            state: Mutex::new(state),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub async fn receive_status(&self, raw: &Value) -> Result<(), ValidationError> {
        self.receive_status_at(raw, Utc::now()).await
    }

    /// Ingests a report as if it arrived at `now`. State is untouched when
    /// validation fails; a failed save is logged and otherwise ignored.
    pub async fn receive_status_at(
        &self,
        raw: &Value,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        let record = match StatusRecord::decode(raw) {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "rejected status report");
                return Err(err);
            }
        };

        let mut state = self.state.lock().await;
        state.current = Some(record.clone());
        state.last_received_at = Some(now);
        state.update_count += 1;

        info!(
            connected = record.connected,
            csqw = record.wireless_signal,
            temp = record.temperature_c,
            update_count = state.update_count,
            "status received"
        );

        state.history.push(HistoryEntry {
            record,
            received_at: now,
        });

        if let Err(err) = self.store.save(&state.snapshot()).await {
            error!(error = %err, "failed to persist status snapshot");
        }

        Ok(())
    }

    pub async fn current_status(&self) -> Option<StatusRecord> {
        self.state.lock().await.current.clone()
    }

    pub async fn history(&self, limit: Option<usize>) -> Vec<HistoryEntry> {
        self.state.lock().await.history.recent(limit)
    }

    pub async fn update_count(&self) -> u64 {
        self.state.lock().await.update_count
    }

    pub async fn health_metrics(&self) -> HealthMetrics {
        self.health_metrics_at(Utc::now()).await
    }

    pub async fn health_metrics_at(&self, now: DateTime<Utc>) -> HealthMetrics {
        let state = self.state.lock().await;
        derive_health(
            state.current.as_ref(),
            state.last_received_at,
            state.update_count,
            now,
        )
    }

    pub async fn formatted_status(&self) -> FormattedStatus {
        self.formatted_status_at(Utc::now()).await
    }

    pub async fn formatted_status_at(&self, now: DateTime<Utc>) -> FormattedStatus {
        let state = self.state.lock().await;
        build_formatted_view(
            state.current.as_ref(),
            state.last_received_at,
            state.update_count,
            now,
        )
    }

    /// Drops all state and the persisted snapshot.
    pub async fn clear_data(&self) {
        let mut state = self.state.lock().await;
        state.current = None;
        state.last_received_at = None;
        state.update_count = 0;
        state.history.clear();

        if let Err(err) = self.store.delete().await {
            error!(error = %err, "failed to delete persisted status snapshot");
        }
        info!("status data cleared");
    }
}
