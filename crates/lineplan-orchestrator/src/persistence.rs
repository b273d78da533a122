//! JSON persistence for the SO↔PO tracking map and the approved-schedule
//! snapshot, so both "survive process restart".

use std::collections::HashMap;
use std::path::Path;

use lineplan_core::{ProductionOrderId, SalesOrderId, Schedule, ScheduleId};
use serde::{Deserialize, Serialize};

use crate::error::OrchestratorError;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PersistedState {
    pub tracking: HashMap<SalesOrderId, ProductionOrderId>,
    pub approved: Option<Schedule>,
    pub next_schedule_id: ScheduleId,
}

impl PersistedState {
    pub async fn load(path: &Path) -> Result<Self, OrchestratorError> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| OrchestratorError::Persistence(format!("malformed state file: {e}"))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self { next_schedule_id: 1, ..Default::default() })
            }
            Err(e) => Err(OrchestratorError::Persistence(e.to_string())),
        }
    }

    pub async fn save(&self, path: &Path) -> Result<(), OrchestratorError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| OrchestratorError::Persistence(format!("failed to serialise state: {e}")))?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| OrchestratorError::Persistence(e.to_string()))?;
        }
        tokio::fs::write(path, contents).await.map_err(|e| OrchestratorError::Persistence(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_loads_as_fresh_default_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let state = PersistedState::load(&path).await.unwrap();
        assert_eq!(state.next_schedule_id, 1);
        assert!(state.tracking.is_empty());
    }

    #[tokio::test]
    async fn round_trips_through_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut state = PersistedState { next_schedule_id: 5, ..Default::default() };
        state.tracking.insert("SO-1".to_string(), "PO-1".to_string());
        state.save(&path).await.unwrap();

        let loaded = PersistedState::load(&path).await.unwrap();
        assert_eq!(loaded.next_schedule_id, 5);
        assert_eq!(loaded.tracking.get("SO-1"), Some(&"PO-1".to_string()));
    }
}
