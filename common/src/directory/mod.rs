// Group directory service boundary
// Provides trait and implementations for reaching precomputed group schedules

pub mod http;

use crate::errors::DirectoryError;
use crate::models::{GroupListing, SessionSlot};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub use http::HttpGroupDirectory;

/// GroupDirectory defines the interface to the service that owns group schedules
#[async_trait]
pub trait GroupDirectory: Send + Sync {
    /// List every group with the subjects and professors it carries
    async fn get_groups(&self) -> Result<GroupListing, DirectoryError>;

    /// Fetch the computed weekly schedule of one group
    async fn get_group_schedule(&self, group_name: &str)
        -> Result<Vec<SessionSlot>, DirectoryError>;
}

/// Offline copy of the directory: the group listing plus each group's schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    #[serde(default, alias = "grupos")]
    pub groups: GroupListing,
    #[serde(default, alias = "horarios")]
    pub schedules: BTreeMap<String, Vec<SessionSlot>>,
}

/// Directory backed by an in-memory snapshot
#[derive(Debug, Clone, Default)]
pub struct InMemoryGroupDirectory {
    snapshot: DirectorySnapshot,
}

impl InMemoryGroupDirectory {
    pub fn new(snapshot: DirectorySnapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DirectoryError::RequestFailed(format!(
                "Failed to read snapshot {}: {}",
                path.display(),
                e
            ))
        })?;
        let snapshot: DirectorySnapshot = serde_json::from_str(&raw)?;

        tracing::debug!(
            path = %path.display(),
            groups = snapshot.groups.len(),
            schedules = snapshot.schedules.len(),
            "Loaded directory snapshot"
        );

        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> &DirectorySnapshot {
        &self.snapshot
    }
}

#[async_trait]
impl GroupDirectory for InMemoryGroupDirectory {
    async fn get_groups(&self) -> Result<GroupListing, DirectoryError> {
        Ok(self.snapshot.groups.clone())
    }

    async fn get_group_schedule(
        &self,
        group_name: &str,
    ) -> Result<Vec<SessionSlot>, DirectoryError> {
        self.snapshot
            .schedules
            .get(group_name)
            .cloned()
            .ok_or_else(|| DirectoryError::GroupNotFound(group_name.to_string()))
    }
}
