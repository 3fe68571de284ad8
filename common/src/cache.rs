// Memoized store of group schedules fetched from the directory service

use crate::directory::GroupDirectory;
use crate::models::{GroupListing, GroupSchedule, GroupSubject};
use crate::telemetry;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Point-in-time view of what the cache holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub cached_groups: usize,
    pub listing_loaded: bool,
}

/// Lazily populated store of group schedules and the group listing.
///
/// Entries live for the lifetime of the cache and are never refreshed.
/// Locks are only held while reading or writing the maps, never across a
/// fetch, so two concurrent misses on the same group both fetch and the
/// last one to finish overwrites the entry.
pub struct GroupScheduleCache {
    directory: Arc<dyn GroupDirectory>,
    schedules: RwLock<HashMap<String, GroupSchedule>>,
    listing: RwLock<Option<Arc<GroupListing>>>,
}

impl GroupScheduleCache {
    pub fn new(directory: Arc<dyn GroupDirectory>) -> Self {
        Self {
            directory,
            schedules: RwLock::new(HashMap::new()),
            listing: RwLock::new(None),
        }
    }

    /// Schedule of `group_name`, fetched on first request.
    ///
    /// A failed fetch is logged and yields `None`; it is not cached, so the
    /// next request tries again.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, group_name: &str) -> Option<GroupSchedule> {
        if let Some(schedule) = self.schedules.read().await.get(group_name) {
            telemetry::record_cache_hit();
            return Some(Arc::clone(schedule));
        }

        match self.directory.get_group_schedule(group_name).await {
            Ok(sessions) => {
                telemetry::record_fetch("success");
                debug!(group = group_name, sessions = sessions.len(), "Caching group schedule");
                let schedule = Arc::new(sessions);
                self.schedules
                    .write()
                    .await
                    .insert(group_name.to_string(), Arc::clone(&schedule));
                Some(schedule)
            }
            Err(e) => {
                telemetry::record_fetch(e.kind());
                warn!(group = group_name, error = %e, "Failed to fetch group schedule");
                None
            }
        }
    }

    /// Listing of every group and the subjects it carries, fetched once.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_groups(&self) -> Option<Arc<GroupListing>> {
        if let Some(listing) = self.listing.read().await.as_ref() {
            telemetry::record_cache_hit();
            return Some(Arc::clone(listing));
        }

        match self.directory.get_groups().await {
            Ok(groups) => {
                telemetry::record_fetch("success");
                debug!(groups = groups.len(), "Caching group listing");
                let listing = Arc::new(groups);
                *self.listing.write().await = Some(Arc::clone(&listing));
                Some(listing)
            }
            Err(e) => {
                telemetry::record_fetch(e.kind());
                warn!(error = %e, "Failed to fetch group listing");
                None
            }
        }
    }

    /// Record the subjects of a group created after the listing was fetched.
    ///
    /// Replaces any previous entry for `group_name`. The listing is loaded
    /// first so the new entry does not mask the directory's groups; if that
    /// load fails, a listing holding only this group is started.
    pub async fn remember_group_subjects(&self, group_name: &str, subjects: Vec<GroupSubject>) {
        if self.get_all_groups().await.is_none() {
            debug!(group = group_name, "Starting group listing without directory data");
        }

        let mut guard = self.listing.write().await;
        let listing = guard.get_or_insert_with(|| Arc::new(GroupListing::new()));
        Arc::make_mut(listing).insert(group_name.to_string(), subjects);
        debug!(group = group_name, "Group subjects recorded in listing");
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            cached_groups: self.schedules.read().await.len(),
            listing_loaded: self.listing.read().await.is_some(),
        }
    }
}
