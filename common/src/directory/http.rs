// HTTP client for the group directory service

use crate::directory::GroupDirectory;
use crate::errors::DirectoryError;
use crate::models::{GroupListing, SessionSlot};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Envelope of `?action=grupos`
#[derive(Debug, Deserialize)]
struct GroupsResponse {
    #[serde(default)]
    success: bool,
    #[serde(default, alias = "groups")]
    grupos: GroupListing,
    #[serde(default)]
    error: Option<String>,
}

/// Envelope of `?action=horario&grupo=..`
#[derive(Debug, Deserialize)]
struct ScheduleResponse {
    #[serde(default)]
    success: bool,
    #[serde(default, alias = "schedule")]
    horario: Vec<SessionSlot>,
    #[serde(default)]
    error: Option<String>,
}

/// HttpGroupDirectory reaches the directory servlet over HTTP
pub struct HttpGroupDirectory {
    client: Client,
    base_url: Url,
}

impl HttpGroupDirectory {
    /// Create a new client against `base_url` with the specified timeout
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self, DirectoryError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            DirectoryError::RequestFailed(format!("Invalid directory URL '{}': {}", base_url, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| {
                DirectoryError::RequestFailed(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, base_url })
    }

    fn action_url(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().extend_pairs(params);
        url
    }

    /// Issue a GET and decode the JSON body, mapping non-2xx statuses to errors
    #[tracing::instrument(skip(self, url), fields(url = %url))]
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, DirectoryError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .header("Cache-Control", "no-cache")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = %status, "Directory response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str::<T>(&body)?)
    }
}

#[async_trait]
impl GroupDirectory for HttpGroupDirectory {
    async fn get_groups(&self) -> Result<GroupListing, DirectoryError> {
        let url = self.action_url(&[("action", "grupos")]);
        let payload: GroupsResponse = self.get_json(url).await?;

        if !payload.success {
            return Err(DirectoryError::Unsuccessful(
                payload.error.unwrap_or_else(|| "grupos".to_string()),
            ));
        }

        tracing::info!(groups = payload.grupos.len(), "Group listing fetched");
        Ok(payload.grupos)
    }

    async fn get_group_schedule(
        &self,
        group_name: &str,
    ) -> Result<Vec<SessionSlot>, DirectoryError> {
        let url = self.action_url(&[("action", "horario"), ("grupo", group_name)]);

        let payload: ScheduleResponse = match self.get_json(url).await {
            Ok(payload) => payload,
            Err(DirectoryError::Status { code, .. }) if code == StatusCode::NOT_FOUND.as_u16() => {
                return Err(DirectoryError::GroupNotFound(group_name.to_string()));
            }
            Err(e) => return Err(e),
        };

        if !payload.success {
            return Err(DirectoryError::Unsuccessful(
                payload
                    .error
                    .unwrap_or_else(|| format!("horario {}", group_name)),
            ));
        }

        tracing::info!(
            group = group_name,
            sessions = payload.horario.len(),
            "Group schedule fetched"
        );
        Ok(payload.horario)
    }
}
