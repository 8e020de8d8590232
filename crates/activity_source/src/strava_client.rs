//! Strava API client
//!
//! Thin reqwest wrapper over the v3 REST endpoints the merge uses.

use std::time::Duration;

use chrono::{DateTime, Utc};
use contracts::{
    ActivityId, ActivitySummary, ApiConfig, AuthConfig, ChannelKind, MergeError, RenderedActivity,
    StreamSet,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, info, instrument};

use crate::client::ActivityClient;
use crate::error::{Result, SourceError};
use crate::wire;

const USER_AGENT: &str = concat!("strava-merge/", env!("CARGO_PKG_VERSION"));

/// OAuth scopes needed to read activities and upload the merge
pub const OAUTH_SCOPE: &str = "activity:read,activity:write";

/// Real Strava client
pub struct StravaClient {
    http: Client,
    base_url: String,
    token: String,
}

impl StravaClient {
    /// Build a client for `api` authenticated with `token`
    pub fn new(api: &ApiConfig, token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .map_err(|e| SourceError::request(&api.base_url, e.to_string()))?;

        Ok(Self {
            http,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// GET `path`, returning the body of a 2xx response
    async fn get_text(
        &self,
        path: &str,
        query: &[(&str, String)],
        activity: Option<ActivityId>,
    ) -> Result<String> {
        let url = self.url(path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(|e| SourceError::request(&url, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::request(&url, e.to_string()))?;

        if !status.is_success() {
            return Err(wire::classify_status(activity, path, status.as_u16(), body));
        }
        Ok(body)
    }
}

impl ActivityClient for StravaClient {
    #[instrument(name = "strava_fetch_activity", skip(self), fields(activity_id = %id))]
    async fn fetch_activity(&self, id: ActivityId) -> Result<ActivitySummary> {
        let body = self
            .get_text(&format!("activities/{id}"), &[], Some(id))
            .await?;
        wire::decode_summary(&body)
    }

    #[instrument(
        name = "strava_fetch_streams",
        skip(self, channels),
        fields(activity_id = %id, channels = channels.len())
    )]
    async fn fetch_streams(&self, id: ActivityId, channels: &[ChannelKind]) -> Result<StreamSet> {
        let keys = channels
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let query = [("keys", keys), ("key_by_type", "true".to_string())];

        let body = self
            .get_text(&format!("activities/{id}/streams"), &query, Some(id))
            .await?;
        let streams = wire::decode_requested_streams(&body, channels)?;
        debug!(samples = streams.sample_count(), "Streams decoded");
        Ok(streams)
    }

    #[instrument(name = "strava_list_activities", skip(self))]
    async fn list_activities(
        &self,
        after: DateTime<Utc>,
        per_page: u32,
    ) -> Result<Vec<ActivitySummary>> {
        let query = [
            ("after", after.timestamp().to_string()),
            ("per_page", per_page.to_string()),
        ];
        let body = self.get_text("athlete/activities", &query, None).await?;
        wire::decode_summaries(&body)
    }

    #[instrument(
        name = "strava_upload",
        skip(self, document),
        fields(name = %document.name, bytes = document.len())
    )]
    async fn upload(&self, document: &RenderedActivity) -> Result<u64> {
        let url = self.url("uploads");

        let file = Part::bytes(document.body.to_vec())
            .file_name(document.file_name())
            .mime_str("application/xml")
            .map_err(|e| SourceError::request(&url, e.to_string()))?;
        let form = Form::new()
            .text("name", document.name.clone())
            .text("description", document.description.clone())
            .text("trainer", "false")
            .text("commute", "false")
            .text("data_type", document.format.as_str())
            .part("file", file);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SourceError::request(&url, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::request(&url, e.to_string()))?;

        if status != StatusCode::CREATED {
            return Err(SourceError::UploadDeclined {
                status: status.as_u16(),
                body,
            });
        }

        let upload_id = wire::decode_upload_id(&body)?;
        info!(upload_id, "Upload accepted");
        Ok(upload_id)
    }
}

/// Build the OAuth authorize URL the user visits to grant access
///
/// # Errors
/// `ConfigValidation` when no client id is configured or the endpoint is not a URL.
pub fn authorize_url(auth: &AuthConfig) -> std::result::Result<String, MergeError> {
    let client_id = auth
        .client_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| MergeError::config_validation("auth.client_id", "client_id is required"))?;

    let url = Url::parse_with_params(
        &auth.authorize_url,
        &[
            ("client_id", client_id),
            ("redirect_uri", auth.redirect_uri.as_str()),
            ("response_type", "code"),
            ("approval_prompt", "auto"),
            ("scope", OAUTH_SCOPE),
        ],
    )
    .map_err(|e| MergeError::config_validation("auth.authorize_url", e.to_string()))?;

    Ok(url.to_string())
}
