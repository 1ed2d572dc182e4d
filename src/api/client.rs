//! HTTP implementation of [`AttendanceApi`].
//!
//! One attempt per call; retrying is an operator action, never
//! automatic. The bearer token comes from a [`CredentialProvider`]
//! right before each request.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::CredentialProvider;
use crate::error::{MarkerError, REMOTE_FALLBACK};
use crate::model::{AttendanceRecord, User};

use super::{AttendanceApi, ManualEntryPayload, PermissionEntryPayload};

pub struct HttpAttendanceApi {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpAttendanceApi {
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn authed(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, MarkerError> {
        let token = self.credentials.token().await?;
        Ok(builder.bearer_auth(token))
    }

    /// Map a response to the typed body, turning non-2xx into `Remote`
    /// with the server's message when the body carries one.
    async fn parse<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, MarkerError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MarkerError::Remote {
                status: status.as_u16(),
                message: remote_message(&body),
            });
        }
        resp.json::<R>()
            .await
            .map_err(|e| MarkerError::Decode(format!("response body: {e}")))
    }
}

/// Servers answer errors as `{"message": "..."}` (some endpoints use
/// `{"error": "..."}`); fall back to the raw body, then a fixed line.
fn remote_message(body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(m) = v.get(key).and_then(|m| m.as_str()) {
                if !m.is_empty() {
                    return m.to_string();
                }
            }
        }
        return REMOTE_FALLBACK.to_string();
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        REMOTE_FALLBACK.to_string()
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl AttendanceApi for HttpAttendanceApi {
    async fn records_for_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>, MarkerError> {
        debug!(%date, "fetching attendance records");
        let req = self
            .http
            .get(self.url("/attendance"))
            .query(&[("date", date.to_string())]);
        let resp = self.authed(req).await?.send().await?;
        Self::parse(resp).await
    }

    async fn create_manual(
        &self,
        payload: &ManualEntryPayload,
    ) -> Result<AttendanceRecord, MarkerError> {
        debug!(user_id = %payload.user_id, %payload.date, "creating manual entry");
        let req = self.http.post(self.url("/attendance/manual")).json(payload);
        let resp = self.authed(req).await?.send().await?;
        Self::parse(resp).await
    }

    async fn update_record(
        &self,
        id: &str,
        payload: &ManualEntryPayload,
    ) -> Result<AttendanceRecord, MarkerError> {
        debug!(record_id = id, user_id = %payload.user_id, "updating attendance record");
        let req = self
            .http
            .put(self.url(&format!("/attendance/{id}")))
            .json(payload);
        let resp = self.authed(req).await?.send().await?;
        Self::parse(resp).await
    }

    async fn create_permission(
        &self,
        payload: &PermissionEntryPayload,
    ) -> Result<AttendanceRecord, MarkerError> {
        debug!(user_id = %payload.user_id, %payload.date, "creating permission entry");
        let req = self
            .http
            .post(self.url("/attendance/permission"))
            .json(payload);
        let resp = self.authed(req).await?.send().await?;
        Self::parse(resp).await
    }

    async fn roster(&self) -> Result<Vec<User>, MarkerError> {
        let req = self.http.get(self.url("/users"));
        let resp = self.authed(req).await?.send().await?;
        Self::parse(resp).await
    }
}
