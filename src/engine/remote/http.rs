//! HTTP Remote Client
//!
//! reqwest-backed implementation of [`RemoteApi`] against the audit
//! backend's JSON API. Response statuses are mapped onto the engine's
//! failure classification: 4xx responses (other than 408 and 429) are
//! rejections that will never succeed on retry; everything else is
//! treated as transient.

use crate::engine::remote::{AuditResultPayload, ProjectSnapshot, RemoteApi, UploadedEvidence};
use crate::shared::config::SyncConfig;
use crate::shared::error::RemoteError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use uuid::Uuid;

/// HTTP client for the remote audit backend
#[derive(Debug, Clone)]
pub struct HttpRemoteApi {
    config: SyncConfig,
    client: Client,
}

impl HttpRemoteApi {
    /// Create a client from the engine configuration
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Attach the bearer token when one is configured
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    /// Convert a non-success response into a classified error
    async fn classify(response: Response) -> RemoteError {
        let status = response.status();
        if status.is_client_error()
            && status != StatusCode::REQUEST_TIMEOUT
            && status != StatusCode::TOO_MANY_REQUESTS
        {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            RemoteError::rejected(message)
        } else {
            RemoteError::Server {
                status: status.as_u16(),
            }
        }
    }
}

#[async_trait]
impl RemoteApi for HttpRemoteApi {
    async fn save_audit_result(&self, payload: &AuditResultPayload) -> Result<(), RemoteError> {
        let url = self
            .config
            .api_url(&format!("/api/results/{}", payload.result_id));
        tracing::debug!("PUT {}", url);

        let response = self
            .authorize(self.client.put(&url))
            .json(payload)
            .send()
            .await
            .map_err(RemoteError::from)?;

        if !response.status().is_success() {
            return Err(Self::classify(response).await);
        }

        Ok(())
    }

    async fn upload_evidence(
        &self,
        bytes: &[u8],
        path: &str,
    ) -> Result<UploadedEvidence, RemoteError> {
        let url = self.config.api_url(&format!("/api/evidence/{}", path));
        tracing::debug!("POST {} ({} bytes)", url, bytes.len());

        let response = self
            .authorize(self.client.post(&url))
            .header("Content-Type", "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(RemoteError::from)?;

        if !response.status().is_success() {
            return Err(Self::classify(response).await);
        }

        response
            .json::<UploadedEvidence>()
            .await
            .map_err(|e| RemoteError::network(format!("invalid upload response: {}", e)))
    }

    async fn get_project_full_audit_data(
        &self,
        project_id: Uuid,
    ) -> Result<ProjectSnapshot, RemoteError> {
        let url = self
            .config
            .api_url(&format!("/api/projects/{}/full", project_id));
        tracing::debug!("GET {}", url);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(RemoteError::from)?;

        if !response.status().is_success() {
            return Err(Self::classify(response).await);
        }

        response
            .json::<ProjectSnapshot>()
            .await
            .map_err(|e| RemoteError::network(format!("invalid snapshot response: {}", e)))
    }
}
