use std::time::Duration;

use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;

use super::{AuditApi, EventQuery, LoginResponse, PasswordLogin};
use crate::error::AppError;
use crate::models::{AssetEvent, AuditSummary, CurrentUser, UserEvent};

pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, AppError> {
        tracing::debug!("GET {path}");
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?;
        decode(resp).await
    }
}

/// Turn a response into `T`, or into an error carrying the API's message.
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, AppError> {
    let status = resp.status();
    if status.is_success() {
        return resp.json::<T>().await.map_err(AppError::from);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = error_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
    tracing::debug!("API returned {status}: {message}");
    Err(AppError::from_status(status, message))
}

/// Pull the human message out of `{"detail": ...}` or `{"error": ...}` bodies.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let field = value.get("detail").or_else(|| value.get("error"))?;
    match field {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        // Validation errors arrive as a list of objects
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl AuditApi for HttpApi {
    async fn current_user(&self, token: &str) -> Result<CurrentUser, AppError> {
        self.get_json("/auth/me", token).await
    }

    async fn summary(&self, token: &str) -> Result<AuditSummary, AppError> {
        self.get_json("/audit/summary", token).await
    }

    async fn user_events(&self, token: &str, query: &EventQuery) -> Result<Vec<UserEvent>, AppError> {
        let path = format!("/audit/user-events?{}", query.to_query_string());
        self.get_json(&path, token).await
    }

    async fn asset_events(
        &self,
        token: &str,
        query: &EventQuery,
    ) -> Result<Vec<AssetEvent>, AppError> {
        let path = format!("/audit/asset-events?{}", query.to_query_string());
        self.get_json(&path, token).await
    }

    async fn login(&self, credentials: &PasswordLogin) -> Result<LoginResponse, AppError> {
        tracing::debug!("POST /auth/login");
        let resp = self
            .client
            .post(self.url("/auth/login"))
            .json(credentials)
            .send()
            .await?;
        decode(resp).await
    }
}
