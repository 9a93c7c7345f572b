pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{AssetEvent, AuditSummary, CurrentUser, UserEvent};

pub use http::HttpApi;

/// One page request against an event feed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventQuery {
    pub limit: usize,
    pub offset: usize,
    pub search: Option<String>,
    pub event_type: Option<String>,
}

impl EventQuery {
    pub fn page(limit: usize, offset: usize) -> Self {
        Self {
            limit,
            offset,
            ..Default::default()
        }
    }

    /// Encoded query string. Blank filters are left out entirely.
    pub fn to_query_string(&self) -> String {
        let mut ser = form_urlencoded::Serializer::new(String::new());
        ser.append_pair("limit", &self.limit.to_string());
        ser.append_pair("offset", &self.offset.to_string());
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            ser.append_pair("search", search);
        }
        if let Some(event_type) = self.event_type.as_deref().filter(|s| !s.is_empty()) {
            ser.append_pair("event_type", event_type);
        }
        ser.finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordLogin {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// The remote asset-management API, as far as the console uses it.
#[async_trait]
pub trait AuditApi: Send + Sync {
    async fn current_user(&self, token: &str) -> Result<CurrentUser, AppError>;
    async fn summary(&self, token: &str) -> Result<AuditSummary, AppError>;
    async fn user_events(&self, token: &str, query: &EventQuery) -> Result<Vec<UserEvent>, AppError>;
    async fn asset_events(&self, token: &str, query: &EventQuery)
    -> Result<Vec<AssetEvent>, AppError>;
    async fn login(&self, credentials: &PasswordLogin) -> Result<LoginResponse, AppError>;
}
