use std::sync::Arc;

use chrono::Utc;

use crate::auth::jwt;
use crate::error::AppError;
use crate::navigation::Route;
use crate::storage::Storage;

const TOKEN_KEY: &str = "token";

/// Holds the bearer token for the API. Backed by the injected storage so a
/// login survives restarts.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// The stored token, unless it is missing, blank or a JWT past its expiry.
    pub fn token(&self) -> Option<String> {
        let token = self.storage.get(TOKEN_KEY)?;
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        if jwt::is_expired(token, Utc::now()) {
            tracing::debug!("Stored token has expired");
            return None;
        }
        Some(token.to_string())
    }

    /// Like [`token`](Self::token), but maps absence to the login redirect.
    pub fn require_token(&self) -> Result<String, Route> {
        self.token().ok_or(Route::Login)
    }

    pub fn set_token(&self, token: &str) -> Result<(), AppError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::BadRequest("Token must not be empty".to_string()));
        }
        self.storage.set(TOKEN_KEY, token)
    }

    pub fn clear(&self) -> Result<(), AppError> {
        self.storage.remove(TOKEN_KEY)
    }

    /// Drop the session and send the user back to the login page.
    pub fn logout(&self) -> Result<Route, AppError> {
        self.clear()?;
        tracing::info!("Logged out");
        Ok(Route::Login)
    }
}
