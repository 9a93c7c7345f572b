pub mod api;
pub mod auth;
pub mod browser;
pub mod config;
pub mod console;
pub mod error;
pub mod export;
pub mod models;
pub mod navigation;
pub mod state;
pub mod storage;
pub mod theme;

use std::sync::Arc;

use crate::api::{AuditApi, HttpApi};
use crate::auth::SessionStore;
use crate::browser::AuditBrowser;
use crate::config::Config;
use crate::error::AppError;
use crate::state::{AppState, SharedState};
use crate::storage::{FileStorage, Storage};
use crate::theme::ThemeStore;

/// Wire the console against the HTTP API and file-backed storage.
pub fn build_console(config: Config) -> Result<SharedState, AppError> {
    let api: Arc<dyn AuditApi> = Arc::new(HttpApi::new(&config.api_url, config.request_timeout)?);
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(&config.storage_path)?);
    build_state(config, api, storage)
}

/// Wire the console from explicit collaborators.
pub fn build_state(
    config: Config,
    api: Arc<dyn AuditApi>,
    storage: Arc<dyn Storage>,
) -> Result<SharedState, AppError> {
    let session = SessionStore::new(storage.clone());
    let theme = ThemeStore::new(storage, config.prefers_dark);
    let mode = theme.init()?;
    tracing::debug!("Theme initialised to {mode}");

    let browser = AuditBrowser::new(api.clone(), session.clone(), &config);

    Ok(Arc::new(AppState {
        config,
        api,
        session,
        theme,
        browser,
    }))
}
