use std::sync::Arc;

use crate::api::AuditApi;
use crate::auth::SessionStore;
use crate::browser::AuditBrowser;
use crate::config::Config;
use crate::theme::ThemeStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub api: Arc<dyn AuditApi>,
    pub session: SessionStore,
    pub theme: ThemeStore,
    pub browser: AuditBrowser,
}
