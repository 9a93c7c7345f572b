pub mod debounce;
pub mod feed;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::api::AuditApi;
use crate::auth::SessionStore;
use crate::config::Config;
use crate::error::AppError;
use crate::models::{AuditSummary, CurrentUser};
use crate::navigation::Route;

pub use feed::{AssetFeed, Feed, FeedKind, FeedSnapshot, Filters, UserFeed};

/// Where the dashboard is in its load sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    /// Navigation away happened before (or instead of) loading audit data.
    Redirect(Route),
    /// The initial load failed. Nothing but the error and a way back to
    /// login should be shown.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Summary,
    Users,
    Assets,
}

impl Tab {
    /// Parse the `tab` parameter. Unknown values land on the summary.
    pub fn from_param(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "users" => Tab::Users,
            "assets" => Tab::Assets,
            _ => Tab::Summary,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Summary => "summary",
            Tab::Users => "users",
            Tab::Assets => "assets",
        }
    }
}

struct DashboardState {
    load: LoadState,
    current_user: Option<CurrentUser>,
    summary: Option<AuditSummary>,
    tab: Tab,
}

/// The audit dashboard: summary, two event feeds and the access gate in
/// front of them.
pub struct AuditBrowser {
    api: Arc<dyn AuditApi>,
    session: SessionStore,
    user_events: Arc<Feed<UserFeed>>,
    asset_events: Arc<Feed<AssetFeed>>,
    state: Mutex<DashboardState>,
}

impl AuditBrowser {
    pub fn new(api: Arc<dyn AuditApi>, session: SessionStore, config: &Config) -> Self {
        let user_events = Arc::new(Feed::new(
            api.clone(),
            session.clone(),
            config.page_size,
            config.search_debounce,
        ));
        let asset_events = Arc::new(Feed::new(
            api.clone(),
            session.clone(),
            config.page_size,
            config.search_debounce,
        ));

        Self {
            api,
            session,
            user_events,
            asset_events,
            state: Mutex::new(DashboardState {
                load: LoadState::Idle,
                current_user: None,
                summary: None,
                tab: config.start_tab,
            }),
        }
    }

    pub fn user_events(&self) -> &Arc<Feed<UserFeed>> {
        &self.user_events
    }

    pub fn asset_events(&self) -> &Arc<Feed<AssetFeed>> {
        &self.asset_events
    }

    pub fn load_state(&self) -> LoadState {
        self.state.lock().load.clone()
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.state.lock().current_user.clone()
    }

    pub fn summary(&self) -> Option<AuditSummary> {
        self.state.lock().summary.clone()
    }

    pub fn tab(&self) -> Tab {
        self.state.lock().tab
    }

    pub fn set_tab(&self, tab: Tab) {
        self.state.lock().tab = tab;
    }

    /// Gate on session and role, then load the summary and page 1 of both
    /// feeds together. Either everything is applied or nothing is.
    pub async fn load(&self) -> LoadState {
        self.set_load(LoadState::Loading);

        let token = match self.session.require_token() {
            Ok(token) => token,
            Err(route) => {
                tracing::info!("No session, redirecting to {route}");
                return self.set_load(LoadState::Redirect(route));
            }
        };

        let me = match self.api.current_user(&token).await {
            Ok(me) => me,
            Err(e) => return self.fail(e),
        };
        let authorized = me.role.can_view_audit();
        self.state.lock().current_user = Some(me.clone());

        if !authorized {
            tracing::info!("Role {} may not view the audit log", me.role.as_str());
            return self.set_load(LoadState::Redirect(Route::Assets));
        }

        let users = self.user_events.begin_reload();
        let assets = self.asset_events.begin_reload();

        let result = tokio::try_join!(
            self.api.summary(&token),
            users.fetch(self.api.as_ref(), &token),
            assets.fetch(self.api.as_ref(), &token),
        );

        match result {
            Ok((summary, user_page, asset_page)) => {
                tracing::info!(
                    "Audit dashboard loaded ({} user events, {} asset events)",
                    user_page.len(),
                    asset_page.len()
                );
                users.complete(user_page);
                assets.complete(asset_page);
                self.state.lock().summary = Some(summary);
                self.set_load(LoadState::Ready)
            }
            Err(e) => self.fail(e),
        }
    }

    /// Run the whole load again. Pagination restarts at page 1; filters are
    /// kept and applied.
    pub async fn refresh(&self) -> LoadState {
        tracing::debug!("Refreshing audit dashboard");
        self.load().await
    }

    /// A redirect owed because a feed request came back unauthorized after
    /// the dashboard had loaded.
    pub fn pending_redirect(&self) -> Option<Route> {
        let users = self.user_events.take_session_expired();
        let assets = self.asset_events.take_session_expired();
        if users || assets {
            let route = Route::Login;
            self.set_load(LoadState::Redirect(route.clone()));
            Some(route)
        } else {
            None
        }
    }

    /// Recovery action offered with a failed load.
    pub fn go_to_login(&self) -> Route {
        Route::Login
    }

    pub fn logout(&self) -> Result<Route, AppError> {
        let route = self.session.logout()?;
        let mut st = self.state.lock();
        st.current_user = None;
        st.summary = None;
        st.load = LoadState::Redirect(route.clone());
        Ok(route)
    }

    fn fail(&self, err: AppError) -> LoadState {
        tracing::warn!("Audit dashboard failed to load: {err}");
        self.set_load(LoadState::Failed(err.message().to_string()))
    }

    fn set_load(&self, load: LoadState) -> LoadState {
        self.state.lock().load = load.clone();
        load
    }
}
