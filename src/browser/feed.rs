//! One paginated, filterable event stream.
//!
//! Items held by a feed are always a prefix of the server's result set for
//! the filters that were last applied. Every reset bumps a generation
//! counter; responses that belong to an older generation are dropped, so a
//! slow request can never overwrite a newer one.

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;

use super::debounce::Debouncer;
use crate::api::{AuditApi, EventQuery};
use crate::auth::SessionStore;
use crate::error::AppError;
use crate::export::{self, CsvExport, CsvRecord};
use crate::models::{AssetEvent, AssetEventType, UserEvent, UserEventType};
use crate::navigation::redirect_for;

/// Binds a feed to its event type and endpoint.
#[async_trait]
pub trait FeedKind: Send + Sync + 'static {
    type Event: CsvRecord + Clone + Send + Sync + 'static;
    type EventType: Clone + PartialEq + Display + FromStr<Err = String> + Send + Sync + 'static;

    /// Short name used in logs and export file names.
    const NAME: &'static str;

    async fn fetch(
        api: &dyn AuditApi,
        token: &str,
        query: &EventQuery,
    ) -> Result<Vec<Self::Event>, AppError>;
}

pub struct UserFeed;

#[async_trait]
impl FeedKind for UserFeed {
    type Event = UserEvent;
    type EventType = UserEventType;

    const NAME: &'static str = "user";

    async fn fetch(
        api: &dyn AuditApi,
        token: &str,
        query: &EventQuery,
    ) -> Result<Vec<UserEvent>, AppError> {
        api.user_events(token, query).await
    }
}

pub struct AssetFeed;

#[async_trait]
impl FeedKind for AssetFeed {
    type Event = AssetEvent;
    type EventType = AssetEventType;

    const NAME: &'static str = "asset";

    async fn fetch(
        api: &dyn AuditApi,
        token: &str,
        query: &EventQuery,
    ) -> Result<Vec<AssetEvent>, AppError> {
        api.asset_events(token, query).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filters<T> {
    pub search: String,
    pub event_type: Option<T>,
}

impl<T> Default for Filters<T> {
    fn default() -> Self {
        Self {
            search: String::new(),
            event_type: None,
        }
    }
}

impl<T: Display> Filters<T> {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.event_type.is_none()
    }

    fn query(&self, limit: usize, offset: usize) -> EventQuery {
        EventQuery {
            limit,
            offset,
            search: Some(self.search.clone()).filter(|s| !s.is_empty()),
            event_type: self.event_type.as_ref().map(|t| t.to_string()),
        }
    }
}

/// A point-in-time copy of a feed, for rendering.
pub struct FeedSnapshot<K: FeedKind> {
    pub items: Vec<K::Event>,
    pub filters: Filters<K::EventType>,
    pub has_more: bool,
    pub is_loading: bool,
}

struct FeedState<K: FeedKind> {
    items: Vec<K::Event>,
    /// What the user has typed or selected.
    filters: Filters<K::EventType>,
    /// What `items` actually reflects.
    applied: Filters<K::EventType>,
    has_more: bool,
    in_flight: usize,
    generation: u64,
    session_expired: bool,
}

enum FetchMode<T> {
    Reset(Filters<T>),
    Append,
}

/// A request that has been issued but not yet settled. Dropping it without
/// calling [`complete`](Self::complete) releases the loading slot and
/// discards the result.
struct PendingFetch<'a, K: FeedKind> {
    feed: &'a Feed<K>,
    generation: u64,
    mode: FetchMode<K::EventType>,
    query: EventQuery,
}

impl<K: FeedKind> PendingFetch<'_, K> {
    fn complete(self, page: Vec<K::Event>) {
        let page_size = self.feed.page_size;
        let mut st = self.feed.state.lock();

        if st.generation != self.generation {
            tracing::debug!(
                "Discarding stale {} events page (offset {})",
                K::NAME,
                self.query.offset
            );
            return;
        }

        let full = page.len() == page_size;
        match &self.mode {
            FetchMode::Reset(filters) => {
                st.items = page;
                st.applied = filters.clone();
            }
            FetchMode::Append => st.items.extend(page),
        }
        st.has_more = full;
    }
}

impl<K: FeedKind> Drop for PendingFetch<'_, K> {
    fn drop(&mut self) {
        let mut st = self.feed.state.lock();
        st.in_flight = st.in_flight.saturating_sub(1);
    }
}

pub struct Feed<K: FeedKind> {
    api: Arc<dyn AuditApi>,
    session: SessionStore,
    page_size: usize,
    debouncer: Debouncer,
    state: Mutex<FeedState<K>>,
}

impl<K: FeedKind> Feed<K> {
    pub fn new(
        api: Arc<dyn AuditApi>,
        session: SessionStore,
        page_size: usize,
        search_debounce: Duration,
    ) -> Self {
        Self {
            api,
            session,
            page_size,
            debouncer: Debouncer::new(search_debounce),
            state: Mutex::new(FeedState {
                items: Vec::new(),
                filters: Filters::default(),
                applied: Filters::default(),
                has_more: true,
                in_flight: 0,
                generation: 0,
                session_expired: false,
            }),
        }
    }

    pub fn snapshot(&self) -> FeedSnapshot<K> {
        let st = self.state.lock();
        FeedSnapshot {
            items: st.items.clone(),
            filters: st.filters.clone(),
            has_more: st.has_more,
            is_loading: st.in_flight > 0,
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_more(&self) -> bool {
        self.state.lock().has_more
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().in_flight > 0
    }

    pub fn filters(&self) -> Filters<K::EventType> {
        self.state.lock().filters.clone()
    }

    /// Replace the loaded items with page 1 for the given filters. Failures
    /// leave the current items in place.
    pub async fn reset_load(&self, search: &str, event_type: Option<K::EventType>) {
        let Some(token) = self.session.token() else {
            tracing::debug!("No session token, skipping {} events reload", K::NAME);
            return;
        };

        let filters = Filters {
            search: search.to_string(),
            event_type,
        };
        if let Err(e) = self.fetch_reset(&token, filters).await {
            self.note_failure("reload", e);
        }
    }

    /// Append the next page under the applied filters. Does nothing when the
    /// feed is exhausted or a request is already running. Returns whether a
    /// request was issued.
    pub async fn load_more(&self) -> bool {
        let Some(token) = self.session.token() else {
            return false;
        };

        let pending = {
            let mut st = self.state.lock();
            if !st.has_more || st.in_flight > 0 {
                return false;
            }
            st.in_flight += 1;
            PendingFetch {
                feed: self,
                generation: st.generation,
                mode: FetchMode::Append,
                query: st.applied.query(self.page_size, st.items.len()),
            }
        };

        tracing::debug!("Loading more {} events from offset {}", K::NAME, pending.query.offset);
        match K::fetch(self.api.as_ref(), &token, &pending.query).await {
            Ok(page) => pending.complete(page),
            Err(e) => {
                drop(pending);
                self.note_failure("load more", e);
            }
        }
        true
    }

    /// Store the search text now and reload once typing has paused.
    pub fn set_search(self: &Arc<Self>, text: &str) {
        self.state.lock().filters.search = text.to_string();

        let feed = Arc::clone(self);
        let text = text.to_string();
        self.debouncer.schedule(async move {
            let event_type = feed.state.lock().filters.event_type.clone();
            feed.reset_load(&text, event_type).await;
        });
    }

    /// Store the type filter and reload straight away.
    pub async fn set_event_type(&self, event_type: Option<K::EventType>) {
        let search = {
            let mut st = self.state.lock();
            st.filters.event_type = event_type.clone();
            st.filters.search.clone()
        };
        self.reset_load(&search, event_type).await;
    }

    pub async fn clear_filters(&self) {
        self.debouncer.cancel();
        self.state.lock().filters = Filters::default();
        self.reset_load("", None).await;
    }

    pub fn search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Returns true once after a request was rejected as unauthorized.
    pub fn take_session_expired(&self) -> bool {
        std::mem::take(&mut self.state.lock().session_expired)
    }

    /// CSV of the rows currently loaded, not the full result set.
    pub fn export(&self, date: NaiveDate) -> CsvExport {
        let st = self.state.lock();
        export::export(K::NAME, &st.items, date)
    }

    pub(crate) fn begin_reload(&self) -> ReloadTicket<'_, K> {
        let filters = self.filters();
        ReloadTicket(self.begin_reset(filters))
    }

    async fn fetch_reset(&self, token: &str, filters: Filters<K::EventType>) -> Result<(), AppError> {
        let pending = self.begin_reset(filters);
        let page = K::fetch(self.api.as_ref(), token, &pending.query).await?;
        pending.complete(page);
        Ok(())
    }

    fn begin_reset(&self, filters: Filters<K::EventType>) -> PendingFetch<'_, K> {
        let mut st = self.state.lock();
        st.generation += 1;
        st.in_flight += 1;
        let query = filters.query(self.page_size, 0);
        PendingFetch {
            feed: self,
            generation: st.generation,
            mode: FetchMode::Reset(filters),
            query,
        }
    }

    fn note_failure(&self, op: &str, err: AppError) {
        if let Some(route) = redirect_for(&err) {
            tracing::warn!("{} events {op} rejected, owing redirect to {route}: {err}", K::NAME);
            self.state.lock().session_expired = true;
        } else {
            tracing::debug!("{} events {op} failed, keeping current items: {err}", K::NAME);
        }
    }
}

/// A page-1 request prepared by the browser's initial load, so that several
/// feeds can be fetched together and applied only if all succeed.
pub(crate) struct ReloadTicket<'a, K: FeedKind>(PendingFetch<'a, K>);

impl<K: FeedKind> ReloadTicket<'_, K> {
    pub(crate) async fn fetch(&self, api: &dyn AuditApi, token: &str) -> Result<Vec<K::Event>, AppError> {
        K::fetch(api, token, &self.0.query).await
    }

    pub(crate) fn complete(self, page: Vec<K::Event>) {
        self.0.complete(page);
    }
}
