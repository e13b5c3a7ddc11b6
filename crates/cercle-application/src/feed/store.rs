//! The interaction store: feed collection, pagination and optimistic likes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use cercle_core::CercleError;
use cercle_core::config::DEFAULT_PAGE_SIZE;
use cercle_core::feed::{
    FeedApi, FeedFilter, FeedSnapshot, FeedSnapshotRepository, PageInfo, Pagination, Post, PostId,
};

use super::like::{LikeOutcome, LikeTransition, PendingLike};
use super::state::FeedState;

/// Shown when publishing fails without a server message.
pub const CREATE_POST_ERROR: &str = "Erreur lors de la publication";
/// Shown when a like toggle is rolled back.
pub const LIKE_ERROR: &str = "Impossible de mettre à jour le like";

/// Result of [`InteractionStore::create_post`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatePostOutcome {
    /// The post was accepted and prepended to the feed.
    Created(Post),
    /// Nothing changed; `error` is ready to display.
    Failed { error: String },
}

/// Holds the feed a user is looking at and applies their interactions to it.
///
/// State lives in a `watch` channel and is only ever mutated inside
/// synchronous `send_modify` closures, so no lock is held across a network
/// call. Every network call runs under a child of the store's cancellation
/// token.
pub struct InteractionStore {
    api: Arc<dyn FeedApi>,
    snapshots: Option<Arc<dyn FeedSnapshotRepository>>,
    state: watch::Sender<FeedState>,
    cancel: Mutex<CancellationToken>,
    next_ticket: AtomicU64,
}

impl InteractionStore {
    pub fn new(api: Arc<dyn FeedApi>) -> Self {
        let (state, _) = watch::channel(FeedState::default());
        Self {
            api,
            snapshots: None,
            state,
            cancel: Mutex::new(CancellationToken::new()),
            next_ticket: AtomicU64::new(1),
        }
    }

    /// Persists the feed snapshot through `repository` after every change to
    /// the collection or filter.
    pub fn with_snapshot_repository(mut self, repository: Arc<dyn FeedSnapshotRepository>) -> Self {
        self.snapshots = Some(repository);
        self
    }

    /// A copy of the current state.
    pub fn state(&self) -> FeedState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    // ============================================================================
    // Reads
    // ============================================================================

    /// Loads `page` of the current filter's collection.
    ///
    /// `reset` rewinds pagination immediately and replaces the collection on
    /// success, otherwise the page is appended.
    /// Failures are reported through `FeedState::error`. A response that
    /// arrives after the filter changed or the feed was cleared is discarded.
    pub async fn fetch_posts(&self, reset: bool, page: u32) {
        let token = self.child_token();
        let fetch = InFlightFetch::start(&self.state, reset);
        let filter = fetch.filter;

        let result = tokio::select! {
            _ = token.cancelled() => Err(CercleError::Cancelled),
            result = self.api.list_posts(filter, page, DEFAULT_PAGE_SIZE) => result,
        };

        let mut snapshot = None;
        fetch.finish(|state| {
            if state.filter != filter {
                tracing::debug!(%filter, current = %state.filter, "Discarding response for a previous filter");
                return;
            }
            match result {
                Ok(loaded) => {
                    let count = loaded.posts.len();
                    if reset {
                        state.posts = loaded.posts;
                    } else {
                        state.posts.extend(loaded.posts);
                    }
                    state.pagination = PageInfo::resolve(loaded.pagination, page);
                    snapshot = Some(state.snapshot());
                    tracing::debug!(%filter, page, count, reset, "Feed page applied");
                }
                Err(e) if e.is_cancelled() => {
                    tracing::debug!(%filter, page, "Fetch cancelled");
                }
                Err(e) if e.is_session_expired() => {
                    tracing::info!(%filter, "Fetch stopped by session expiry");
                }
                Err(e) => {
                    tracing::warn!(%filter, page, error = %e, "Failed to load feed");
                    state.error = Some(e.user_message());
                }
            }
        });

        if let Some(snapshot) = snapshot {
            self.persist(snapshot).await;
        }
    }

    /// Fetches the next page when the server reported one and no fetch is
    /// running. Returns whether a fetch was made.
    pub async fn load_more(&self) -> bool {
        let next_page = {
            let state = self.state.borrow();
            (state.pagination.has_next && !state.loading).then(|| state.pagination.page + 1)
        };

        match next_page {
            Some(page) => {
                self.fetch_posts(false, page).await;
                true
            }
            None => false,
        }
    }

    // ============================================================================
    // Writes
    // ============================================================================

    /// Publishes a post and prepends the server's copy.
    pub async fn create_post(&self, content: &str) -> CreatePostOutcome {
        let content = content.trim();
        let token = self.child_token();
        let epoch = self.state.borrow().epoch;

        let result = tokio::select! {
            _ = token.cancelled() => Err(CercleError::Cancelled),
            result = self.api.create_post(content) => result,
        };

        let post = match result {
            Ok(post) => post,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create post");
                return CreatePostOutcome::Failed {
                    error: create_post_message(&e),
                };
            }
        };

        let mut snapshot = None;
        self.state.send_if_modified(|state| {
            if state.epoch != epoch {
                return false;
            }
            state.posts.insert(0, post.clone());
            snapshot = Some(state.snapshot());
            true
        });
        if let Some(snapshot) = snapshot {
            self.persist(snapshot).await;
        }

        tracing::info!(post_id = %post.id, "Post created");
        CreatePostOutcome::Created(post)
    }

    /// Toggles the viewer's like on `post_id`, optimistically.
    ///
    /// The post changes before the request is sent. On success the server's
    /// values replace the optimistic ones; on failure the previous values are
    /// restored. Either way the resolved collection is persisted. While a
    /// toggle is pending, further toggles of the same post are ignored.
    pub async fn toggle_like(&self, post_id: PostId) -> LikeOutcome {
        let Some(transition) = self.begin_like(post_id) else {
            tracing::debug!(%post_id, "Like toggle ignored");
            return LikeOutcome::Ignored;
        };
        let token = self.child_token();

        let result = tokio::select! {
            _ = token.cancelled() => Err(CercleError::Cancelled),
            result = self.api.toggle_like(post_id) => result,
        };

        let (outcome, snapshot) = match result {
            Ok(status) => {
                let server = status.into();
                (LikeOutcome::Committed(server), transition.commit(server))
            }
            Err(e) => {
                let silent = e.is_session_expired() || e.is_cancelled();
                if silent {
                    tracing::debug!(%post_id, error = %e, "Like toggle rolled back");
                } else {
                    tracing::warn!(%post_id, error = %e, "Like toggle failed, rolling back");
                }
                let snapshot = transition.roll_back((!silent).then(|| LIKE_ERROR.to_string()));
                (LikeOutcome::RolledBack, snapshot)
            }
        };

        if let Some(snapshot) = snapshot {
            self.persist(snapshot).await;
        }
        outcome
    }

    /// Applies the optimistic toggle and registers the pending entry in one
    /// step. Returns `None` if the post is pending or not loaded.
    fn begin_like(&self, post_id: PostId) -> Option<LikeTransition<'_>> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let mut registered = false;

        self.state.send_if_modified(|state| {
            if state.pending_likes.contains_key(&post_id) {
                return false;
            }
            let Some(before) = state.post(post_id).map(Post::like_snapshot) else {
                return false;
            };
            state.apply_like(post_id, before.toggled());
            state
                .pending_likes
                .insert(post_id, PendingLike { ticket, before });
            registered = true;
            true
        });

        registered.then(|| LikeTransition::new(&self.state, post_id, ticket))
    }

    // ============================================================================
    // Filter and lifecycle
    // ============================================================================

    /// Switches the collection the feed reads from.
    ///
    /// A different filter empties the collection and resets pagination; the
    /// caller then fetches with `reset = true`. Returns whether the filter
    /// changed.
    pub async fn set_filter(&self, filter: FeedFilter) -> bool {
        let mut snapshot = None;
        self.state.send_if_modified(|state| {
            if state.filter == filter {
                return false;
            }
            state.filter = filter;
            state.posts.clear();
            state.pagination = Pagination::default();
            snapshot = Some(state.snapshot());
            true
        });

        match snapshot {
            Some(snapshot) => {
                tracing::debug!(%filter, "Feed filter changed");
                self.persist(snapshot).await;
                true
            }
            None => false,
        }
    }

    /// Resets every field, deletes the persisted snapshot and cancels
    /// in-flight work.
    ///
    /// Cancellation comes last so that clearing from inside an in-flight call
    /// (session expiry) still finishes removing the snapshot. Responses that
    /// land after the reset are discarded either way.
    pub async fn clear_feed(&self) {
        self.state.send_modify(|state| {
            let epoch = state.epoch + 1;
            *state = FeedState {
                epoch,
                ..FeedState::default()
            };
        });

        if let Some(repository) = &self.snapshots
            && let Err(e) = repository.clear().await
        {
            tracing::warn!(error = %e, "Failed to remove feed snapshot");
        }
        self.cancel_all();
        tracing::info!("Feed cleared");
    }

    /// Installs the persisted snapshot, if any. Returns whether one was found.
    ///
    /// Restored posts are stale until the next fetch. A missing or unreadable
    /// snapshot leaves the store empty.
    pub async fn restore(&self) -> bool {
        let Some(repository) = &self.snapshots else {
            return false;
        };

        let snapshot = match repository.load().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable feed snapshot");
                return false;
            }
        };

        tracing::debug!(
            filter = %snapshot.filter,
            posts = snapshot.posts.len(),
            saved_at = snapshot.saved_at.as_deref().unwrap_or("unknown"),
            "Restoring feed snapshot"
        );
        self.state.send_modify(|state| {
            state.filter = snapshot.filter;
            state.posts = snapshot.posts;
            state.pagination = Pagination::default();
        });
        true
    }

    pub fn dismiss_error(&self) {
        self.state.send_if_modified(|state| state.error.take().is_some());
    }

    /// Cancels every in-flight fetch, post and like.
    ///
    /// Cancelled likes roll back; cancelled fetches leave the collection as is.
    pub fn cancel_all(&self) {
        let mut cancel = self.cancel.lock().unwrap_or_else(|e| e.into_inner());
        cancel.cancel();
        *cancel = CancellationToken::new();
    }

    fn child_token(&self) -> CancellationToken {
        self.cancel
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .child_token()
    }

    async fn persist(&self, snapshot: FeedSnapshot) {
        let Some(repository) = &self.snapshots else {
            return;
        };
        let snapshot = snapshot.with_saved_at(chrono::Utc::now().to_rfc3339());
        if let Err(e) = repository.save(&snapshot).await {
            tracing::warn!(error = %e, "Failed to persist feed snapshot");
        }
    }
}

/// The server's message, or the generic publication error.
fn create_post_message(error: &CercleError) -> String {
    match error {
        CercleError::RequestFailed {
            message: Some(message),
            ..
        } if !message.trim().is_empty() => message.clone(),
        _ => CREATE_POST_ERROR.to_string(),
    }
}

/// Counts one fetch towards `loading` until finished or dropped.
struct InFlightFetch<'a> {
    state: &'a watch::Sender<FeedState>,
    filter: FeedFilter,
    epoch: u64,
    finished: bool,
}

impl<'a> InFlightFetch<'a> {
    fn start(state: &'a watch::Sender<FeedState>, reset: bool) -> Self {
        let mut started = (FeedFilter::default(), 0);
        state.send_modify(|state| {
            state.in_flight_fetches += 1;
            state.loading = true;
            state.error = None;
            if reset {
                state.pagination = Pagination::default();
            }
            started = (state.filter, state.epoch);
        });
        Self {
            state,
            filter: started.0,
            epoch: started.1,
            finished: false,
        }
    }

    /// Releases the fetch and applies `apply` in the same update, unless the
    /// feed was cleared since the fetch started.
    fn finish(mut self, apply: impl FnOnce(&mut FeedState)) {
        self.finished = true;
        let epoch = self.epoch;
        self.state.send_if_modified(|state| {
            if state.epoch != epoch {
                tracing::debug!("Discarding response from before clear_feed");
                return false;
            }
            state.in_flight_fetches = state.in_flight_fetches.saturating_sub(1);
            state.loading = state.in_flight_fetches > 0;
            apply(state);
            true
        });
    }
}

impl Drop for InFlightFetch<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let epoch = self.epoch;
            self.state.send_if_modified(|state| {
                if state.epoch != epoch {
                    return false;
                }
                state.in_flight_fetches = state.in_flight_fetches.saturating_sub(1);
                state.loading = state.in_flight_fetches > 0;
                true
            });
        }
    }
}
