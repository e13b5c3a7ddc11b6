use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::Semaphore;

use cercle_core::CercleError;
use cercle_core::error::Result;
use cercle_core::feed::{
    FeedApi, FeedFilter, FeedSnapshot, FeedSnapshotRepository, LikeSnapshot, LikeStatus, PageInfo,
    Pagination, Post, PostId, PostPage, UserSummary,
};
use cercle_infrastructure::FileFeedSnapshotRepository;

use super::*;

// ============================================================================
// Scripted FeedApi
// ============================================================================

/// Answers from per-endpoint queues and records every call.
///
/// When gated, each call waits for one `release()` before answering.
#[derive(Default)]
struct ScriptedFeedApi {
    pages: Mutex<VecDeque<Result<PostPage>>>,
    created: Mutex<VecDeque<Result<Post>>>,
    likes: Mutex<VecDeque<Result<LikeStatus>>>,
    list_calls: Mutex<Vec<(FeedFilter, u32, u32)>>,
    create_calls: Mutex<Vec<String>>,
    like_calls: Mutex<Vec<PostId>>,
    gate: Option<Semaphore>,
}

impl ScriptedFeedApi {
    fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    fn page(self, result: Result<PostPage>) -> Self {
        self.pages.lock().unwrap().push_back(result);
        self
    }

    fn created(self, result: Result<Post>) -> Self {
        self.created.lock().unwrap().push_back(result);
        self
    }

    fn like(self, result: Result<LikeStatus>) -> Self {
        self.likes.lock().unwrap().push_back(result);
        self
    }

    fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    fn list_calls(&self) -> Vec<(FeedFilter, u32, u32)> {
        self.list_calls.lock().unwrap().clone()
    }

    fn like_calls(&self) -> usize {
        self.like_calls.lock().unwrap().len()
    }

    async fn wait_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
    }
}

#[async_trait]
impl FeedApi for ScriptedFeedApi {
    async fn list_posts(&self, filter: FeedFilter, page: u32, limit: u32) -> Result<PostPage> {
        self.list_calls.lock().unwrap().push((filter, page, limit));
        self.wait_gate().await;
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(page_of(Vec::new(), None)))
    }

    async fn create_post(&self, content: &str) -> Result<Post> {
        self.create_calls.lock().unwrap().push(content.to_string());
        self.wait_gate().await;
        self.created
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CercleError::internal("no scripted post")))
    }

    async fn toggle_like(&self, post_id: PostId) -> Result<LikeStatus> {
        self.like_calls.lock().unwrap().push(post_id);
        self.wait_gate().await;
        self.likes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CercleError::internal("no scripted like")))
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn post(id: i64, liked: bool, like_count: u32) -> Post {
    Post {
        id: PostId(id),
        author: UserSummary {
            id: 100 + id,
            display_name: format!("user{}", id),
            avatar: None,
            is_verified: false,
        },
        content: format!("post {}", id),
        like_count,
        reply_count: 0,
        is_liked_by_current_user: liked,
        created_at: None,
    }
}

fn page_of(posts: Vec<Post>, pagination: Option<PageInfo>) -> PostPage {
    PostPage { posts, pagination }
}

fn info(page: u32, has_next: bool, total: u64) -> Option<PageInfo> {
    Some(PageInfo {
        page: Some(page),
        limit: Some(20),
        has_next: Some(has_next),
        total: Some(total),
    })
}

fn ids(state: &FeedState) -> Vec<i64> {
    state.posts.iter().map(|post| post.id.0).collect()
}

/// A store whose feed already holds `posts` (loaded through the API).
async fn loaded_store(
    api: ScriptedFeedApi,
    posts: Vec<Post>,
) -> (Arc<InteractionStore>, Arc<ScriptedFeedApi>) {
    let api = Arc::new(api.page(Ok(page_of(posts, info(1, true, 40)))));
    let store = Arc::new(InteractionStore::new(api.clone()));
    api.release();
    store.fetch_posts(true, 1).await;
    (store, api)
}

// ============================================================================
// fetch_posts / load_more
// ============================================================================

#[tokio::test]
async fn test_fetch_reset_then_append() {
    let api = Arc::new(
        ScriptedFeedApi::default()
            .page(Ok(page_of(vec![post(3, false, 0), post(2, false, 0)], info(1, true, 4))))
            .page(Ok(page_of(vec![post(1, false, 0), post(0, false, 0)], info(2, false, 4))))
            .page(Ok(page_of(vec![post(9, false, 0)], info(1, false, 1)))),
    );
    let store = InteractionStore::new(api.clone());

    store.fetch_posts(true, 1).await;
    assert_eq!(ids(&store.state()), vec![3, 2]);

    store.fetch_posts(false, 2).await;
    let state = store.state();
    assert_eq!(ids(&state), vec![3, 2, 1, 0]);
    assert_eq!(state.pagination.page, 2);
    assert!(!state.pagination.has_next);
    assert_eq!(state.pagination.total, 4);

    store.fetch_posts(true, 1).await;
    assert_eq!(ids(&store.state()), vec![9]);

    assert_eq!(
        api.list_calls(),
        vec![
            (FeedFilter::Recent, 1, 20),
            (FeedFilter::Recent, 2, 20),
            (FeedFilter::Recent, 1, 20)
        ]
    );
}

#[tokio::test]
async fn test_fetch_pagination_fallbacks() {
    let api = Arc::new(ScriptedFeedApi::default().page(Ok(page_of(vec![post(1, false, 0)], None))));
    let store = InteractionStore::new(api);

    store.fetch_posts(false, 3).await;

    assert_eq!(
        store.state().pagination,
        Pagination {
            page: 3,
            limit: 20,
            has_next: false,
            total: 0
        }
    );
}

#[tokio::test]
async fn test_fetch_failure_keeps_collection_and_sets_error() {
    let (store, api) = loaded_store(ScriptedFeedApi::default(), vec![post(1, false, 0)]).await;
    api.pages
        .lock()
        .unwrap()
        .push_back(Err(CercleError::request_failed(500, None)));
    api.pages.lock().unwrap().push_back(Err(CercleError::request_failed(
        400,
        Some("Page invalide".to_string()),
    )));
    api.pages
        .lock()
        .unwrap()
        .push_back(Err(CercleError::network("connection refused")));

    store.fetch_posts(true, 1).await;
    let state = store.state();
    assert_eq!(ids(&state), vec![1]);
    assert_eq!(state.error.as_deref(), Some("Erreur 500"));
    assert!(!state.loading);

    store.fetch_posts(true, 1).await;
    assert_eq!(store.state().error.as_deref(), Some("Page invalide"));

    store.fetch_posts(true, 1).await;
    assert_eq!(store.state().error.as_deref(), Some("connection refused"));

    store.dismiss_error();
    assert_eq!(store.state().error, None);
}

#[tokio::test]
async fn test_fetch_session_expired_sets_no_error() {
    let api = Arc::new(ScriptedFeedApi::default().page(Err(CercleError::SessionExpired)));
    let store = InteractionStore::new(api);

    store.fetch_posts(true, 1).await;

    let state = store.state();
    assert_eq!(state.error, None);
    assert!(!state.loading);
}

#[tokio::test]
async fn test_fetch_clears_previous_error_on_start() {
    let api = Arc::new(
        ScriptedFeedApi::default()
            .page(Err(CercleError::request_failed(503, None)))
            .page(Ok(page_of(vec![post(1, false, 0)], None))),
    );
    let store = InteractionStore::new(api);

    store.fetch_posts(true, 1).await;
    assert!(store.state().error.is_some());

    store.fetch_posts(true, 1).await;
    assert_eq!(store.state().error, None);
}

#[tokio::test]
async fn test_loading_spans_overlapping_fetches() {
    let api = Arc::new(
        ScriptedFeedApi::gated()
            .page(Ok(page_of(vec![post(1, false, 0)], None)))
            .page(Ok(page_of(vec![post(2, false, 0)], None))),
    );
    let store = Arc::new(InteractionStore::new(api.clone()));
    let mut rx = store.subscribe();

    let first = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_posts(true, 1).await }
    });
    let second = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_posts(true, 1).await }
    });
    rx.wait_for(|state| state.in_flight_fetches == 2).await.unwrap();
    assert!(store.state().loading);

    api.release();
    rx.wait_for(|state| state.in_flight_fetches == 1).await.unwrap();
    assert!(store.state().loading);

    api.release();
    first.await.unwrap();
    second.await.unwrap();
    let state = store.state();
    assert!(!state.loading);
    assert_eq!(state.posts.len(), 1);
}

#[tokio::test]
async fn test_response_for_previous_filter_is_discarded() {
    let api = Arc::new(ScriptedFeedApi::gated().page(Ok(page_of(vec![post(1, false, 0)], info(1, true, 9)))));
    let store = Arc::new(InteractionStore::new(api.clone()));
    let mut rx = store.subscribe();

    let fetch = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_posts(true, 1).await }
    });
    rx.wait_for(|state| state.loading).await.unwrap();

    assert!(store.set_filter(FeedFilter::Popular).await);
    api.release();
    fetch.await.unwrap();

    let state = store.state();
    assert!(state.posts.is_empty());
    assert_eq!(state.pagination, Pagination::default());
    assert_eq!(state.filter, FeedFilter::Popular);
    assert!(!state.loading);
}

#[tokio::test]
async fn test_reset_fetch_rewinds_pagination_immediately() {
    let api = Arc::new(
        ScriptedFeedApi::gated()
            .page(Ok(page_of(vec![post(2, false, 0)], info(1, true, 2))))
            .page(Err(CercleError::request_failed(500, None))),
    );
    let store = Arc::new(InteractionStore::new(api.clone()));
    api.release();
    store.fetch_posts(true, 1).await;
    assert!(store.state().pagination.has_next);
    let mut rx = store.subscribe();

    let fetch = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_posts(true, 1).await }
    });
    rx.wait_for(|state| state.loading).await.unwrap();
    assert_eq!(store.state().pagination, Pagination::default());
    assert!(!store.load_more().await);

    api.release();
    fetch.await.unwrap();
    let state = store.state();
    assert_eq!(state.pagination, Pagination::default());
    assert_eq!(ids(&state), vec![2]);
    assert!(state.error.is_some());
}

#[tokio::test]
async fn test_load_more_fetches_next_page_only_when_available() {
    let api = Arc::new(
        ScriptedFeedApi::default()
            .page(Ok(page_of(vec![post(2, false, 0)], info(1, true, 2))))
            .page(Ok(page_of(vec![post(1, false, 0)], info(2, false, 2)))),
    );
    let store = InteractionStore::new(api.clone());
    store.fetch_posts(true, 1).await;

    assert!(store.load_more().await);
    assert_eq!(ids(&store.state()), vec![2, 1]);

    assert!(!store.load_more().await);
    assert_eq!(api.list_calls().len(), 2);
    assert_eq!(api.list_calls()[1], (FeedFilter::Recent, 2, 20));
}

#[tokio::test]
async fn test_fetch_uses_current_filter() {
    let api = Arc::new(ScriptedFeedApi::default());
    let store = InteractionStore::new(api.clone());

    store.set_filter(FeedFilter::Friends).await;
    store.fetch_posts(true, 1).await;

    assert_eq!(api.list_calls(), vec![(FeedFilter::Friends, 1, 20)]);
}

// ============================================================================
// create_post
// ============================================================================

#[tokio::test]
async fn test_create_post_prepends_without_dedup() {
    let (store, api) = loaded_store(ScriptedFeedApi::default(), vec![post(5, false, 0)]).await;
    api.created.lock().unwrap().push_back(Ok(post(6, false, 0)));
    api.created.lock().unwrap().push_back(Ok(post(5, false, 0)));

    let outcome = store.create_post("  Bonjour  ").await;
    assert_eq!(outcome, CreatePostOutcome::Created(post(6, false, 0)));
    assert_eq!(api.create_calls.lock().unwrap()[0], "Bonjour");

    store.create_post("again").await;
    assert_eq!(ids(&store.state()), vec![5, 6, 5]);
}

#[tokio::test]
async fn test_create_post_failure_messages() {
    let api = Arc::new(
        ScriptedFeedApi::default()
            .created(Err(CercleError::request_failed(
                422,
                Some("Le contenu est requis".to_string()),
            )))
            .created(Err(CercleError::request_failed(500, None)))
            .created(Err(CercleError::network("reset"))),
    );
    let store = InteractionStore::new(api);

    assert_eq!(
        store.create_post("").await,
        CreatePostOutcome::Failed {
            error: "Le contenu est requis".to_string()
        }
    );
    for _ in 0..2 {
        assert_eq!(
            store.create_post("x").await,
            CreatePostOutcome::Failed {
                error: CREATE_POST_ERROR.to_string()
            }
        );
    }
    let state = store.state();
    assert!(state.posts.is_empty());
    assert_eq!(state.error, None);
}

// ============================================================================
// toggle_like
// ============================================================================

#[tokio::test]
async fn test_like_commit_uses_server_values() {
    let (store, api) = loaded_store(ScriptedFeedApi::gated(), vec![post(1, false, 3)]).await;
    api.likes.lock().unwrap().push_back(Ok(LikeStatus {
        is_liked: true,
        like_count: 7,
    }));
    let mut rx = store.subscribe();

    let toggle = tokio::spawn({
        let store = store.clone();
        async move { store.toggle_like(PostId(1)).await }
    });
    rx.wait_for(|state| state.is_pending(PostId(1))).await.unwrap();

    // Optimistic values before any response.
    let optimistic = store.state();
    assert_eq!(
        optimistic.post(PostId(1)).unwrap().like_snapshot(),
        LikeSnapshot {
            liked: true,
            like_count: 4
        }
    );

    api.release();
    let outcome = toggle.await.unwrap();

    let expected = LikeSnapshot {
        liked: true,
        like_count: 7,
    };
    assert_eq!(outcome, LikeOutcome::Committed(expected));
    let state = store.state();
    assert_eq!(state.post(PostId(1)).unwrap().like_snapshot(), expected);
    assert_eq!(state.like_state(PostId(1)), LikeState::Idle);
}

#[tokio::test]
async fn test_like_while_pending_is_ignored() {
    let (store, api) = loaded_store(ScriptedFeedApi::gated(), vec![post(1, false, 0)]).await;
    api.likes.lock().unwrap().push_back(Ok(LikeStatus {
        is_liked: true,
        like_count: 1,
    }));
    let mut rx = store.subscribe();

    let toggle = tokio::spawn({
        let store = store.clone();
        async move { store.toggle_like(PostId(1)).await }
    });
    rx.wait_for(|state| state.is_pending(PostId(1))).await.unwrap();

    assert_eq!(store.toggle_like(PostId(1)).await, LikeOutcome::Ignored);
    assert_eq!(api.like_calls(), 1);

    api.release();
    toggle.await.unwrap();
    assert!(store.state().pending_likes.is_empty());
}

#[tokio::test]
async fn test_unlike_at_zero_saturates() {
    let (store, api) = loaded_store(ScriptedFeedApi::gated(), vec![post(1, true, 0)]).await;
    api.likes.lock().unwrap().push_back(Ok(LikeStatus {
        is_liked: false,
        like_count: 0,
    }));
    let mut rx = store.subscribe();

    let toggle = tokio::spawn({
        let store = store.clone();
        async move { store.toggle_like(PostId(1)).await }
    });
    rx.wait_for(|state| state.is_pending(PostId(1))).await.unwrap();

    let post = store.state().post(PostId(1)).cloned().unwrap();
    assert!(!post.is_liked_by_current_user);
    assert_eq!(post.like_count, 0);

    api.release();
    toggle.await.unwrap();
}

#[tokio::test]
async fn test_like_failure_restores_exact_values() {
    let (store, api) = loaded_store(ScriptedFeedApi::default(), vec![post(1, false, 5)]).await;
    api.likes
        .lock()
        .unwrap()
        .push_back(Err(CercleError::network("connection reset")));

    let outcome = store.toggle_like(PostId(1)).await;

    assert_eq!(outcome, LikeOutcome::RolledBack);
    let state = store.state();
    assert_eq!(state.post(PostId(1)).unwrap(), &post(1, false, 5));
    assert_eq!(state.error.as_deref(), Some(LIKE_ERROR));
    assert!(state.pending_likes.is_empty());
}

/// Runs one gated toggle, checking the optimistic values before releasing it.
async fn toggle_through(
    store: &Arc<InteractionStore>,
    api: &ScriptedFeedApi,
    optimistic: LikeSnapshot,
) -> LikeOutcome {
    let mut rx = store.subscribe();
    let toggle = tokio::spawn({
        let store = store.clone();
        async move { store.toggle_like(PostId(1)).await }
    });
    rx.wait_for(|state| state.is_pending(PostId(1))).await.unwrap();
    assert_eq!(
        store.state().post(PostId(1)).unwrap().like_snapshot(),
        optimistic
    );
    api.release();
    toggle.await.unwrap()
}

#[tokio::test]
async fn test_like_sequence_never_goes_below_zero() {
    let (store, api) = loaded_store(ScriptedFeedApi::gated(), vec![post(1, true, 0)]).await;
    {
        let mut likes = api.likes.lock().unwrap();
        likes.push_back(Err(CercleError::request_failed(500, None)));
        likes.push_back(Ok(LikeStatus {
            is_liked: false,
            like_count: 0,
        }));
        likes.push_back(Err(CercleError::network("connection reset")));
    }
    let like = |liked, like_count| LikeSnapshot { liked, like_count };
    let current = || store.state().post(PostId(1)).unwrap().like_snapshot();

    // Unlike at zero, rejected: back to the clamped starting point.
    let outcome = toggle_through(&store, &api, like(false, 0)).await;
    assert_eq!(outcome, LikeOutcome::RolledBack);
    assert_eq!(current(), like(true, 0));

    // Unlike again, accepted.
    let outcome = toggle_through(&store, &api, like(false, 0)).await;
    assert_eq!(outcome, LikeOutcome::Committed(like(false, 0)));
    assert_eq!(current(), like(false, 0));

    // Like, rejected.
    let outcome = toggle_through(&store, &api, like(true, 1)).await;
    assert_eq!(outcome, LikeOutcome::RolledBack);
    assert_eq!(current(), like(false, 0));

    let state = store.state();
    assert!(state.pending_likes.is_empty());
    assert_eq!(api.like_calls(), 3);
}

#[tokio::test]
async fn test_resolved_like_is_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let repo = Arc::new(FileFeedSnapshotRepository::with_path(
        temp_dir.path().join("feed_snapshot.json"),
    ));
    let api = Arc::new(
        ScriptedFeedApi::default()
            .page(Ok(page_of(vec![post(5, false, 3), post(6, true, 1)], None)))
            .like(Ok(LikeStatus {
                is_liked: true,
                like_count: 4,
            }))
            .like(Err(CercleError::request_failed(500, None))),
    );
    let store = InteractionStore::new(api).with_snapshot_repository(repo.clone());
    store.fetch_posts(true, 1).await;

    let outcome = store.toggle_like(PostId(5)).await;
    assert!(matches!(outcome, LikeOutcome::Committed(_)));
    let saved = repo.load().await.unwrap().unwrap();
    assert_eq!(saved.posts, store.state().posts);
    assert_eq!(saved.posts[0], post(5, true, 4));

    assert_eq!(store.toggle_like(PostId(6)).await, LikeOutcome::RolledBack);
    let saved = repo.load().await.unwrap().unwrap();
    assert_eq!(saved.posts, vec![post(5, true, 4), post(6, true, 1)]);
}

#[tokio::test]
async fn test_like_session_expired_rolls_back_silently() {
    let (store, api) = loaded_store(ScriptedFeedApi::default(), vec![post(1, true, 2)]).await;
    api.likes
        .lock()
        .unwrap()
        .push_back(Err(CercleError::SessionExpired));

    assert_eq!(store.toggle_like(PostId(1)).await, LikeOutcome::RolledBack);

    let state = store.state();
    assert_eq!(state.post(PostId(1)).unwrap(), &post(1, true, 2));
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_like_unknown_post_is_ignored() {
    let (store, api) = loaded_store(ScriptedFeedApi::default(), vec![post(1, false, 0)]).await;

    assert_eq!(store.toggle_like(PostId(42)).await, LikeOutcome::Ignored);
    assert_eq!(api.like_calls(), 0);
}

#[tokio::test]
async fn test_like_applies_to_duplicate_entries() {
    let (store, api) =
        loaded_store(ScriptedFeedApi::default(), vec![post(1, false, 1), post(1, false, 1)]).await;
    api.likes.lock().unwrap().push_back(Ok(LikeStatus {
        is_liked: true,
        like_count: 2,
    }));

    store.toggle_like(PostId(1)).await;

    assert!(
        store
            .state()
            .posts
            .iter()
            .all(|post| post.is_liked_by_current_user && post.like_count == 2)
    );
}

#[tokio::test]
async fn test_dropped_like_future_rolls_back() {
    let (store, _api) = loaded_store(ScriptedFeedApi::gated(), vec![post(1, false, 3)]).await;
    let mut rx = store.subscribe();

    let toggle = tokio::spawn({
        let store = store.clone();
        async move { store.toggle_like(PostId(1)).await }
    });
    rx.wait_for(|state| state.is_pending(PostId(1))).await.unwrap();

    toggle.abort();
    assert!(toggle.await.unwrap_err().is_cancelled());

    let state = store.state();
    assert!(state.pending_likes.is_empty());
    assert_eq!(state.post(PostId(1)).unwrap(), &post(1, false, 3));
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_cancel_all_rolls_back_pending_like() {
    let (store, _api) = loaded_store(ScriptedFeedApi::gated(), vec![post(1, true, 9)]).await;
    let mut rx = store.subscribe();

    let toggle = tokio::spawn({
        let store = store.clone();
        async move { store.toggle_like(PostId(1)).await }
    });
    rx.wait_for(|state| state.is_pending(PostId(1))).await.unwrap();

    store.cancel_all();

    assert_eq!(toggle.await.unwrap(), LikeOutcome::RolledBack);
    let state = store.state();
    assert_eq!(state.post(PostId(1)).unwrap(), &post(1, true, 9));
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_like_after_cancel_all_still_works() {
    let (store, api) = loaded_store(ScriptedFeedApi::default(), vec![post(1, false, 0)]).await;
    store.cancel_all();
    api.likes.lock().unwrap().push_back(Ok(LikeStatus {
        is_liked: true,
        like_count: 1,
    }));

    assert!(matches!(
        store.toggle_like(PostId(1)).await,
        LikeOutcome::Committed(_)
    ));
}

// ============================================================================
// set_filter / clear_feed / restore
// ============================================================================

#[tokio::test]
async fn test_set_filter_clears_collection_and_persists() {
    let temp_dir = TempDir::new().unwrap();
    let repo = Arc::new(FileFeedSnapshotRepository::with_path(
        temp_dir.path().join("feed_snapshot.json"),
    ));
    let api = Arc::new(ScriptedFeedApi::default().page(Ok(page_of(
        vec![post(1, false, 0)],
        info(1, true, 30),
    ))));
    let store = InteractionStore::new(api).with_snapshot_repository(repo.clone());
    store.fetch_posts(true, 1).await;

    assert!(!store.set_filter(FeedFilter::Recent).await);
    assert_eq!(store.state().posts.len(), 1);

    assert!(store.set_filter(FeedFilter::Friends).await);
    let state = store.state();
    assert!(state.posts.is_empty());
    assert_eq!(state.pagination, Pagination::default());
    assert_eq!(state.filter, FeedFilter::Friends);

    let saved = repo.load().await.unwrap().unwrap();
    assert_eq!(saved.filter, FeedFilter::Friends);
    assert!(saved.posts.is_empty());
    assert!(saved.saved_at.is_some());
}

#[tokio::test]
async fn test_fetch_persists_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let repo = Arc::new(FileFeedSnapshotRepository::with_path(
        temp_dir.path().join("feed_snapshot.json"),
    ));
    let api = Arc::new(ScriptedFeedApi::default().page(Ok(page_of(
        vec![post(2, false, 0), post(1, true, 1)],
        None,
    ))));
    let store = InteractionStore::new(api).with_snapshot_repository(repo.clone());

    store.fetch_posts(true, 1).await;

    let saved = repo.load().await.unwrap().unwrap();
    assert_eq!(saved.posts, vec![post(2, false, 0), post(1, true, 1)]);
}

#[tokio::test]
async fn test_clear_feed_resets_everything() {
    let temp_dir = TempDir::new().unwrap();
    let repo = Arc::new(FileFeedSnapshotRepository::with_path(
        temp_dir.path().join("feed_snapshot.json"),
    ));
    let api = Arc::new(
        ScriptedFeedApi::gated()
            .page(Ok(page_of(vec![post(1, false, 0)], info(1, true, 10))))
            .page(Ok(page_of(vec![post(2, false, 0)], info(2, true, 10)))),
    );
    let store = Arc::new(InteractionStore::new(api.clone()).with_snapshot_repository(repo.clone()));
    store.set_filter(FeedFilter::Popular).await;
    api.release();
    store.fetch_posts(true, 1).await;
    let mut rx = store.subscribe();

    let fetch = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_posts(false, 2).await }
    });
    let toggle = tokio::spawn({
        let store = store.clone();
        async move { store.toggle_like(PostId(1)).await }
    });
    rx.wait_for(|state| state.loading && state.is_pending(PostId(1)))
        .await
        .unwrap();

    store.clear_feed().await;
    fetch.await.unwrap();
    assert_eq!(toggle.await.unwrap(), LikeOutcome::RolledBack);

    let state = store.state();
    assert!(state.posts.is_empty());
    assert_eq!(state.pagination, Pagination::default());
    assert_eq!(state.filter, FeedFilter::Recent);
    assert!(state.pending_likes.is_empty());
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert!(repo.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_restore_installs_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let repo = Arc::new(FileFeedSnapshotRepository::with_path(
        temp_dir.path().join("feed_snapshot.json"),
    ));
    repo.save(&FeedSnapshot::new(
        FeedFilter::Friends,
        vec![post(3, true, 1)],
    ))
    .await
    .unwrap();

    let store = InteractionStore::new(Arc::new(ScriptedFeedApi::default()))
        .with_snapshot_repository(repo);

    assert!(store.restore().await);
    let state = store.state();
    assert_eq!(state.filter, FeedFilter::Friends);
    assert_eq!(ids(&state), vec![3]);
}

#[tokio::test]
async fn test_restore_ignores_unreadable_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("feed_snapshot.json");
    std::fs::write(&path, "not json at all").unwrap();
    let repo = Arc::new(FileFeedSnapshotRepository::with_path(path));

    let store = InteractionStore::new(Arc::new(ScriptedFeedApi::default()))
        .with_snapshot_repository(repo);

    assert!(!store.restore().await);
    assert_eq!(store.state(), FeedState::default());
}

#[tokio::test]
async fn test_restore_without_repository() {
    let store = InteractionStore::new(Arc::new(ScriptedFeedApi::default()));
    assert!(!store.restore().await);
}
