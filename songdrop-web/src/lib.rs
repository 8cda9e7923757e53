//! songdrop-web library - paid song-request queue service
//!
//! Patrons submit song requests and watch the public queue; the DJ logs in
//! to an admin dashboard to reorder the queue and mark requests played or
//! skipped.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;

use songdrop_common::session::SessionStore;

pub mod api;
pub mod queue;

use queue::QueueManager;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Request queue manager (owns all queue mutations)
    pub queue: Arc<QueueManager>,
    /// Live admin sessions
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self {
            queue: Arc::new(QueueManager::new(db.clone())),
            sessions: Arc::new(SessionStore::new()),
            db,
        }
    }
}

/// Build application router
///
/// Admin API routes sit behind the session middleware; everything the
/// public pages need (including /health) is unauthenticated.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Protected routes (require an admin session)
    let protected = Router::new()
        .route("/api/admin/requests", get(api::admin::list_requests))
        .route("/api/admin/requests/:id/played", post(api::admin::mark_played))
        .route("/api/admin/requests/:id/skipped", post(api::admin::mark_skipped))
        .route("/api/admin/reorder", post(api::admin::reorder))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth::auth_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/", get(api::ui::serve_index))
        .route("/queue", get(api::ui::serve_queue_page))
        .route("/admin", get(api::ui::serve_admin_page))
        .route("/static/style.css", get(api::ui::serve_style_css))
        .route("/static/app.js", get(api::ui::serve_app_js))
        .route("/static/queue.js", get(api::ui::serve_queue_js))
        .route("/static/admin.js", get(api::ui::serve_admin_js))
        .route("/api/queue", get(api::public::get_queue))
        .route("/api/requests", post(api::public::submit_request))
        .route("/admin/login", post(api::admin::login))
        .route("/admin/logout", post(api::admin::logout))
        .merge(api::health::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .with_state(state)
}
