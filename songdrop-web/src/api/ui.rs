//! UI serving routes
//!
//! Serves the embedded HTML/JS pages: request submission, public queue
//! display, and the admin dashboard.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

const INDEX_HTML: &str = include_str!("../ui/index.html");
const QUEUE_HTML: &str = include_str!("../ui/queue.html");
const ADMIN_HTML: &str = include_str!("../ui/admin.html");
const STYLE_CSS: &str = include_str!("../ui/style.css");
const APP_JS: &str = include_str!("../ui/app.js");
const QUEUE_JS: &str = include_str!("../ui/queue.js");
const ADMIN_JS: &str = include_str!("../ui/admin.js");

/// GET / - request submission page
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /queue - public queue display
pub async fn serve_queue_page() -> Html<&'static str> {
    Html(QUEUE_HTML)
}

/// GET /admin - admin dashboard (its API calls carry the session)
pub async fn serve_admin_page() -> Html<&'static str> {
    Html(ADMIN_HTML)
}

/// GET /static/style.css
pub async fn serve_style_css() -> Response {
    (StatusCode::OK, [("content-type", "text/css")], STYLE_CSS).into_response()
}

/// GET /static/app.js
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript")],
        APP_JS,
    )
        .into_response()
}

/// GET /static/queue.js
pub async fn serve_queue_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript")],
        QUEUE_JS,
    )
        .into_response()
}

/// GET /static/admin.js
pub async fn serve_admin_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript")],
        ADMIN_JS,
    )
        .into_response()
}
