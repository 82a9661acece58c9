//! 落地页

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../../static/index.html");

/// GET /
pub async fn handle_landing() -> Html<&'static str> {
    Html(INDEX_HTML)
}
