use axum::{
    http::{header::CACHE_CONTROL, header::CONTENT_TYPE, HeaderValue},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::models::AppState;

// Embed the default stylesheet in the binary
pub const DEFAULT_STYLESHEET: &str = include_str!("../static/styles.css");

pub fn build_router(state: AppState) -> Router {
    // Always serve styles.css - use custom if provided, otherwise use embedded default
    let stylesheet_content = state.custom_css.clone().unwrap_or_else(|| DEFAULT_STYLESHEET.to_string());

    Router::new()
        .route("/", get(handlers::generator::index_get))
        .route("/generate", post(handlers::generator::generate_post))
        .route("/search", post(handlers::generator::search_post))
        .route("/subnets/add", post(handlers::generator::subnets_add_post))
        .route("/subnets/remove", post(handlers::generator::subnets_remove_post))
        .route("/import", post(handlers::generator::import_post))
        .route("/vantage/import", post(handlers::vantage::vantage_import_post))
        .route("/download", get(handlers::api::download_get))
        .route("/api/config", get(handlers::api::config_get))
        .route("/api/editor/:editor_id/draft", post(handlers::api::editor_draft_post))
        .route(
            "/static/styles.css",
            get(move || {
                let css = stylesheet_content.clone();
                async move { ([(CONTENT_TYPE, "text/css")], css) }
            }),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::if_not_present(
                    CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                )),
        )
        .with_state(state)
}
