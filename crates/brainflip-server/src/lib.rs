pub mod api;
pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod state;

use axum::Router;
use axum::handler::HandlerWithoutStateExt;
use axum::http::{HeaderValue, header};
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use config::ServerConfig;
use state::AppState;

/// Build the Axum router and application state from a config.
pub fn build_app(config: ServerConfig) -> (Router<()>, AppState) {
    let web_root = config.web_root.clone();
    let state = AppState::new(config);

    // Unsupported methods fall through to the JSON 404 rather than a 405.
    let api_routes = Router::new()
        .route(
            "/scores",
            get(api::list_scores)
                .post(api::submit_score)
                .fallback(middleware::not_found),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    // Static game assets; `/` resolves to index.html.
    let static_files = ServeDir::new(&web_root)
        .call_fallback_on_method_not_allowed(true)
        .fallback(middleware::not_found.into_service());

    let app = Router::new()
        .route(
            "/health",
            get(health::health_check).fallback(middleware::not_found),
        )
        .nest("/api", api_routes)
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::log_requests))
                .layer(axum::middleware::from_fn(middleware::report_errors))
                .layer(CatchPanicLayer::custom(middleware::handle_panic)),
        )
        .with_state(state.clone());

    (app, state)
}
