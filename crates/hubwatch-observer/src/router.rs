//! Route table for the observer API.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{Method, StatusCode};
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the observer router over shared state.
///
/// The API is read-only, so CORS admits any origin for `GET` only.
/// Unknown paths answer with the same JSON error body as handler failures,
/// and requests outliving `state.request_timeout` get `408`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/hub", get(handlers::get_hub))
        .route("/api/servers", get(handlers::list_servers))
        .route("/api/servers/{id}", get(handlers::get_server))
        .route("/api/servers/{id}/history", get(handlers::get_history))
        .route("/api/servers/{id}/averages", get(handlers::get_averages));

    with_middleware(routes, state.request_timeout).with_state(state)
}

fn with_middleware(
    routes: Router<Arc<AppState>>,
    request_timeout: Duration,
) -> Router<Arc<AppState>> {
    routes
        .fallback(handlers::not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET]),
        )
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use hubwatch_core::memory::MemoryStore;
    use hubwatch_core::meta::MetaHandle;
    use hubwatch_db::StoreBackend;
    use tower::ServiceExt;

    use super::*;

    fn state(timeout: Duration) -> Arc<AppState> {
        Arc::new(
            AppState::new(StoreBackend::from(MemoryStore::new()), MetaHandle::new())
                .with_request_timeout(timeout),
        )
    }

    async fn status_of(router: Router, path: &str) -> StatusCode {
        router
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test(start_paused = true)]
    async fn slow_request_is_cut_off() {
        let state = state(Duration::from_millis(50));
        let routes = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "late"
            }),
        );
        let router = with_middleware(routes, state.request_timeout).with_state(state);

        assert_eq!(status_of(router, "/slow").await, StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn fast_request_passes_the_timeout() {
        let router = build_router(state(Duration::from_secs(5)));
        assert_eq!(status_of(router, "/health").await, StatusCode::OK);
    }
}
