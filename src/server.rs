//! HTTP read endpoint serving the aggregated report history.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::{json, Map, Value};
use tracing::{error, info};

use crate::aggregator::aggregate;
use crate::store::{BlobStore, Consistency};

/// Shared state for the HTTP layer: the store every request reads from.
pub struct AppState {
    pub store: Arc<dyn BlobStore>,
}

/// Builds the router exposing `GET /analytics`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/analytics", get(analytics_handler))
        .with_state(state)
}

/// Binds `addr` and serves the analytics router until the process exits.
pub async fn serve(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr, "Analytics endpoint listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Runs the full fan-out on each request and returns the
/// `{ store, results }` envelope; no caching, every GET reads the store.
async fn analytics_handler(State(state): State<Arc<AppState>>) -> Response {
    match aggregate(state.store.clone(), Consistency::Eventual).await {
        Ok(entries) => {
            let mut results = Map::new();
            for entry in entries {
                let value = match entry.report {
                    Some(report) => serde_json::to_value(report).unwrap_or(Value::Null),
                    None => Value::Null,
                };
                results.insert(entry.timestamp, value);
            }

            let body = json!({
                "store": state.store.name(),
                "results": results,
            });
            pretty_json(StatusCode::OK, &body)
        }
        Err(e) => {
            error!(error = %e, "Aggregation failed");
            pretty_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({ "error": e.to_string() }),
            )
        }
    }
}

/// Pretty-prints `body` with the content-type and no-store cache headers the
/// dashboard expects.
fn pretty_json(status: StatusCode, body: &Value) -> Response {
    let text = serde_json::to_string_pretty(body).unwrap_or_else(|_| "{}".to_string());
    (
        status,
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        text,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocalStore;
    use serde_json::json;
    use std::env;
    use std::fs;

    fn temp_state(name: &str) -> (Arc<AppState>, std::path::PathBuf) {
        let root = env::temp_dir().join(format!("site_analytics_server_{name}"));
        let _ = fs::remove_dir_all(&root);
        let state = Arc::new(AppState {
            store: Arc::new(LocalStore::new(&root)),
        });
        (state, root)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_pretty_json_sets_headers() {
        let response = pretty_json(StatusCode::OK, &json!({ "ok": true }));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
    }

    #[tokio::test]
    async fn test_handler_envelope_on_empty_store() {
        let (state, _root) = temp_state("empty");

        let response = analytics_handler(State(state.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["store"], json!(state.store.name()));
        assert_eq!(body["results"], json!({}));
    }

    #[tokio::test]
    async fn test_handler_returns_stored_partitions() {
        let (state, root) = temp_state("stored");
        state
            .store
            .put_json(
                "2026-08-07T12:00:00.000Z/analytics.json",
                &json!({ "time": "2026-08-07T12:00:00.000Z", "lighthouseReports": [] }),
            )
            .await
            .unwrap();

        let response = analytics_handler(State(state)).await;
        let body = body_json(response).await;

        let results = body["results"].as_object().unwrap();
        assert_eq!(results.len(), 1);
        assert!(results["2026-08-07T12:00:00.000Z"].is_object());

        fs::remove_dir_all(root).unwrap();
    }
}
