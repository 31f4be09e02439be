//! Inbound webhook: receives the tweet, drives the pipeline, answers JSON.
//!
//! Failures are never surfaced via HTTP status: both outcomes are 200 with
//! a `{"success": "true" | "false"}` body, and any fault while handling a
//! request degrades to the failure shape instead of crashing the handler.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::trading::TradeEngine;

/// Shared handler state: the engine built once at startup.
pub struct AppState {
    pub engine: TradeEngine,
}

/// Inbound request body.
#[derive(Debug, Deserialize)]
pub struct TweetRequest {
    pub tweet: String,
}

#[derive(Debug, Serialize)]
struct TweetResponse {
    success: &'static str,
}

/// Build the webhook router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handle_tweet).options(preflight))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: Arc<AppState>, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "Webhook listening");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

/// CORS preflight: allow any origin, cache for an hour.
async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            (header::ACCESS_CONTROL_MAX_AGE, "3600"),
        ],
    )
}

async fn handle_tweet(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TweetRequest>, JsonRejection>,
) -> impl IntoResponse {
    let success = match payload {
        Ok(Json(request)) => match state.engine.process_tweet(&request.tweet).await {
            Ok(success) => success,
            Err(e) => {
                error!(error = %e, "Tweet processing failed");
                false
            }
        },
        Err(rejection) => {
            warn!(error = %rejection, "Malformed tweet request");
            false
        }
    };

    (
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(TweetResponse {
            success: if success { "true" } else { "false" },
        }),
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use rust_decimal_macros::dec;
    use tower::ServiceExt;

    use crate::api::mock::MockBroker;
    use crate::api::TickerSource;
    use crate::models::AccountSnapshot;
    use crate::trading::{PollPolicy, TradingConfig};

    use super::*;

    struct StaticTickers(HashSet<String>);

    #[async_trait::async_trait]
    impl TickerSource for StaticTickers {
        async fn reference_set(&self) -> Result<HashSet<String>> {
            Ok(self.0.clone())
        }
    }

    fn test_router(broker: MockBroker) -> Router {
        let tickers = StaticTickers(["GHSI".to_string()].into_iter().collect());
        let engine = TradeEngine::new(
            Arc::new(broker),
            Arc::new(tickers),
            TradingConfig::default(),
            PollPolicy {
                max_attempts: 3,
                delay: std::time::Duration::ZERO,
            },
        );
        router(Arc::new(AppState { engine }))
    }

    fn broker() -> MockBroker {
        let mut broker = MockBroker::new(AccountSnapshot {
            equity: dec!(100000),
            cash: dec!(1000000),
            day_trade_count: 0,
        });
        broker.prices.insert("GHSI".to_string(), dec!(50));
        broker
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_preflight_gets_cors_headers_and_204() {
        let response = test_router(broker())
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-max-age"], "3600");
    }

    #[tokio::test]
    async fn test_successful_tweet_returns_success_true() {
        let response = test_router(broker())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"tweet":"$GHSI to the moon"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
        assert_eq!(body_json(response).await["success"], "true");
    }

    #[tokio::test]
    async fn test_tickerless_tweet_returns_success_false_with_200() {
        let response = test_router(broker())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"tweet":"no tickers here"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["success"], "false");
    }

    #[tokio::test]
    async fn test_malformed_body_degrades_to_failure_shape() {
        let response = test_router(broker())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"not_a_tweet": 42}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["success"], "false");
    }
}
