//! Inbound webhook server
//!
//! A small axum app with two routes: `POST /webhook` for deliveries and
//! `GET /health`. On startup the subscription is reconciled (adopt or
//! create); on shutdown it is deregistered best-effort. Verification pings
//! are answered with the canned acknowledgment and never emitted; real
//! events are printed to stdout as JSON lines for the host to consume.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::error::Result;
use crate::transport::ApiClient;
use crate::types::JsonValue;
use crate::webhook::{classify, ping_acknowledgment, Delivery, SubscriptionStore,
    TriggerSettings, WebhookLifecycle};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Reconcile the subscription on startup
    pub register: bool,
}

/// App state shared across handlers
#[derive(Clone)]
struct AppState {
    lifecycle: Arc<WebhookLifecycle>,
}

/// Build the router; separated from [`serve`] so tests can drive it
/// without binding a socket.
fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook", post(receive_delivery))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the trigger: reconcile the subscription, serve deliveries, and
/// deregister on shutdown.
pub async fn serve(
    client: ApiClient,
    store: SubscriptionStore,
    settings: TriggerSettings,
    config: ServerConfig,
) -> Result<()> {
    let lifecycle = Arc::new(WebhookLifecycle::new(client, store));

    if config.register {
        if lifecycle.check_exists(&settings).await? {
            info!("webhook subscription already registered");
        } else {
            let webhook_id = lifecycle.create(&settings).await?;
            info!(%webhook_id, "webhook subscription created");
        }
    }

    let state = AppState {
        lifecycle: Arc::clone(&lifecycle),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "webhook server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Best-effort teardown; remote failures are logged inside delete().
    lifecycle.delete().await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown requested");
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let registered = state.lifecycle.store().webhook_id().await.is_some();
    Json(json!({"status": "ok", "registered": registered}))
}

async fn receive_delivery(headers: HeaderMap, Json(body): Json<JsonValue>) -> impl IntoResponse {
    // The signature header is observed but not verified; deliveries are
    // accepted as-is.
    if let Some(signature) = headers.get("x-samsara-signature") {
        debug!(?signature, "delivery carried a signature header");
    }

    match classify(&body) {
        Delivery::VerificationPing => (StatusCode::OK, Json(ping_acknowledgment())),
        Delivery::Event(event) => {
            // One JSON line per event on stdout; the host consumes these.
            println!("{event}");
            (StatusCode::OK, Json(json!({"received": true})))
        }
    }
}
