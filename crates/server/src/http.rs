//! HTTP Endpoints
//!
//! Webhook ingress from the chat gateway plus operational endpoints.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use balcao_core::InboundMessage;

use crate::metrics::metrics_handler;
use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Gateway webhook
        .route("/webhook/message", post(receive_message))
        // Health check
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Inbound chat event from the gateway.
///
/// The gateway retries deliveries that do not get a 2xx quickly, so the
/// message is handed to the engine in a background task and this handler
/// acknowledges immediately. Processing failures are logged and dropped
/// inside the engine, never reported back to the gateway.
async fn receive_message(
    State(state): State<AppState>,
    Json(message): Json<InboundMessage>,
) -> StatusCode {
    let attendant = state.attendant.clone();
    tokio::spawn(async move {
        attendant.handle_message(message).await;
    });
    StatusCode::ACCEPTED
}

/// Health check over the resources loaded at startup.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let mut checks = serde_json::Map::new();
    let mut all_healthy = true;

    // Check 1: catalog loaded with at least one product
    let product_count = state.catalog.product_count();
    checks.insert(
        "catalog".to_string(),
        serde_json::json!({
            "status": if product_count > 0 { "ok" } else { "empty" },
            "products": product_count
        }),
    );
    if product_count == 0 {
        all_healthy = false;
    }

    // Check 2: session store answers reads
    let store_status = match state.sessions.get("health@probe").await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::error!(error = %e, "session store health probe failed");
            all_healthy = false;
            "error"
        },
    };
    checks.insert(
        "store".to_string(),
        serde_json::json!({ "status": store_status }),
    );

    let status = if all_healthy { "healthy" } else { "degraded" };
    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": status,
            "version": env!("CARGO_PKG_VERSION"),
            "checks": checks
        })),
    )
}

/// Readiness check with gateway connectivity.
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let gateway_url = format!(
        "{}/api/status",
        state.settings.gateway.base_url.trim_end_matches('/')
    );

    let mut checks = serde_json::Map::new();
    let mut ready = true;

    let gateway_status = match tokio::time::timeout(
        std::time::Duration::from_secs(2),
        reqwest::get(&gateway_url),
    )
    .await
    {
        Ok(Ok(resp)) if resp.status().is_success() => "ok",
        Ok(Ok(_)) => {
            ready = false;
            "error"
        },
        Ok(Err(_)) => {
            ready = false;
            "unreachable"
        },
        Err(_) => {
            ready = false;
            "timeout"
        },
    };

    checks.insert(
        "gateway".to_string(),
        serde_json::json!({
            "status": gateway_status,
            "url": gateway_url
        }),
    );

    let status = if ready { "ready" } else { "not_ready" };
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": status,
            "checks": checks
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use balcao_catalog::CatalogIndex;
    use balcao_config::Settings;
    use balcao_core::{Category, ChatTransport, Product, Stage, TransportError};
    use balcao_engine::{Attendant, AttendantOptions};

    const USER: &str = "5511999990000@c.us";

    struct NullTransport;

    #[async_trait::async_trait]
    impl ChatTransport for NullTransport {
        async fn send_text(&self, _to: &str, _body: &str) -> Result<(), TransportError> {
            Ok(())
        }

        async fn send_document(&self, _to: &str, _reference: &str) -> Result<(), TransportError> {
            Ok(())
        }

        async fn send_typing(&self, _to: &str) -> Result<(), TransportError> {
            Ok(())
        }
    }

    fn sample_catalog() -> CatalogIndex {
        CatalogIndex::new(vec![Category {
            title: "Linha Refrigeração".to_string(),
            sub: "Conservação e exposição".to_string(),
            products: vec![Product {
                name: "Geladeira Expositora 410L".to_string(),
                description: "Expositor vertical para bebidas".to_string(),
                tech_specs: vec!["220V".to_string()],
            }],
        }])
    }

    fn test_state(settings: Settings) -> AppState {
        let stores = balcao_persistence::open_in_memory().unwrap();
        let sessions = stores.sessions.clone();
        let catalog = Arc::new(sample_catalog());
        let attendant = Arc::new(Attendant::new(
            catalog.clone(),
            stores,
            Arc::new(NullTransport),
            AttendantOptions::default(),
        ));
        AppState::new(Arc::new(settings), attendant, catalog, sessions)
    }

    #[tokio::test]
    async fn test_router_creation() {
        let _ = create_router(test_state(Settings::default()));
    }

    /// Test that the health check reports healthy with a loaded catalog
    /// and a responsive store.
    #[tokio::test]
    async fn test_health_check_reports_healthy() {
        let (status, Json(body)) = health_check(State(test_state(Settings::default()))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["checks"]["catalog"]["status"], "ok");
        assert_eq!(body["checks"]["store"]["status"], "ok");
    }

    /// Test that an empty catalog degrades the health check.
    #[tokio::test]
    async fn test_health_check_degraded_on_empty_catalog() {
        let stores = balcao_persistence::open_in_memory().unwrap();
        let sessions = stores.sessions.clone();
        let catalog = Arc::new(CatalogIndex::new(Vec::new()));
        let attendant = Arc::new(Attendant::new(
            catalog.clone(),
            stores,
            Arc::new(NullTransport),
            AttendantOptions::default(),
        ));
        let state = AppState::new(
            Arc::new(Settings::default()),
            attendant,
            catalog,
            sessions,
        );

        let (status, Json(body)) = health_check(State(state)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["checks"]["catalog"]["status"], "empty");
    }

    /// Test that readiness reports an unreachable gateway. Port 9
    /// (discard) refuses connections without touching the network.
    #[tokio::test]
    async fn test_readiness_reports_unreachable_gateway() {
        let mut settings = Settings::default();
        settings.gateway.base_url = "http://127.0.0.1:9".to_string();

        let (status, Json(body)) = readiness_check(State(test_state(settings))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "not_ready");
        assert_eq!(body["checks"]["gateway"]["status"], "unreachable");
    }

    /// Test that the webhook acknowledges immediately and the engine
    /// picks the message up in the background.
    #[tokio::test]
    async fn test_webhook_accepts_and_processes_in_background() {
        let state = test_state(Settings::default());
        let sessions = state.sessions.clone();

        let status =
            receive_message(State(state), Json(InboundMessage::chat(USER, "oi"))).await;
        assert_eq!(status, StatusCode::ACCEPTED);

        // Processing happens in a spawned task; give it a moment.
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let session = sessions.get(USER).await.unwrap().unwrap();
        assert_eq!(session.stage, Stage::NameCapture);
    }
}
