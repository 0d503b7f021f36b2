use crate::db::Stores;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use std::time::Instant;

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
struct HealthResponse {
    status: ComponentStatus,
    service: &'static str,
    version: &'static str,
    store_latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    timestamp: String,
}

/// Readiness: the backing store must answer.
pub async fn health_summary(stores: web::Data<Stores>) -> HttpResponse {
    let start = Instant::now();
    let result = stores.posts.health_check().await;
    let store_latency_ms = start.elapsed().as_millis() as u64;

    let (status, error) = match result {
        Ok(()) => (ComponentStatus::Healthy, None),
        Err(e) => {
            tracing::warn!(error = %e, "store health check failed");
            (ComponentStatus::Unhealthy, Some("Store unavailable".to_string()))
        }
    };

    let healthy = error.is_none();
    let body = HealthResponse {
        status,
        service: "api-service",
        version: env!("CARGO_PKG_VERSION"),
        store_latency_ms,
        error,
        timestamp: Utc::now().to_rfc3339(),
    };

    if healthy {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}
