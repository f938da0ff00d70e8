use actix_web::{web, HttpResponse};

use crate::state::{AppState, Stores};

fn reachability(up: bool) -> &'static str {
    if up {
        "up"
    } else {
        "down"
    }
}

/// Handler for GET /health
///
/// 200 while MySQL answers, 503 otherwise. Redis being down only degrades
/// the status since logins fall back to the durable counter.
pub async fn health_check<S: Stores>(state: web::Data<AppState<S>>) -> HttpResponse {
    let mysql_up = state.health.database().await;
    let redis = state.health.cache().await;

    let status = match (mysql_up, redis) {
        (false, _) => "unhealthy",
        (true, Some(false)) => "degraded",
        _ => "healthy",
    };
    let body = serde_json::json!({
        "status": status,
        "service": "session-guard-api",
        "version": env!("CARGO_PKG_VERSION"),
        "mysql": reachability(mysql_up),
        "redis": redis.map(reachability).unwrap_or("disabled"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if mysql_up {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
