use crate::transport::http::ApiResponse;
use crate::transport::proxy::types::ProxyState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// Proxy liveness plus the upstream's own health verdict.
pub async fn healthcheck_handler(State(state): State<ProxyState>) -> impl IntoResponse {
    let upstream = match state.client.get(&state.health_url).send().await {
        Ok(resp) if resp.status().is_success() => "ok",
        Ok(_) => "unhealthy",
        Err(_) => "unreachable",
    };

    let body = serde_json::json!({ "status": "ok", "upstream": upstream });
    if upstream == "ok" {
        (StatusCode::OK, Json(ApiResponse::ok(body))).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::failure("Upstream product service is not healthy", Some(body))),
        )
            .into_response()
    }
}
