use crate::transport::http::ApiResponse;
use crate::transport::proxy::types::{translate_params, ProxyState};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

/// `GET /api/products` — forwards to the query service and relays its answer unchanged.
pub async fn products_handler(
    State(state): State<ProxyState>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> impl IntoResponse {
    let Query(params) = match params {
        Ok(p) => p,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure(format!("Malformed query string: {}", e.body_text()), None)),
            )
                .into_response();
        }
    };
    let forward = translate_params(params);

    let upstream = match state.client.get(&state.paged_url).query(&forward).send().await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!(error = %e, url = %state.paged_url, "upstream request failed");
            return upstream_unreachable().into_response();
        }
    };

    let status = upstream.status();
    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    match upstream.bytes().await {
        Ok(body) => {
            tracing::debug!(status = status.as_u16(), bytes = body.len(), "relayed product page");
            (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "upstream body could not be read");
            upstream_unreachable().into_response()
        }
    }
}

fn upstream_unreachable() -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::BAD_GATEWAY,
        Json(ApiResponse::failure("Product service unreachable", None)),
    )
}
