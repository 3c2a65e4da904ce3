use axum::body::Body;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::api::extract::Query;
use crate::db::query::non_blank;
use crate::error::AppError;

/// Sent upstream when the caller did not provide a `User-Agent`.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Many image hosts refuse hotlinking unless the request looks like it came
/// from a search engine.
pub const SPOOFED_REFERER: &str = "https://www.google.com";

/// Content type returned when the upstream response has none.
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug, Deserialize)]
pub struct ProxyParams {
    #[serde(default)]
    pub url: Option<String>,
}

/// Axum handler for `GET /api/proxy?url=…`.
///
/// Fetches the remote resource and streams its body back with the upstream
/// content type. No caching, retry or size limit.
pub async fn proxy_image_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    headers: HeaderMap,
    Query(params): Query<ProxyParams>,
) -> Result<Response, AppError> {
    let url = non_blank(params.url.as_deref())
        .ok_or_else(|| AppError::BadRequest("Missing url query parameter".into()))?;

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_USER_AGENT);

    let upstream = state
        .http_client
        .get(url)
        .header(header::USER_AGENT, user_agent)
        .header(header::REFERER, SPOOFED_REFERER)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| AppError::Upstream(format!("Image load failed: {e}")))?;

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();

    tracing::debug!("Proxying {} ({})", url, content_type);

    Ok((
        [(header::CONTENT_TYPE, content_type)],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response())
}
