use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
}

/// Axum handler for `GET /ping`.
pub async fn ping_handler() -> axum::Json<PingResponse> {
    axum::Json(PingResponse {
        message: "pong".to_string(),
    })
}
