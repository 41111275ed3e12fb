use axum::http::StatusCode;

pub mod topics;

// health check handler
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
