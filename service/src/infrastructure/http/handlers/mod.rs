use axum::http::StatusCode;

pub mod comments;
pub mod publications;

// health check handler
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
