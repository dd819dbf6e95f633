use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::error::PublicationError;

// ApiSucess is a wrapper around a response that includes a status code.

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub(crate) fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

// ApiError is a wrapper around a response that includes a status code.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl From<PublicationError> for ApiError {
    fn from(value: PublicationError) -> Self {
        match value {
            PublicationError::Validation(cause) => Self::BadRequest(cause),
            e @ PublicationError::PublicationNotFound(_) => Self::NotFound(e.to_string()),
            e @ PublicationError::CommentNotFound { .. } => Self::NotFound(e.to_string()),
            PublicationError::Storage(cause) => Self::InternalServerError(cause.to_string()),
        }
    }
}

// malformed JSON, wrong field types and a missing content type all end up here
impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use ApiError::*;

        match self {
            InternalServerError(e) => {
                tracing::error!("{}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponseBody::new_error(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )),
                )
                    .into_response()
            }
            BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponseBody::new_error(StatusCode::BAD_REQUEST, message)),
            )
                .into_response(),
            NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(ApiResponseBody::new_error(StatusCode::NOT_FOUND, message)),
            )
                .into_response(),
        }
    }
}

// Generic response structure shared by all API responses.

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    pub status_code: u16,
    pub data: T,
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

/// The response data format for all error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use publications_common::StoreError;

    use crate::domain::comments::CommentId;
    use crate::domain::publication::PublicationId;

    use super::*;

    #[test]
    fn test_publication_errors_map_to_api_errors() {
        assert_eq!(
            ApiError::from(PublicationError::Validation("title: empty".to_string())),
            ApiError::BadRequest("title: empty".to_string())
        );
        assert_eq!(
            ApiError::from(PublicationError::PublicationNotFound(PublicationId::from("p1"))),
            ApiError::NotFound("publication p1 not found".to_string())
        );
        assert!(matches!(
            ApiError::from(PublicationError::CommentNotFound {
                publication: PublicationId::from("p1"),
                comment: CommentId(2),
            }),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(PublicationError::Storage(StoreError::Backend("down".to_string()))),
            ApiError::InternalServerError(_)
        ));
    }

    #[test]
    fn test_error_body_hides_internal_details() {
        let error = ApiError::InternalServerError("connection refused".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = ApiResponseBody::new_error(StatusCode::NOT_FOUND, "gone".to_string());
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({"status_code": 404, "data": {"message": "gone"}})
        );
    }
}
