use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::AppState;
use crate::domain::comments::CommentId;
use crate::domain::publication::PublicationId;
use crate::infrastructure::http::api::{ApiError, ApiSuccess};
use crate::infrastructure::http::extract::{JsonBody, PathParams};
use crate::infrastructure::http::handlers::comments::dto::{
    CommentResponse, CreateCommentRequest, LikeCommentRequest, UpdateCommentRequest,
    comments_response,
};

pub(crate) mod dto;

pub async fn list_comments<S: AppState>(
    PathParams(id): PathParams<String>,
    State(state): State<S>,
) -> Result<ApiSuccess<Vec<CommentResponse>>, ApiError> {
    state
        .publications()
        .list_comments(&PublicationId(id))
        .await
        .map_err(ApiError::from)
        .map(|comments| ApiSuccess::new(StatusCode::OK, comments_response(comments)))
}

pub async fn add_comment<S: AppState>(
    PathParams(id): PathParams<String>,
    State(state): State<S>,
    JsonBody(request): JsonBody<CreateCommentRequest>,
) -> Result<ApiSuccess<CommentResponse>, ApiError> {
    state
        .publications()
        .add_comment(&PublicationId(id), request.into())
        .await
        .map_err(ApiError::from)
        .map(|comment| ApiSuccess::new(StatusCode::CREATED, comment.into()))
}

pub async fn update_comment<S: AppState>(
    PathParams((id, comment_id)): PathParams<(String, u64)>,
    State(state): State<S>,
    JsonBody(request): JsonBody<UpdateCommentRequest>,
) -> Result<ApiSuccess<CommentResponse>, ApiError> {
    state
        .publications()
        .update_comment(&PublicationId(id), CommentId(comment_id), request.content)
        .await
        .map_err(ApiError::from)
        .map(|comment| ApiSuccess::new(StatusCode::OK, comment.into()))
}

pub async fn delete_comment<S: AppState>(
    PathParams((id, comment_id)): PathParams<(String, u64)>,
    State(state): State<S>,
) -> Result<ApiSuccess<Vec<CommentResponse>>, ApiError> {
    state
        .publications()
        .delete_comment(&PublicationId(id), CommentId(comment_id))
        .await
        .map_err(ApiError::from)
        .map(|comments| ApiSuccess::new(StatusCode::OK, comments_response(comments)))
}

pub async fn like_comment<S: AppState>(
    PathParams((id, comment_id)): PathParams<(String, u64)>,
    State(state): State<S>,
    JsonBody(request): JsonBody<LikeCommentRequest>,
) -> Result<ApiSuccess<Vec<CommentResponse>>, ApiError> {
    state
        .publications()
        .set_comment_like(&PublicationId(id), CommentId(comment_id), request.increment)
        .await
        .map_err(ApiError::from)
        .map(|comments| ApiSuccess::new(StatusCode::OK, comments_response(comments)))
}
