use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::AppState;
use crate::domain::publication::PublicationId;
use crate::infrastructure::http::api::{ApiError, ApiSuccess};
use crate::infrastructure::http::extract::{JsonBody, PathParams};
use crate::infrastructure::http::handlers::publications::dto::{
    CreatePublicationRequest, DeletedPublicationResponse, PublicationResponse,
    UpdatePublicationRequest,
};

mod dto;

pub async fn list_publications<S: AppState>(
    State(state): State<S>,
) -> Result<ApiSuccess<Vec<PublicationResponse>>, ApiError> {
    let result = state
        .publications()
        .list_publications()
        .await?
        .into_iter()
        .map(PublicationResponse::from)
        .collect::<Vec<_>>();

    Ok(ApiSuccess::new(StatusCode::OK, result))
}

pub async fn get_publication<S: AppState>(
    PathParams(id): PathParams<String>,
    State(state): State<S>,
) -> Result<ApiSuccess<PublicationResponse>, ApiError> {
    state
        .publications()
        .get_publication(&PublicationId(id))
        .await
        .map_err(ApiError::from)
        .map(|publication| ApiSuccess::new(StatusCode::OK, publication.into()))
}

pub async fn create_publication<S: AppState>(
    State(state): State<S>,
    JsonBody(request): JsonBody<CreatePublicationRequest>,
) -> Result<ApiSuccess<PublicationResponse>, ApiError> {
    state
        .publications()
        .create_publication(request.into())
        .await
        .map_err(ApiError::from)
        .map(|publication| ApiSuccess::new(StatusCode::CREATED, publication.into()))
}

pub async fn update_publication<S: AppState>(
    PathParams(id): PathParams<String>,
    State(state): State<S>,
    JsonBody(request): JsonBody<UpdatePublicationRequest>,
) -> Result<ApiSuccess<PublicationResponse>, ApiError> {
    state
        .publications()
        .update_publication(&PublicationId(id), request.into())
        .await
        .map_err(ApiError::from)
        .map(|publication| ApiSuccess::new(StatusCode::OK, publication.into()))
}

pub async fn delete_publication<S: AppState>(
    PathParams(id): PathParams<String>,
    State(state): State<S>,
) -> Result<ApiSuccess<DeletedPublicationResponse>, ApiError> {
    state
        .publications()
        .delete_publication(&PublicationId(id))
        .await
        .map_err(ApiError::from)
        .map(|id| ApiSuccess::new(StatusCode::OK, id.into()))
}

pub async fn trending_publications<S: AppState>(
    State(state): State<S>,
) -> Result<ApiSuccess<Vec<PublicationResponse>>, ApiError> {
    let result = state
        .publications()
        .trending()
        .await?
        .into_iter()
        .map(PublicationResponse::from)
        .collect::<Vec<_>>();

    if result.is_empty() {
        Err(ApiError::NotFound("no trending publications".to_string()))
    } else {
        Ok(ApiSuccess::new(StatusCode::OK, result))
    }
}
