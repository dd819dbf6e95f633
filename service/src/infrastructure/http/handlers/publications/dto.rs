use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::publication::{NewPublication, Publication, PublicationChanges, PublicationId};
use crate::infrastructure::http::handlers::comments::dto::CommentResponse;

/// Body of the create publication route. Missing fields are reported by validation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePublicationRequest {
    #[serde(default)]
    author: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

impl From<CreatePublicationRequest> for NewPublication {
    fn from(value: CreatePublicationRequest) -> Self {
        Self {
            author: value.author,
            title: value.title,
            content: value.content,
        }
    }
}

/// Body of the update publication route
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePublicationRequest {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

impl From<UpdatePublicationRequest> for PublicationChanges {
    fn from(value: UpdatePublicationRequest) -> Self {
        Self {
            title: value.title,
            content: value.content,
        }
    }
}

/// Publication with its id merged in
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationResponse {
    id: String,
    author: String,
    title: String,
    content: String,
    date_pub: DateTime<Utc>,
    popularity: u64,
    comments: Vec<CommentResponse>,
}

impl From<Publication> for PublicationResponse {
    fn from(value: Publication) -> Self {
        let body = value.body;
        Self {
            id: value.id.0,
            author: body.author.into_inner(),
            title: body.title.into_inner(),
            content: body.content.into_inner(),
            date_pub: body.date_pub,
            popularity: body.popularity,
            comments: body
                .comments
                .into_vec()
                .into_iter()
                .map(CommentResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedPublicationResponse {
    id: String,
}

impl From<PublicationId> for DeletedPublicationResponse {
    fn from(value: PublicationId) -> Self {
        Self { id: value.0 }
    }
}
