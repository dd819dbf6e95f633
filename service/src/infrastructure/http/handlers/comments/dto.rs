use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::comments::Comment;
use crate::domain::publication::NewComment;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    user: String,
    #[serde(default)]
    content: String,
}

impl From<CreateCommentRequest> for NewComment {
    fn from(value: CreateCommentRequest) -> Self {
        Self {
            user: value.user,
            content: value.content,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCommentRequest {
    #[serde(default)]
    pub content: String,
}

/// `increment` is required and must be a JSON boolean
#[derive(Debug, Clone, Deserialize)]
pub struct LikeCommentRequest {
    pub increment: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    id: u64,
    user: String,
    content: String,
    comment_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    modified_date: Option<DateTime<Utc>>,
    likes: u64,
}

impl From<Comment> for CommentResponse {
    fn from(value: Comment) -> Self {
        Self {
            id: value.id.0,
            user: value.user.into_inner(),
            content: value.content.into_inner(),
            comment_date: value.comment_date,
            modified_date: value.modified_date,
            likes: value.likes,
        }
    }
}

pub fn comments_response(comments: Vec<Comment>) -> Vec<CommentResponse> {
    comments.into_iter().map(CommentResponse::from).collect()
}
