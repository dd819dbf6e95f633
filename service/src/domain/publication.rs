use std::fmt;

use chrono::{DateTime, Utc};
use nutype::nutype;
use serde::{Deserialize, Serialize};

use crate::domain::comments::{Comment, CommentContent, CommentId, Comments, UserName};

// Document body field names written by partial updates

pub const TITLE_FIELD_NAME: &str = "title";
pub const CONTENT_FIELD_NAME: &str = "content";
pub const COMMENTS_FIELD_NAME: &str = "comments";
pub const LAST_COMMENT_ID_FIELD_NAME: &str = "lastCommentId";

/// Wrapper to prevent ID confusion, the value is assigned by the document store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicationId(pub String);

impl From<String> for PublicationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PublicationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for PublicationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text is stored as submitted; it only has to contain something besides whitespace.
pub(crate) fn is_not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

#[nutype(
    validate(predicate = is_not_blank),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, Serialize, Deserialize)
)]
pub struct Author(String);

#[nutype(
    validate(predicate = is_not_blank),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, Serialize, Deserialize)
)]
pub struct Title(String);

#[nutype(
    validate(predicate = is_not_blank),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, Serialize, Deserialize)
)]
pub struct Content(String);

/// A publication as stored: everything but the id, which is the document key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationBody {
    pub author: Author,
    pub title: Title,
    pub content: Content,
    /// Immutable after creation
    pub date_pub: DateTime<Utc>,
    /// Managed outside of this service, only read and sorted on
    #[serde(default)]
    pub popularity: u64,
    #[serde(default)]
    pub comments: Comments,
    /// Highest comment id ever assigned, kept so deleted ids are not handed out again
    #[serde(default)]
    pub last_comment_id: CommentId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    pub id: PublicationId,
    pub body: PublicationBody,
}

impl PublicationBody {
    pub fn new(author: Author, title: Title, content: Content, date_pub: DateTime<Utc>) -> Self {
        Self {
            author,
            title,
            content,
            date_pub,
            popularity: 0,
            comments: Comments::default(),
            last_comment_id: CommentId::default(),
        }
    }

    /// `None` when the publication has run out of comment ids
    pub fn add_comment(
        &mut self,
        user: UserName,
        content: CommentContent,
        now: DateTime<Utc>,
    ) -> Option<Comment> {
        let comment = self
            .comments
            .add(self.last_comment_id, user, content, now)?;
        self.last_comment_id = comment.id;
        Some(comment)
    }
}

/// Unvalidated input of `create_publication`
#[derive(Debug, Clone, Default)]
pub struct NewPublication {
    pub author: String,
    pub title: String,
    pub content: String,
}

/// Unvalidated input of `update_publication`
#[derive(Debug, Clone, Default)]
pub struct PublicationChanges {
    pub title: String,
    pub content: String,
}

/// Unvalidated input of `add_comment`
#[derive(Debug, Clone, Default)]
pub struct NewComment {
    pub user: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_text_fields_reject_blank_values() {
        assert!(Author::try_new("").is_err());
        assert!(Title::try_new("   ").is_err());
        assert!(Content::try_new("\n\t").is_err());
    }

    #[test]
    fn test_text_fields_keep_surrounding_whitespace() {
        let content = Content::try_new("  x\n").unwrap();
        assert_eq!(content.as_ref(), "  x\n");

        let value = serde_json::to_value(&content).unwrap();
        let restored: Content = serde_json::from_value(value).unwrap();
        assert_eq!(restored, content);
    }

    #[test]
    fn test_body_uses_camel_case_keys() {
        let date_pub = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let body = PublicationBody::new(
            Author::try_new("ana").unwrap(),
            Title::try_new("first").unwrap(),
            Content::try_new("hello").unwrap(),
            date_pub,
        );

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "author": "ana",
                "title": "first",
                "content": "hello",
                "datePub": "2025-03-01T10:00:00Z",
                "popularity": 0,
                "comments": [],
                "lastCommentId": 0
            })
        );
    }

    #[test]
    fn test_body_defaults_missing_popularity_and_comments() {
        let body: PublicationBody = serde_json::from_value(json!({
            "author": "ana",
            "title": "first",
            "content": "hello",
            "datePub": "2025-03-01T10:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(body.popularity, 0);
        assert!(body.comments.is_empty());
        assert_eq!(body.last_comment_id, CommentId(0));
    }

    #[test]
    fn test_add_comment_tracks_last_assigned_id() {
        let date_pub = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let mut body = PublicationBody::new(
            Author::try_new("ana").unwrap(),
            Title::try_new("first").unwrap(),
            Content::try_new("hello").unwrap(),
            date_pub,
        );
        let user = || UserName::try_new("bob").unwrap();
        let text = || CommentContent::try_new("nice").unwrap();

        let first = body.add_comment(user(), text(), date_pub).unwrap();
        assert_eq!(first.id, CommentId(1));
        assert!(body.comments.remove(first.id));

        let second = body.add_comment(user(), text(), date_pub).unwrap();
        assert_eq!(second.id, CommentId(2));
        assert_eq!(body.last_comment_id, CommentId(2));
    }
}
