use std::fmt::Display;

use publications_common::StoreError;
use thiserror::Error;

use crate::domain::comments::CommentId;
use crate::domain::publication::PublicationId;

#[derive(Debug, Error)]
pub enum PublicationError {
    #[error("{0}")]
    Validation(String),
    #[error("publication {0} not found")]
    PublicationNotFound(PublicationId),
    #[error("comment {comment} not found in publication {publication}")]
    CommentNotFound {
        publication: PublicationId,
        comment: CommentId,
    },
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Runs a nutype constructor, reporting its failure against the input field name
pub(crate) fn validate<T, E: Display>(
    field: &str,
    result: Result<T, E>,
) -> Result<T, PublicationError> {
    result.map_err(|e| PublicationError::Validation(format!("{field}: {e}")))
}

#[cfg(test)]
mod tests {
    use crate::domain::publication::Title;

    use super::*;

    #[test]
    fn test_validation_message_names_the_field() {
        let error = validate("title", Title::try_new(" ")).unwrap_err();
        match error {
            PublicationError::Validation(message) => assert!(message.starts_with("title: ")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_not_found_messages() {
        let error = PublicationError::CommentNotFound {
            publication: PublicationId::from("p1"),
            comment: CommentId(3),
        };
        assert_eq!(error.to_string(), "comment 3 not found in publication p1");
        assert_eq!(
            PublicationError::PublicationNotFound(PublicationId::from("p1")).to_string(),
            "publication p1 not found"
        );
    }
}
