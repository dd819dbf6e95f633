use anyhow::Context;
use chrono::Utc;
use publications_common::{
    CollectionName, DocumentBody, DocumentStore, FieldName, OrderBy, POPULARITY_FIELD_NAME,
    PUBLICATIONS_COLLECTION, StoreError, StoredDocument,
};
use serde::Serialize;
use serde_json::Value;

use crate::domain::comments::{Comment, CommentContent, CommentId, UserName};
use crate::domain::error::{PublicationError, validate};
use crate::domain::publication::{
    Author, COMMENTS_FIELD_NAME, CONTENT_FIELD_NAME, Content, LAST_COMMENT_ID_FIELD_NAME,
    NewComment, NewPublication, Publication, PublicationBody, PublicationChanges, PublicationId,
    TITLE_FIELD_NAME, Title,
};

/// Number of publications returned by `trending`
pub const TRENDING_LIMIT: usize = 5;

/// Publications and their embedded comments on top of a document store.
///
/// Every operation validates its input before touching the store, checks that the
/// publication exists, and then does at most one write. Comment mutations rewrite the
/// whole comment sequence of the publication; two concurrent mutations on the same
/// publication can overwrite each other.
#[derive(Clone, Debug)]
pub struct PublicationStore<D: DocumentStore> {
    store: D,
    collection: CollectionName,
    popularity: FieldName,
}

impl<D: DocumentStore> PublicationStore<D> {
    pub fn new(store: D) -> anyhow::Result<Self> {
        let collection = CollectionName::try_new(PUBLICATIONS_COLLECTION)
            .with_context(|| format!("invalid collection name {}", PUBLICATIONS_COLLECTION))?;
        let popularity = FieldName::try_new(POPULARITY_FIELD_NAME)
            .with_context(|| format!("invalid field name {}", POPULARITY_FIELD_NAME))?;
        Ok(Self {
            store,
            collection,
            popularity,
        })
    }

    /// Documents that cannot be read as publications are logged and left out
    pub async fn list_publications(&self) -> Result<Vec<Publication>, PublicationError> {
        let documents = self.store.list(&self.collection).await?;
        tracing::debug!("loaded {} publications", documents.len());
        Ok(decode_readable(documents))
    }

    pub async fn get_publication(
        &self,
        id: &PublicationId,
    ) -> Result<Publication, PublicationError> {
        self.store
            .get(&self.collection, id.as_ref())
            .await?
            .map(decode)
            .unwrap_or_else(|| Err(PublicationError::PublicationNotFound(id.clone())))
    }

    pub async fn create_publication(
        &self,
        input: NewPublication,
    ) -> Result<Publication, PublicationError> {
        let author = validate("author", Author::try_new(input.author))?;
        let title = validate("title", Title::try_new(input.title))?;
        let content = validate("content", Content::try_new(input.content))?;

        let body = PublicationBody::new(author, title, content, Utc::now());
        let id = self
            .store
            .add(&self.collection, encode("new publication", &body)?)
            .await?;
        tracing::info!("publication {} created", id);

        Ok(Publication {
            id: PublicationId(id),
            body,
        })
    }

    /// Replaces title and content, every other field is kept as stored
    pub async fn update_publication(
        &self,
        id: &PublicationId,
        changes: PublicationChanges,
    ) -> Result<Publication, PublicationError> {
        let title = validate("title", Title::try_new(changes.title))?;
        let content = validate("content", Content::try_new(changes.content))?;

        let mut publication = self.get_publication(id).await?;
        let mut partial = DocumentBody::new();
        partial.insert(TITLE_FIELD_NAME.to_string(), to_value(id, &title)?);
        partial.insert(CONTENT_FIELD_NAME.to_string(), to_value(id, &content)?);
        self.store
            .update(&self.collection, id.as_ref(), partial)
            .await?;
        tracing::info!("publication {} updated", id);

        publication.body.title = title;
        publication.body.content = content;
        Ok(publication)
    }

    /// Returns the id of the deleted publication
    pub async fn delete_publication(
        &self,
        id: &PublicationId,
    ) -> Result<PublicationId, PublicationError> {
        self.get_publication(id).await?;
        self.store.delete(&self.collection, id.as_ref()).await?;
        tracing::info!("publication {} deleted", id);
        Ok(id.clone())
    }

    pub async fn list_comments(
        &self,
        id: &PublicationId,
    ) -> Result<Vec<Comment>, PublicationError> {
        let publication = self.get_publication(id).await?;
        Ok(publication.body.comments.into_vec())
    }

    pub async fn add_comment(
        &self,
        id: &PublicationId,
        input: NewComment,
    ) -> Result<Comment, PublicationError> {
        let user = validate("user", UserName::try_new(input.user))?;
        let content = validate("content", CommentContent::try_new(input.content))?;

        let mut publication = self.get_publication(id).await?;
        let comment = publication
            .body
            .add_comment(user, content, Utc::now())
            .ok_or_else(|| malformed(id.as_ref(), "comment ids are exhausted".to_string()))?;
        self.write_comments(&publication).await?;
        tracing::info!("comment {} added to publication {}", comment.id, id);

        Ok(comment)
    }

    /// Replaces the content of a comment and stamps its modification date
    pub async fn update_comment(
        &self,
        id: &PublicationId,
        comment_id: CommentId,
        content: String,
    ) -> Result<Comment, PublicationError> {
        let content = validate("content", CommentContent::try_new(content))?;

        let mut publication = self.get_publication(id).await?;
        let comment = publication
            .body
            .comments
            .edit(comment_id, content, Utc::now())
            .ok_or_else(|| comment_not_found(id, comment_id))?;
        self.write_comments(&publication).await?;
        tracing::info!("comment {} of publication {} updated", comment_id, id);

        Ok(comment)
    }

    /// Returns the comments left after the removal
    pub async fn delete_comment(
        &self,
        id: &PublicationId,
        comment_id: CommentId,
    ) -> Result<Vec<Comment>, PublicationError> {
        let mut publication = self.get_publication(id).await?;
        if !publication.body.comments.remove(comment_id) {
            return Err(comment_not_found(id, comment_id));
        }
        self.write_comments(&publication).await?;
        tracing::info!("comment {} of publication {} deleted", comment_id, id);

        Ok(publication.body.comments.into_vec())
    }

    /// Adds one like when `increment` is true, withdraws one otherwise.
    /// Returns the whole comment sequence of the publication.
    pub async fn set_comment_like(
        &self,
        id: &PublicationId,
        comment_id: CommentId,
        increment: bool,
    ) -> Result<Vec<Comment>, PublicationError> {
        let mut publication = self.get_publication(id).await?;
        if !publication.body.comments.set_like(comment_id, increment) {
            return Err(comment_not_found(id, comment_id));
        }
        self.write_comments(&publication).await?;
        tracing::debug!(
            "comment {} of publication {} like set, increment: {}",
            comment_id,
            id,
            increment
        );

        Ok(publication.body.comments.into_vec())
    }

    /// Most popular publications first, at most `TRENDING_LIMIT` of them.
    /// Publications with equal popularity come in the store's natural order,
    /// unreadable documents are skipped like in `list_publications`.
    pub async fn trending(&self) -> Result<Vec<Publication>, PublicationError> {
        let order_by = OrderBy::descending(self.popularity.clone());
        let documents = self
            .store
            .query(&self.collection, &order_by, TRENDING_LIMIT)
            .await?;
        Ok(decode_readable(documents))
    }

    async fn write_comments(&self, publication: &Publication) -> Result<(), PublicationError> {
        let id = &publication.id;
        let mut partial = DocumentBody::new();
        partial.insert(
            COMMENTS_FIELD_NAME.to_string(),
            to_value(id, &publication.body.comments)?,
        );
        partial.insert(
            LAST_COMMENT_ID_FIELD_NAME.to_string(),
            to_value(id, &publication.body.last_comment_id)?,
        );
        self.store
            .update(&self.collection, id.as_ref(), partial)
            .await?;
        Ok(())
    }
}

fn comment_not_found(id: &PublicationId, comment: CommentId) -> PublicationError {
    PublicationError::CommentNotFound {
        publication: id.clone(),
        comment,
    }
}

fn decode(document: StoredDocument) -> Result<Publication, PublicationError> {
    let StoredDocument { id, body } = document;
    let body: PublicationBody =
        serde_json::from_value(Value::Object(body)).map_err(|e| StoreError::Malformed {
            id: id.clone(),
            reason: e.to_string(),
        })?;
    Ok(Publication {
        id: PublicationId(id),
        body,
    })
}

fn decode_readable(documents: Vec<StoredDocument>) -> Vec<Publication> {
    documents
        .into_iter()
        .filter_map(|document| match decode(document) {
            Ok(publication) => Some(publication),
            Err(e) => {
                tracing::warn!("skipping publication: {}", e);
                None
            }
        })
        .collect()
}

fn encode(id: &str, body: &PublicationBody) -> Result<DocumentBody, PublicationError> {
    match serde_json::to_value(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(malformed(id, "publication body is not an object".to_string())),
        Err(e) => Err(malformed(id, e.to_string())),
    }
}

fn to_value<T: Serialize>(id: &PublicationId, value: &T) -> Result<Value, PublicationError> {
    serde_json::to_value(value).map_err(|e| malformed(id.as_ref(), e.to_string()))
}

fn malformed(id: &str, reason: String) -> PublicationError {
    StoreError::Malformed {
        id: id.to_string(),
        reason,
    }
    .into()
}
