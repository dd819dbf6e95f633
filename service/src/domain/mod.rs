use publications_common::DocumentStore;

use crate::domain::publications::PublicationStore;

pub mod comments;
pub mod error;
pub mod publication;
pub mod publications;

/// The global application state shared between all request handlers.
pub trait AppState: Clone + Send + Sync + 'static {
    type D: DocumentStore;

    fn publications(&self) -> &PublicationStore<Self::D>;
}
