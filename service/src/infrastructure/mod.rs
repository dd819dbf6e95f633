use publications_common::DocumentStore;

use crate::domain::AppState;
use crate::domain::publications::PublicationStore;

pub mod http;
pub mod settings;

#[derive(Clone, Debug)]
pub struct AppStateImpl<D: DocumentStore> {
    publications: PublicationStore<D>,
}

impl<D: DocumentStore> AppStateImpl<D> {
    pub fn new(publications: PublicationStore<D>) -> Self {
        Self { publications }
    }
}

impl<D: DocumentStore> AppState for AppStateImpl<D> {
    type D = D;

    fn publications(&self) -> &PublicationStore<Self::D> {
        &self.publications
    }
}
