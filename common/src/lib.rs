pub mod domain;
pub mod infrastructure;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Persisted documents column names

pub const ID_FIELD_NAME: &str = "id";
pub const BODY_FIELD_NAME: &str = "body";
pub const CREATED_FIELD_NAME: &str = "created_at";
pub const UPDATED_FIELD_NAME: &str = "updated_at";

// Collections and the document fields the storage layer indexes

pub const PUBLICATIONS_COLLECTION: &str = "publications";
pub const POPULARITY_FIELD_NAME: &str = "popularity";

// expose domain module

pub use domain::*;

// expose database module

pub use infrastructure::database;
pub use infrastructure::store::PostgresDocumentStore;
