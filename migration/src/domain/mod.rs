use publications_common::{
    CollectionName, FieldName, POPULARITY_FIELD_NAME, PUBLICATIONS_COLLECTION,
};

use crate::domain::tables::Collection;

pub mod migration;
pub mod tables;

/// Collections the service stores documents in, with the body fields it sorts on
pub fn declared_collections() -> Result<Vec<Collection>, anyhow::Error> {
    let publications = Collection::new(
        CollectionName::try_new(PUBLICATIONS_COLLECTION)?,
        vec![FieldName::try_new(POPULARITY_FIELD_NAME)?],
    );

    Ok(vec![publications])
}
