use std::collections::HashSet;
use std::future::Future;

use publications_common::{
    BODY_FIELD_NAME, CREATED_FIELD_NAME, CollectionName, FieldName, ID_FIELD_NAME,
    UPDATED_FIELD_NAME,
};

/// Reads the tables that already exist in the database schema
pub trait Tables: Send + Sync + Clone + 'static {
    fn load(&self) -> impl Future<Output = Result<HashSet<String>, anyhow::Error>>;
}

/// Represents table in a database, used for ddl generation
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
}

/// Represents one column in the database table
pub struct Column {
    pub name: String,
    pub column_type: String,
    pub not_null: bool,
    pub primary_key: bool,
    pub default_value: Option<String>,
}

/// Represents an index in the database table, either on a column or on a document body field
pub struct Index {
    pub table_name: String,
    pub name: String,
    pub expression: String,
}

/// A collection of documents the document store needs a table for
#[derive(Clone, Debug)]
pub struct Collection {
    pub name: CollectionName,
    pub sorted_fields: Vec<FieldName>,
}

impl Table {
    pub fn new(name: String, columns: Vec<Column>, indexes: Vec<Index>) -> Self {
        Self {
            name,
            columns,
            indexes,
        }
    }
}

impl Column {
    pub fn new<T: Into<String>>(
        name: T,
        column_type: T,
        not_null: bool,
        default_value: Option<T>,
    ) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            not_null,
            primary_key: false,
            default_value: default_value.map(T::into),
        }
    }

    pub fn primary_key<T: Into<String>>(name: T, column_type: T, default_value: Option<T>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            not_null: true,
            primary_key: true,
            default_value: default_value.map(T::into),
        }
    }
}

impl Index {
    pub fn on_column(table_name: &str, column: &str) -> Self {
        Self {
            table_name: table_name.to_string(),
            name: format!("{}_{}_idx", table_name, column),
            expression: format!("\"{}\"", column),
        }
    }

    /// Descending index matching the store's `ORDER BY body -> field DESC NULLS LAST`
    pub fn on_body_field(table_name: &str, field: &FieldName) -> Self {
        Self {
            table_name: table_name.to_string(),
            name: format!("{}_{}_idx", table_name, field.as_ref().to_lowercase()),
            expression: format!("(\"{}\" -> '{}') DESC NULLS LAST", BODY_FIELD_NAME, field),
        }
    }
}

impl Collection {
    pub fn new(name: CollectionName, sorted_fields: Vec<FieldName>) -> Self {
        Self {
            name,
            sorted_fields,
        }
    }
}

pub fn collections_into_tables(collections: &[Collection]) -> Vec<Table> {
    collections.iter().map(collection_into_table).collect()
}

fn collection_into_table(collection: &Collection) -> Table {
    let table_name = collection.name.as_ref();

    let columns = vec![
        Column::primary_key(ID_FIELD_NAME, "UUID", Some("gen_random_uuid()")),
        Column::new(BODY_FIELD_NAME, "JSONB", true, Some("'{}'::jsonb")),
        Column::new(CREATED_FIELD_NAME, "TIMESTAMPTZ", true, Some("now()")),
        Column::new(UPDATED_FIELD_NAME, "TIMESTAMPTZ", true, Some("now()")),
    ];

    let mut indexes = vec![Index::on_column(table_name, CREATED_FIELD_NAME)];
    for field in collection.sorted_fields.iter() {
        indexes.push(Index::on_body_field(table_name, field));
    }

    Table::new(table_name.to_string(), columns, indexes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publications() -> Collection {
        Collection::new(
            CollectionName::try_new("publications").unwrap(),
            vec![FieldName::try_new("popularity").unwrap()],
        )
    }

    #[test]
    fn test_collection_table_layout() {
        let tables = collections_into_tables(&[publications()]);
        assert_eq!(tables.len(), 1);

        let table = &tables[0];
        assert_eq!(table.name, "publications");

        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "body", "created_at", "updated_at"]);
        assert!(table.columns[0].primary_key);
        assert!(table.columns.iter().skip(1).all(|c| !c.primary_key));
    }

    #[test]
    fn test_collection_indexes() {
        let table = collection_into_table(&publications());

        assert_eq!(table.indexes.len(), 2);
        assert_eq!(table.indexes[0].name, "publications_created_at_idx");
        assert_eq!(table.indexes[1].name, "publications_popularity_idx");
        assert_eq!(
            table.indexes[1].expression,
            "(\"body\" -> 'popularity') DESC NULLS LAST"
        );
    }
}
