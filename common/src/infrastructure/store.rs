use sqlx::postgres::PgRow;
use sqlx::types::{Json, Uuid};

use crate::database::Database;
use crate::domain::{
    CollectionName, DocumentBody, DocumentStore, OrderBy, SortDirection, StoreError,
    StoredDocument,
};
use crate::{BODY_FIELD_NAME, CREATED_FIELD_NAME, ID_FIELD_NAME, UPDATED_FIELD_NAME};

/// Document store over PostgreSQL: one table per collection, bodies kept as JSONB.
///
/// Expected table layout (created by the migration binary):
/// ```sql
/// CREATE TABLE "<schema>"."<collection>" (
///     "id" uuid NOT NULL DEFAULT gen_random_uuid(),
///     "body" jsonb NOT NULL DEFAULT '{}'::jsonb,
///     "created_at" timestamptz NOT NULL DEFAULT now(),
///     "updated_at" timestamptz NOT NULL DEFAULT now(),
///     PRIMARY KEY("id")
/// )
/// ```
/// Natural order of a collection is insertion order (`created_at`).
#[derive(Clone, Debug)]
pub struct PostgresDocumentStore {
    database: &'static Database,
}

impl PostgresDocumentStore {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }

    fn table(&self, collection: &CollectionName) -> String {
        qualified_table(self.database.database_schema(), collection)
    }
}

fn qualified_table(schema: &str, collection: &CollectionName) -> String {
    format!("\"{}\".\"{}\"", schema, collection)
}

fn select_sql(table: &str) -> String {
    format!(
        "SELECT \"{ID_FIELD_NAME}\"::text AS \"{ID_FIELD_NAME}\", \"{BODY_FIELD_NAME}\" FROM {table}"
    )
}

fn query_sql(table: &str, order_by: &OrderBy) -> String {
    let direction = match order_by.direction {
        SortDirection::Ascending => "ASC",
        SortDirection::Descending => "DESC",
    };
    format!(
        "{} ORDER BY \"{BODY_FIELD_NAME}\" -> '{}' {} NULLS LAST, \"{CREATED_FIELD_NAME}\" LIMIT $1",
        select_sql(table),
        order_by.field,
        direction
    )
}

// ids are UUIDs generated by the database, anything else cannot exist in the table
fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

impl TryFrom<PgRow> for StoredDocument {
    type Error = StoreError;

    fn try_from(value: PgRow) -> Result<Self, Self::Error> {
        use sqlx::Row;

        let id: String = value.try_get(ID_FIELD_NAME)?;
        let body: Json<DocumentBody> =
            value
                .try_get(BODY_FIELD_NAME)
                .map_err(|e| StoreError::Malformed {
                    id: id.clone(),
                    reason: e.to_string(),
                })?;

        Ok(StoredDocument { id, body: body.0 })
    }
}

impl DocumentStore for PostgresDocumentStore {
    async fn list(&self, collection: &CollectionName) -> Result<Vec<StoredDocument>, StoreError> {
        use futures::TryStreamExt;

        let sql = format!(
            "{} ORDER BY \"{CREATED_FIELD_NAME}\"",
            select_sql(&self.table(collection))
        );
        tracing::debug!("Generated SQL: {}", sql);

        let mut rows = sqlx::query(&sql).fetch(self.database.database_pool());

        let mut documents = Vec::new();
        while let Some(row) = rows.try_next().await? {
            documents.push(StoredDocument::try_from(row)?);
        }

        Ok(documents)
    }

    async fn get(
        &self,
        collection: &CollectionName,
        id: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let Some(uuid) = parse_id(id) else {
            return Ok(None);
        };

        let sql = format!(
            "{} WHERE \"{ID_FIELD_NAME}\" = $1",
            select_sql(&self.table(collection))
        );
        tracing::debug!("Generated SQL: {}", sql);

        let row = sqlx::query(&sql)
            .bind(uuid)
            .fetch_optional(self.database.database_pool())
            .await?;

        row.map(StoredDocument::try_from).transpose()
    }

    async fn add(
        &self,
        collection: &CollectionName,
        body: DocumentBody,
    ) -> Result<String, StoreError> {
        let sql = format!(
            "INSERT INTO {} (\"{BODY_FIELD_NAME}\") VALUES ($1) RETURNING \"{ID_FIELD_NAME}\"::text",
            self.table(collection)
        );
        tracing::debug!("Generated SQL: {}", sql);

        let id = sqlx::query_scalar::<_, String>(&sql)
            .bind(Json(body))
            .fetch_one(self.database.database_pool())
            .await?;

        Ok(id)
    }

    async fn set(
        &self,
        collection: &CollectionName,
        id: &str,
        body: DocumentBody,
    ) -> Result<(), StoreError> {
        let uuid = parse_id(id).ok_or_else(|| StoreError::Malformed {
            id: id.to_string(),
            reason: "document ids are UUIDs".to_string(),
        })?;

        let sql = format!(
            "INSERT INTO {} (\"{ID_FIELD_NAME}\", \"{BODY_FIELD_NAME}\") VALUES ($1, $2) \
             ON CONFLICT (\"{ID_FIELD_NAME}\") DO UPDATE \
             SET \"{BODY_FIELD_NAME}\" = EXCLUDED.\"{BODY_FIELD_NAME}\", \"{UPDATED_FIELD_NAME}\" = now()",
            self.table(collection)
        );
        tracing::debug!("Generated SQL: {}", sql);

        sqlx::query(&sql)
            .bind(uuid)
            .bind(Json(body))
            .execute(self.database.database_pool())
            .await?;

        Ok(())
    }

    async fn update(
        &self,
        collection: &CollectionName,
        id: &str,
        partial: DocumentBody,
    ) -> Result<(), StoreError> {
        let missing = || StoreError::Missing {
            collection: collection.to_string(),
            id: id.to_string(),
        };
        let uuid = parse_id(id).ok_or_else(missing)?;

        // `||` replaces top level keys of the stored object and keeps the others
        let sql = format!(
            "UPDATE {} SET \"{BODY_FIELD_NAME}\" = \"{BODY_FIELD_NAME}\" || $2, \"{UPDATED_FIELD_NAME}\" = now() \
             WHERE \"{ID_FIELD_NAME}\" = $1",
            self.table(collection)
        );
        tracing::debug!("Generated SQL: {}", sql);

        let result = sqlx::query(&sql)
            .bind(uuid)
            .bind(Json(partial))
            .execute(self.database.database_pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(missing());
        }

        Ok(())
    }

    async fn delete(&self, collection: &CollectionName, id: &str) -> Result<(), StoreError> {
        let Some(uuid) = parse_id(id) else {
            return Ok(());
        };

        let sql = format!(
            "DELETE FROM {} WHERE \"{ID_FIELD_NAME}\" = $1",
            self.table(collection)
        );
        tracing::debug!("Generated SQL: {}", sql);

        sqlx::query(&sql)
            .bind(uuid)
            .execute(self.database.database_pool())
            .await?;

        Ok(())
    }

    async fn query(
        &self,
        collection: &CollectionName,
        order_by: &OrderBy,
        limit: usize,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let sql = query_sql(&self.table(collection), order_by);
        tracing::debug!("Generated SQL: {}", sql);

        let rows = sqlx::query(&sql)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(self.database.database_pool())
            .await?;

        rows.into_iter().map(StoredDocument::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::FieldName;

    use super::*;

    #[test]
    fn test_qualified_table() {
        let collection = CollectionName::try_new("publications").unwrap();
        assert_eq!(
            qualified_table("public", &collection),
            "\"public\".\"publications\""
        );
    }

    #[test]
    fn test_query_sql_orders_by_body_field() {
        let order_by = OrderBy::descending(FieldName::try_new("popularity").unwrap());
        let sql = query_sql("\"public\".\"publications\"", &order_by);

        assert!(sql.starts_with("SELECT \"id\"::text AS \"id\", \"body\" FROM \"public\".\"publications\""));
        assert!(sql.contains("ORDER BY \"body\" -> 'popularity' DESC NULLS LAST, \"created_at\""));
        assert!(sql.ends_with("LIMIT $1"));
    }

    #[test]
    fn test_parse_id_rejects_non_uuid() {
        assert!(parse_id("not-a-uuid").is_none());
        assert!(parse_id("67e55044-10b1-426f-9247-bb680e5fe0c8").is_some());
    }
}
