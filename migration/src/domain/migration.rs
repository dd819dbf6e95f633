use std::future::Future;

use publications_common::database::Database;

use crate::domain::tables::{Collection, Column, Index, Table, Tables, collections_into_tables};

pub trait Migration: Send + Sync + Clone + 'static {
    type T: Tables;

    fn migrate(&self) -> impl Future<Output = Result<(), anyhow::Error>>;
}

pub trait MigrationStep {
    fn ctx(&self) -> &'static str;
    fn ddls(self) -> Vec<String>;
}

pub struct CreateTableStep {
    ddls: Vec<String>,
}

impl CreateTableStep {
    fn new(database_schema: &str, table: &Table) -> Self {
        let ddls = create_table_ddl(database_schema, table);
        Self { ddls }
    }
}

impl MigrationStep for CreateTableStep {
    fn ctx(&self) -> &'static str {
        "CREATE TABLE"
    }

    fn ddls(self) -> Vec<String> {
        self.ddls
    }
}

/// One step per declared collection whose table does not exist yet
pub async fn migration_steps(
    database_schema: &str,
    collections: &[Collection],
    tables: &impl Tables,
) -> Result<Vec<CreateTableStep>, anyhow::Error> {
    let needed_schema = collections_into_tables(collections);
    let actual_schema = tables.load().await?;

    let mut result = Vec::new();

    for table in needed_schema {
        if actual_schema.contains(&table.name) {
            tracing::debug!("table {} already exists", table.name);
        } else {
            result.push(CreateTableStep::new(database_schema, &table));
        }
    }

    Ok(result)
}

pub async fn apply_migration_steps(
    steps: Vec<impl MigrationStep>,
    database: &Database,
) -> Result<(), anyhow::Error> {
    use futures::stream::{self, StreamExt};

    let mut stream = stream::iter(steps);
    while let Some(step) = stream.next().await {
        let ctx = step.ctx();
        let ddls = step.ddls();
        database.execute_in_transaction(ddls, ctx).await?;
    }

    Ok(())
}

fn create_table_ddl(schema: &str, table: &Table) -> Vec<String> {
    let mut columns = Vec::new();
    let mut pk_columns = Vec::new();

    for column in table.columns.iter() {
        columns.push(column_ddl(column));
        if column.primary_key {
            pk_columns.push(format!("\"{}\"", column.name));
        }
    }

    let columns_sql = columns.join(",\n    ");
    let pk_columns_sql = pk_columns.join(",");

    let table_ddl = format!(
        "CREATE TABLE \"{}\".\"{}\" (\n    {},\n    PRIMARY KEY({})\n)",
        schema, table.name, columns_sql, pk_columns_sql
    );

    let mut ddls = vec![table_ddl];

    for index in table.indexes.iter() {
        ddls.push(create_index_ddl(schema, index));
    }

    ddls
}

fn column_ddl(column: &Column) -> String {
    let mut sql = format!("\"{}\" {}", column.name, column.column_type);
    if column.not_null {
        sql.push_str(" NOT NULL");
    }
    if let Some(default_value) = &column.default_value {
        sql.push_str(format!(" DEFAULT {}", default_value).as_str());
    }
    sql
}

fn create_index_ddl(schema: &str, index: &Index) -> String {
    format!(
        "CREATE INDEX \"{}\" ON \"{}\".\"{}\" ({})",
        index.name, schema, index.table_name, index.expression
    )
}
