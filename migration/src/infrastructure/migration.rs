use publications_common::database::Database;

use crate::{
    domain::{
        migration::{Migration, apply_migration_steps, migration_steps},
        tables::Collection,
    },
    infrastructure::tables::TablesAdapter,
};

#[derive(Clone)]
pub struct MigrationAdapter {
    collections: Vec<Collection>,
    tables: TablesAdapter,
    database: &'static Database,
}

impl MigrationAdapter {
    pub fn new(
        collections: Vec<Collection>,
        tables: TablesAdapter,
        database: &'static Database,
    ) -> Self {
        Self {
            collections,
            tables,
            database,
        }
    }
}

impl Migration for MigrationAdapter {
    type T = TablesAdapter;

    async fn migrate(&self) -> Result<(), anyhow::Error> {
        let database_schema = self.database.database_schema();
        let steps = migration_steps(database_schema, &self.collections, &self.tables).await?;
        tracing::info!("{} collection table(s) to create", steps.len());
        apply_migration_steps(steps, self.database).await?;
        Ok(())
    }
}
