use crate::{
    domain::{declared_collections, migration::Migration},
    infrastructure::{migration::MigrationAdapter, settings::Settings, tables::TablesAdapter},
};
use publications_common::database;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod domain;
pub mod infrastructure;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let collections = declared_collections()?;
    tracing::info!("{} collection(s) declared", collections.len());

    let database = database::connect(&settings.database).await?;
    tracing::info!("Connected to DB");

    // create missing collection tables, existing ones are left untouched
    let migration = MigrationAdapter::new(collections, TablesAdapter::new(database), database);
    migration.migrate().await?;
    tracing::info!("Collections migrated");

    Ok(())
}
