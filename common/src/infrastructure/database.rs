//! PostgreSQL connection shared by the document store and the migration binary.
//! The pool is opened once per process and handed out as `&'static Database`.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use anyhow::{Context, anyhow};
use serde::Deserialize;
use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
};

/// Connection pool plus the schema every collection table lives in
#[derive(Clone, Debug)]
pub struct Database {
    database_pool: PgPool,
    database_schema: String,
}

/// `database` section of the configuration files
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub db: String,
    pub schema: String,
    pub credentials: DatabaseCredentials,
    pub connection: DatabaseConnection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConnection {
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseCredentials {
    pub username: String,
    pub password: String,
}

fn default_port() -> u16 {
    5432
}

static DATABASE: OnceLock<Arc<Database>> = OnceLock::new();

/// Opens the pool once per process and hands out a reference with static lifetime.
pub async fn connect(settings: &DatabaseSettings) -> Result<&'static Database, anyhow::Error> {
    let database = Database::new(settings).await?;
    DATABASE
        .set(Arc::new(database))
        .map_err(|_| anyhow!("database is already connected"))?;
    DATABASE
        .get()
        .map(|database| database.as_ref())
        .ok_or_else(|| anyhow!("database connection is not initialized"))
}

impl Database {
    async fn new(settings: &DatabaseSettings) -> Result<Self, anyhow::Error> {
        let pg_connect_options = connect_options(settings);

        let connection = &settings.connection;
        let pool = PgPoolOptions::new()
            .min_connections(connection.min_connections)
            .max_connections(connection.max_connections)
            .acquire_timeout(Duration::from_secs(connection.acquire_timeout_seconds))
            .connect_with(pg_connect_options)
            .await
            .with_context(|| {
                format!(
                    "failed to open database at {}:{}/{}",
                    settings.host, settings.port, settings.db
                )
            })?;

        Ok(Self {
            database_pool: pool,
            database_schema: settings.schema.to_owned(),
        })
    }

    /// Runs DDL statements in one transaction, `ctx` names the step in logs and errors
    pub async fn execute_in_transaction(
        &self,
        queries: Vec<String>,
        ctx: &'static str,
    ) -> Result<(), anyhow::Error> {
        let mut transaction = self
            .database_pool
            .begin()
            .await
            .context(format!("failed to start {} transaction", ctx))?;

        tracing::info!("{}", ctx);

        for ddl in queries {
            tracing::debug!("{}", ddl);

            sqlx::query(&ddl)
                .execute(&mut *transaction)
                .await
                .context(format!("failed to execute {} query", ctx))?;
        }

        transaction
            .commit()
            .await
            .context(format!("failed to commit {} transaction", ctx))?;

        Ok(())
    }

    pub fn database_pool(&self) -> &PgPool {
        &self.database_pool
    }

    pub fn database_schema(&self) -> &str {
        &self.database_schema
    }
}

fn connect_options(settings: &DatabaseSettings) -> PgConnectOptions {
    let credentials = &settings.credentials;
    PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&credentials.username)
        .password(&credentials.password)
        .database(&settings.db)
        .ssl_mode(PgSslMode::Prefer)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn settings(port: Option<u16>) -> DatabaseSettings {
        let mut value = json!({
            "host": "db.internal",
            "db": "publications",
            "schema": "public",
            "credentials": {"username": "app", "password": "secret"},
            "connection": {
                "min_connections": 1,
                "max_connections": 4,
                "acquire_timeout_seconds": 3
            }
        });
        if let Some(port) = port {
            value["port"] = json!(port);
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_port_defaults_to_postgres_port() {
        assert_eq!(settings(None).port, 5432);
        assert_eq!(settings(Some(6432)).port, 6432);
    }

    #[test]
    fn test_connect_options_follow_settings() {
        let options = connect_options(&settings(Some(6432)));

        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6432);
        assert_eq!(options.get_username(), "app");
        assert_eq!(options.get_database(), Some("publications"));
    }
}
