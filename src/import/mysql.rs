//! MySQL `information_schema` adapter.

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tracing::{debug, info};

use super::catalog::{CatalogSnapshot, ColumnRow, KeyRow, TableRow};
use super::error::ImportResult;
use crate::config::ImportConfig;

// information_schema text columns come back as binary on some servers
const COLUMNS_QUERY: &str = "SELECT CAST(TABLE_NAME AS CHAR), CAST(COLUMN_NAME AS CHAR), \
     CAST(COLUMN_TYPE AS CHAR), CAST(IS_NULLABLE AS CHAR), CAST(COLUMN_DEFAULT AS CHAR), \
     CAST(EXTRA AS CHAR) \
     FROM information_schema.COLUMNS WHERE TABLE_SCHEMA = ? \
     ORDER BY TABLE_NAME, ORDINAL_POSITION";

const TABLES_QUERY: &str = "SELECT CAST(TABLE_NAME AS CHAR), CAST(ENGINE AS CHAR) \
     FROM information_schema.TABLES WHERE TABLE_SCHEMA = ? \
     ORDER BY TABLE_NAME";

const PRIMARY_KEY_QUERY: &str = "SELECT CAST(TABLE_NAME AS CHAR), CAST(COLUMN_NAME AS CHAR) \
     FROM information_schema.KEY_COLUMN_USAGE \
     WHERE CONSTRAINT_SCHEMA = ? AND CONSTRAINT_NAME = 'PRIMARY' \
     ORDER BY TABLE_NAME, ORDINAL_POSITION";

/// A live MySQL catalog.
pub struct MySqlCatalog {
    pool: MySqlPool,
}

impl MySqlCatalog {
    /// Connect with the given options.
    pub async fn connect(config: &ImportConfig) -> ImportResult<Self> {
        config.validate()?;

        let mut options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .database(&config.dbname)
            .charset("utf8");
        if let Some(password) = &config.password {
            options = options.password(password);
        }

        info!(host = %config.host, port = config.port, database = %config.dbname, "connecting to catalog");
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Read the whole catalog of `database`.
    pub async fn snapshot(&self, database: &str) -> ImportResult<CatalogSnapshot> {
        let columns: Vec<ColumnRow> = sqlx::query_as(COLUMNS_QUERY)
            .bind(database)
            .fetch_all(&self.pool)
            .await?;
        debug!(count = columns.len(), "read catalog columns");

        let tables: Vec<TableRow> = sqlx::query_as(TABLES_QUERY)
            .bind(database)
            .fetch_all(&self.pool)
            .await?;
        debug!(count = tables.len(), "read catalog tables");

        let keys: Vec<KeyRow> = sqlx::query_as(PRIMARY_KEY_QUERY)
            .bind(database)
            .fetch_all(&self.pool)
            .await?;
        debug!(count = keys.len(), "read primary key columns");

        CatalogSnapshot::from_rows(database, columns, tables, keys)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
