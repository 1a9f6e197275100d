use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgRow},
};
use tracing::instrument;

use crate::{
    ConnectOptions, DatabaseConnection, DbErr, QueryResult, QueryResultRow, Statement,
    debug_print,
};

use super::sqlx_common::*;

/// Defines the [sqlx::postgres] connector
#[derive(Debug)]
pub struct SqlxPostgresConnector;

/// Defines a sqlx PostgreSQL pool
#[derive(Debug, Clone)]
pub struct SqlxPostgresPoolConnection {
    pool: PgPool,
}

impl SqlxPostgresConnector {
    /// Check if the URI provided corresponds to `postgres://` for a PostgreSQL database
    pub fn accepts(string: &str) -> bool {
        (string.starts_with("postgres://") || string.starts_with("postgresql://"))
            && string.parse::<PgConnectOptions>().is_ok()
    }

    /// Add configuration options for the PostgreSQL database
    #[instrument(level = "trace")]
    pub async fn connect(options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
        let mut opt = options
            .url
            .parse::<PgConnectOptions>()
            .map_err(sqlx_error_to_conn_err)?;
        if !options.sqlx_logging {
            use sqlx::ConnectOptions;
            opt = opt.disable_statement_logging();
        }
        let pool = options
            .pool_options()
            .connect_with(opt)
            .await
            .map_err(sqlx_error_to_conn_err)?;
        Ok(DatabaseConnection::SqlxPostgresPoolConnection(
            SqlxPostgresPoolConnection { pool },
        ))
    }
}

impl SqlxPostgresConnector {
    /// Instantiate a sqlx pool connection to a [DatabaseConnection]
    pub fn from_sqlx_postgres_pool(pool: PgPool) -> DatabaseConnection {
        DatabaseConnection::SqlxPostgresPoolConnection(SqlxPostgresPoolConnection { pool })
    }
}

impl SqlxPostgresPoolConnection {
    /// Get one result from a SQL query. Returns [Option::None] if no match was found
    #[instrument(level = "trace")]
    pub async fn query_one(&self, stmt: Statement) -> Result<Option<QueryResult>, DbErr> {
        debug_print!("{}", stmt);

        sqlx::query(&stmt.sql)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(|r| r.into()))
            .map_err(sqlx_error_to_query_err)
    }

    /// Get the results of a query returning them as a Vec<[QueryResult]>
    #[instrument(level = "trace")]
    pub async fn query_all(&self, stmt: Statement) -> Result<Vec<QueryResult>, DbErr> {
        debug_print!("{}", stmt);

        sqlx::query(&stmt.sql)
            .fetch_all(&self.pool)
            .await
            .map(|rows| rows.into_iter().map(|r| r.into()).collect())
            .map_err(sqlx_error_to_query_err)
    }

    /// Close the connection pool
    pub async fn close(self) {
        self.pool.close().await;
    }
}

impl From<PgRow> for QueryResult {
    fn from(row: PgRow) -> QueryResult {
        QueryResult {
            row: QueryResultRow::SqlxPostgres(row),
        }
    }
}
