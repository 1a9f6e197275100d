use crate::{DbErr, QueryResult, Statement};

/// Creates constraints for any structure that can execute SQL statements
/// against the database catalog and return rows
#[async_trait::async_trait]
pub trait ConnectionTrait: Sync {
    /// Execute a [Statement] and return the first row, if any
    async fn query_one(&self, stmt: Statement) -> Result<Option<QueryResult>, DbErr>;

    /// Execute a [Statement] and return a collection Vec<[QueryResult]> on success
    async fn query_all(&self, stmt: Statement) -> Result<Vec<QueryResult>, DbErr>;

    /// Check if the connection is a test connection for the Mock database
    fn is_mock_connection(&self) -> bool {
        false
    }
}
