use crate::{
    DatabaseConnection, DbErr, MockDatabaseConnection, MockDatabaseTrait, QueryResult,
    QueryResultRow, Statement, TryGetError,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{collections::BTreeMap, sync::Arc};

/// Defines a Mock database suitable for testing
#[derive(Debug, Default)]
pub struct MockDatabase {
    transaction_log: Vec<Statement>,
    query_results: Vec<Result<Vec<MockRow>, DbErr>>,
}

/// A row for the [MockDatabase]: a [BTreeMap] of column names to JSON values
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MockRow {
    values: BTreeMap<String, Value>,
}

/// A trait to get a [MockRow] from a type useful for testing in the [MockDatabase]
pub trait IntoMockRow {
    /// The method to perform this operation
    fn into_mock_row(self) -> MockRow;
}

impl MockDatabase {
    /// Instantiate a mock database with an empty result queue
    pub fn new() -> Self {
        Default::default()
    }

    /// Create a database connection
    pub fn into_connection(self) -> DatabaseConnection {
        DatabaseConnection::MockDatabaseConnection(Arc::new(MockDatabaseConnection::new(self)))
    }

    /// Add the query results, one `Vec` of rows per query
    pub fn append_query_results<T, I, II>(mut self, vec: II) -> Self
    where
        T: IntoMockRow,
        I: IntoIterator<Item = T>,
        II: IntoIterator<Item = I>,
    {
        for row in vec.into_iter() {
            let row = row.into_iter().map(|vec| vec.into_mock_row()).collect();
            self.query_results.push(Ok(row));
        }
        self
    }

    /// Add query errors, answered in the same queue as query results
    pub fn append_query_errors<T>(mut self, vec: T) -> Self
    where
        T: IntoIterator<Item = DbErr>,
    {
        self.query_results.extend(vec.into_iter().map(Err));
        self
    }
}

impl MockDatabaseTrait for MockDatabase {
    fn query(&mut self, counter: usize, statement: Statement) -> Result<Vec<QueryResult>, DbErr> {
        self.transaction_log.push(statement);
        if counter < self.query_results.len() {
            std::mem::replace(&mut self.query_results[counter], Ok(Vec::new())).map(|rows| {
                rows.into_iter()
                    .map(|row| QueryResult {
                        row: QueryResultRow::Mock(row),
                    })
                    .collect()
            })
        } else {
            Err(DbErr::query(format!(
                "`query_results` buffer is empty for query #{counter}"
            )))
        }
    }

    fn drain_transaction_log(&mut self) -> Vec<Statement> {
        std::mem::take(&mut self.transaction_log)
    }
}

impl MockRow {
    /// Get a value from the [MockRow]; JSON `null` is a SQL NULL
    pub fn try_get<T>(&self, col: &str) -> Result<T, TryGetError>
    where
        T: DeserializeOwned,
    {
        match self.values.get(col) {
            None => Err(TryGetError::DbErr(DbErr::Type(format!(
                "column `{col}` not found in mock row"
            )))),
            Some(Value::Null) => Err(TryGetError::Null(col.to_owned())),
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                TryGetError::DbErr(DbErr::Type(format!("column `{col}`: {e}")))
            }),
        }
    }
}

impl IntoMockRow for MockRow {
    fn into_mock_row(self) -> MockRow {
        self
    }
}

impl IntoMockRow for BTreeMap<&str, Value> {
    fn into_mock_row(self) -> MockRow {
        MockRow {
            values: self.into_iter().map(|(k, v)| (k.to_owned(), v)).collect(),
        }
    }
}

impl IntoMockRow for BTreeMap<String, Value> {
    fn into_mock_row(self) -> MockRow {
        MockRow { values: self }
    }
}

/// Only JSON objects carry columns; any other value becomes an empty row
impl IntoMockRow for Value {
    fn into_mock_row(self) -> MockRow {
        match self {
            Value::Object(map) => MockRow {
                values: map.into_iter().collect(),
            },
            _ => MockRow::default(),
        }
    }
}
