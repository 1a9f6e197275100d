use crate::{DatabaseConnection, DbErr, MockDatabase, QueryResult, Statement, debug_print};
use std::{
    fmt,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Defines a database driver for the [MockDatabase]
#[derive(Debug)]
pub struct MockDatabaseConnector;

/// Defines a connection for the [MockDatabase]
pub struct MockDatabaseConnection {
    counter: AtomicUsize,
    mocker: Mutex<Box<dyn MockDatabaseTrait>>,
}

/// A Trait for any type wanting to perform operations on the [MockDatabase]
pub trait MockDatabaseTrait: Send + fmt::Debug {
    /// Execute a query and return the rows queued for the `counter`-th query
    fn query(&mut self, counter: usize, stmt: Statement) -> Result<Vec<QueryResult>, DbErr>;

    /// Get all logs from a [MockDatabase] and return a [Vec] of statements
    fn drain_transaction_log(&mut self) -> Vec<Statement>;
}

impl MockDatabaseConnector {
    /// Check if the database URI uses the `mock://` scheme
    pub fn accepts(string: &str) -> bool {
        string.starts_with("mock://")
    }

    /// Connect to the [MockDatabase]
    pub async fn connect(_string: &str) -> Result<DatabaseConnection, DbErr> {
        Ok(DatabaseConnection::MockDatabaseConnection(Arc::new(
            MockDatabaseConnection::new(MockDatabase::new()),
        )))
    }
}

impl fmt::Debug for MockDatabaseConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDatabaseConnection")
            .field("counter", &self.counter.load(Ordering::SeqCst))
            .finish()
    }
}

impl MockDatabaseConnection {
    /// Create a connection to the [MockDatabase]
    pub fn new<M>(m: M) -> Self
    where
        M: MockDatabaseTrait + 'static,
    {
        Self {
            counter: AtomicUsize::new(0),
            mocker: Mutex::new(Box::new(m)),
        }
    }

    fn mocker(&self) -> MutexGuard<'_, Box<dyn MockDatabaseTrait>> {
        // poisoned by a panicking caller; the log is still consistent
        self.mocker.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return one [QueryResult] if the query was successful
    pub async fn query_one(&self, statement: Statement) -> Result<Option<QueryResult>, DbErr> {
        debug_print!("{}", statement);
        let counter = self.counter.fetch_add(1, Ordering::SeqCst);
        let result = self.mocker().query(counter, statement)?;
        Ok(result.into_iter().next())
    }

    /// Return all [QueryResult]s if the query was successful
    pub async fn query_all(&self, statement: Statement) -> Result<Vec<QueryResult>, DbErr> {
        debug_print!("{}", statement);
        let counter = self.counter.fetch_add(1, Ordering::SeqCst);
        self.mocker().query(counter, statement)
    }

    /// Drain the statements executed so far
    pub fn drain_transaction_log(&self) -> Vec<Statement> {
        self.mocker().drain_transaction_log()
    }
}
