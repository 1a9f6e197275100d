use thiserror::Error;

/// An error from unsuccessful database operations
#[derive(Error, Debug)]
pub enum DbErr {
    /// There was a problem with the database connection
    #[error("Connection Error: {0}")]
    Conn(#[source] RuntimeErr),
    /// An error occurred while performing a query
    #[error("Query Error: {0}")]
    Query(#[source] RuntimeErr),
    /// Error occurred while parsing value as target type
    #[error("Type Error: {0}")]
    Type(String),
    /// Configuration could not be loaded or resolved
    #[error("Config Error: {0}")]
    Config(String),
    /// A custom error
    #[error("Custom Error: {0}")]
    Custom(String),
}

/// Runtime error
#[derive(Error, Debug)]
pub enum RuntimeErr {
    /// SQLx Error
    #[cfg(feature = "sqlx-dep")]
    #[error("{0}")]
    SqlxError(#[from] sqlx::Error),
    /// Error generated from within the crate itself
    #[error("{0}")]
    Internal(String),
}

impl PartialEq for DbErr {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for DbErr {}

impl DbErr {
    pub(crate) fn conn<T: Into<String>>(message: T) -> Self {
        Self::Conn(RuntimeErr::Internal(message.into()))
    }

    pub(crate) fn query<T: Into<String>>(message: T) -> Self {
        Self::Query(RuntimeErr::Internal(message.into()))
    }
}
