use std::fmt;

/// Defines an SQL statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// The SQL query
    pub sql: String,
}

impl Statement {
    /// Create a [Statement] from a raw SQL statement
    pub fn from_string<T>(sql: T) -> Statement
    where
        T: Into<String>,
    {
        Statement { sql: sql.into() }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", &self.sql)
    }
}
