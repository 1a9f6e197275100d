use crate::DbErr;
use std::fmt;

/// Defines the result of a query operation on the catalog
#[derive(Debug)]
pub struct QueryResult {
    pub(crate) row: QueryResultRow,
}

#[allow(clippy::enum_variant_names)]
pub(crate) enum QueryResultRow {
    #[cfg(feature = "sqlx-postgres")]
    SqlxPostgres(sqlx::postgres::PgRow),
    #[cfg(feature = "mock")]
    Mock(crate::MockRow),
}

/// Constrain any type trying to get a Row in a database
pub trait TryGetable: Sized {
    /// Ensure the type implements this method
    fn try_get(res: &QueryResult, col: &str) -> Result<Self, TryGetError>;
}

/// An error from trying to get a value out of a row
#[derive(Debug)]
pub enum TryGetError {
    /// A database error was encountered as defined in [crate::DbErr]
    DbErr(DbErr),
    /// A null value was encountered in the named column
    Null(String),
}

impl From<TryGetError> for DbErr {
    fn from(e: TryGetError) -> DbErr {
        match e {
            TryGetError::DbErr(e) => e,
            TryGetError::Null(s) => {
                DbErr::Type(format!("A null value was encountered while decoding {s}"))
            }
        }
    }
}

/// A row shape that can be decoded from a [QueryResult]
pub trait FromQueryResult: Sized {
    /// Instantiate a row from a [QueryResult]
    fn from_query_result(res: &QueryResult) -> Result<Self, DbErr>;

    /// Decode every row of a result set, failing on the first bad row
    fn from_query_results(res: &[QueryResult]) -> Result<Vec<Self>, DbErr> {
        res.iter().map(Self::from_query_result).collect()
    }
}

// QueryResult //

impl QueryResult {
    /// Get a value from a column
    pub fn try_get<T>(&self, col: &str) -> Result<T, DbErr>
    where
        T: TryGetable,
    {
        Ok(T::try_get(self, col)?)
    }
}

impl fmt::Debug for QueryResultRow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            #[cfg(feature = "sqlx-postgres")]
            Self::SqlxPostgres(_) => write!(f, "QueryResultRow::SqlxPostgres cannot be inspected"),
            #[cfg(feature = "mock")]
            Self::Mock(row) => write!(f, "{row:?}"),
            #[allow(unreachable_patterns)]
            _ => unreachable!(),
        }
    }
}

// TryGetable //

impl<T: TryGetable> TryGetable for Option<T> {
    fn try_get(res: &QueryResult, col: &str) -> Result<Self, TryGetError> {
        match T::try_get(res, col) {
            Ok(v) => Ok(Some(v)),
            Err(TryGetError::Null(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

macro_rules! try_getable_all {
    ( $type: ty ) => {
        impl TryGetable for $type {
            #[allow(unused_variables)]
            fn try_get(res: &QueryResult, col: &str) -> Result<Self, TryGetError> {
                match &res.row {
                    #[cfg(feature = "sqlx-postgres")]
                    QueryResultRow::SqlxPostgres(row) => {
                        use sqlx::Row;
                        row.try_get::<Option<$type>, _>(col)
                            .map_err(|e| TryGetError::DbErr(crate::sqlx_error_to_query_err(e)))
                            .and_then(|opt| opt.ok_or_else(|| TryGetError::Null(col.to_owned())))
                    }
                    #[cfg(feature = "mock")]
                    QueryResultRow::Mock(row) => row.try_get::<$type>(col),
                    #[allow(unreachable_patterns)]
                    _ => unreachable!(),
                }
            }
        }
    };
}

try_getable_all!(bool);
try_getable_all!(i16);
try_getable_all!(i32);
try_getable_all!(i64);
try_getable_all!(f64);
try_getable_all!(String);

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::IntoMockRow;
    use serde_json::json;

    fn result(value: serde_json::Value) -> QueryResult {
        QueryResult {
            row: QueryResultRow::Mock(value.into_mock_row()),
        }
    }

    #[test]
    fn optional_turns_null_into_none() {
        let res = result(json!({ "len": null, "name": "id" }));
        assert_eq!(res.try_get::<Option<i32>>("len").unwrap(), None);
        assert_eq!(res.try_get::<Option<String>>("name").unwrap(), Some("id".to_owned()));
    }

    #[test]
    fn required_null_is_type_error() {
        let res = result(json!({ "len": null }));
        let err = res.try_get::<i32>("len").unwrap_err();
        assert_eq!(
            err,
            DbErr::Type("A null value was encountered while decoding len".to_owned())
        );
    }

    #[test]
    fn optional_does_not_hide_missing_column() {
        let res = result(json!({}));
        assert!(res.try_get::<Option<bool>>("flag").is_err());
    }
}
