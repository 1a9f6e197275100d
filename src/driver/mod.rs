#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "sqlx-dep")]
mod sqlx_common;
#[cfg(feature = "sqlx-postgres")]
mod sqlx_postgres;

#[cfg(feature = "mock")]
pub use mock::*;
#[cfg(feature = "sqlx-dep")]
pub use sqlx_common::*;
#[cfg(feature = "sqlx-postgres")]
pub use sqlx_postgres::*;
