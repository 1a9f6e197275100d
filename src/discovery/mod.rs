//! Catalog discovery for PostgreSQL.
//!
//! Tables are listed first; columns, indexes and foreign keys are then read
//! from the catalog and joined onto the listed tables.

mod column;
mod index;
mod relation;
mod table;
pub mod type_mapping;

use crate::{ConnectionTrait, DbErr, DiscoveryOptions, EntityModel, FromQueryResult, Statement};
use column::{ColumnRow, apply_columns, columns_query};
use index::{IndexRow, apply_indexes, indexes_query};
use relation::{RelationRow, apply_relations, relations_query};
use sea_query::{Alias, Expr, PostgresQueryBuilder, Query};
use table::{TableRow, apply_tables, tables_query};
use tracing::{debug, instrument};

/// Reads the catalog of one database through a [ConnectionTrait]
#[derive(Debug)]
pub struct SchemaDiscovery<'c, C>
where
    C: ConnectionTrait,
{
    conn: &'c C,
    options: DiscoveryOptions,
}

impl<'c, C> SchemaDiscovery<'c, C>
where
    C: ConnectionTrait,
{
    pub fn new(conn: &'c C, options: DiscoveryOptions) -> Self {
        Self { conn, options }
    }

    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    /// Discover every base table of the configured schemas with its columns,
    /// indexes and foreign keys
    #[instrument(skip_all, fields(schemas = ?self.options.schemas))]
    pub async fn discover(&self) -> Result<EntityModel, DbErr> {
        let mut model = EntityModel::new();
        self.discover_tables(&mut model).await?;

        let schemas = self.schemas()?;
        let (columns, indexes, relations) = futures_util::try_join!(
            self.fetch::<ColumnRow>(columns_query(schemas)),
            self.fetch::<IndexRow>(indexes_query(schemas)),
            self.fetch::<RelationRow>(relations_query(schemas)),
        )?;
        apply_columns(&mut model, columns);
        apply_indexes(&mut model, indexes);
        apply_relations(&mut model, relations);

        debug!(
            tables = model.len(),
            relations = model.relations().len(),
            "Discovery finished"
        );
        Ok(model)
    }

    /// Add one entity per base table
    #[instrument(skip_all)]
    pub async fn discover_tables(&self, model: &mut EntityModel) -> Result<(), DbErr> {
        let rows = self.fetch::<TableRow>(tables_query(self.schemas()?)).await?;
        debug!(tables = rows.len(), "Tables listed");
        apply_tables(model, rows);
        Ok(())
    }

    #[instrument(skip_all)]
    pub async fn discover_columns(&self, model: &mut EntityModel) -> Result<(), DbErr> {
        let rows = self.fetch::<ColumnRow>(columns_query(self.schemas()?)).await?;
        apply_columns(model, rows);
        Ok(())
    }

    #[instrument(skip_all)]
    pub async fn discover_indexes(&self, model: &mut EntityModel) -> Result<(), DbErr> {
        let rows = self.fetch::<IndexRow>(indexes_query(self.schemas()?)).await?;
        apply_indexes(model, rows);
        Ok(())
    }

    #[instrument(skip_all)]
    pub async fn discover_relations(&self, model: &mut EntityModel) -> Result<(), DbErr> {
        let rows = self.fetch::<RelationRow>(relations_query(self.schemas()?)).await?;
        apply_relations(model, rows);
        Ok(())
    }

    /// Whether a database with this name exists on the server
    #[instrument(skip(self))]
    pub async fn database_exists(&self, name: &str) -> Result<bool, DbErr> {
        let query = Query::select()
            .column(Alias::new("datname"))
            .from(Alias::new("pg_database"))
            .and_where(Expr::col(Alias::new("datname")).eq(name))
            .to_owned();
        let stmt = Statement::from_string(query.to_string(PostgresQueryBuilder));
        Ok(self.conn.query_one(stmt).await?.is_some())
    }

    /// [SchemaDiscovery::database_exists] for the configured database name
    pub async fn configured_database_exists(&self) -> Result<bool, DbErr> {
        match &self.options.database {
            Some(name) => self.database_exists(name).await,
            None => Err(DbErr::Config("no database name configured".to_owned())),
        }
    }

    fn schemas(&self) -> Result<&[String], DbErr> {
        if self.options.schemas.is_empty() {
            return Err(DbErr::Config("no schema to discover".to_owned()));
        }
        Ok(&self.options.schemas)
    }

    async fn fetch<T: FromQueryResult>(&self, stmt: Statement) -> Result<Vec<T>, DbErr> {
        let rows = self.conn.query_all(stmt).await?;
        T::from_query_results(&rows)
    }
}
