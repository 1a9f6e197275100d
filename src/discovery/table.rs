use crate::{DbErr, Entity, EntityModel, FromQueryResult, QueryResult, Statement};
use sea_query::{Alias, Expr, Func, PostgresQueryBuilder, Query};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TableRow {
    pub table_schema: String,
    pub table_name: String,
    pub table_catalog: Option<String>,
}

impl FromQueryResult for TableRow {
    fn from_query_result(res: &QueryResult) -> Result<Self, DbErr> {
        Ok(Self {
            table_schema: res.try_get("table_schema")?,
            table_name: res.try_get("table_name")?,
            table_catalog: res.try_get("table_catalog")?,
        })
    }
}

/// Base tables (views excluded) of the given schemas
pub(crate) fn tables_query(schemas: &[String]) -> Statement {
    let text = |col: &str| Func::cast_as(Expr::col(Alias::new(col)), Alias::new("text"));
    let query = Query::select()
        .expr_as(text("table_schema"), Alias::new("table_schema"))
        .expr_as(text("table_name"), Alias::new("table_name"))
        .expr_as(text("table_catalog"), Alias::new("table_catalog"))
        .from((Alias::new("information_schema"), Alias::new("tables")))
        .and_where(Expr::col(Alias::new("table_type")).eq("BASE TABLE"))
        .and_where(Expr::col(Alias::new("table_schema")).is_in(schemas.iter().map(String::as_str)))
        .to_owned();
    Statement::from_string(query.to_string(PostgresQueryBuilder))
}

pub(crate) fn apply_tables(model: &mut EntityModel, rows: Vec<TableRow>) {
    for row in rows {
        model.push_entity(Entity::new(row.table_name, row.table_schema, row.table_catalog));
    }
}
