use crate::{
    DbErr, EntityModel, FromQueryResult, Index, IndexOptions, QueryResult, Statement,
    util::{escaped_object_list, group_by_ordered},
};

/// One (index, column) membership of a regular table
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IndexRow {
    pub table_schema: String,
    pub table_name: String,
    pub index_name: String,
    pub column_name: String,
    pub is_unique: bool,
    pub is_primary: bool,
}

impl FromQueryResult for IndexRow {
    fn from_query_result(res: &QueryResult) -> Result<Self, DbErr> {
        Ok(Self {
            table_schema: res.try_get("table_schema")?,
            table_name: res.try_get("table_name")?,
            index_name: res.try_get("index_name")?,
            column_name: res.try_get("column_name")?,
            is_unique: res.try_get("is_unique")?,
            is_primary: res.try_get("is_primary")?,
        })
    }
}

pub(crate) fn indexes_query(schemas: &[String]) -> Statement {
    Statement::from_string(format!(
        r#"SELECT n.nspname::text AS table_schema,
    c.relname::text AS table_name,
    i.relname::text AS index_name,
    f.attname::text AS column_name,
    ix.indisunique AS is_unique,
    ix.indisprimary AS is_primary
FROM pg_index ix
INNER JOIN pg_class c ON c.oid = ix.indrelid
INNER JOIN pg_class i ON i.oid = ix.indexrelid
INNER JOIN pg_namespace n ON n.oid = c.relnamespace
INNER JOIN pg_attribute f ON f.attrelid = c.oid AND f.attnum = ANY(ix.indkey)
WHERE c.relkind = 'r'
    AND n.nspname IN ({})
    AND f.attnum > 0
ORDER BY c.relname, i.relname, array_position(ix.indkey::int2[], f.attnum)"#,
        escaped_object_list(schemas)
    ))
}

/// Group rows by table and index name; each group becomes one [Index] with
/// its columns in key order
pub(crate) fn apply_indexes(model: &mut EntityModel, rows: Vec<IndexRow>) {
    let groups = group_by_ordered(rows, |row| {
        (
            row.table_schema.clone(),
            row.table_name.clone(),
            row.index_name.clone(),
        )
    });
    for ((schema, table, name), rows) in groups {
        let Some(id) = model.find_qualified(&schema, &table) else {
            continue;
        };
        let index = Index {
            name,
            primary: rows.iter().any(|row| row.is_primary),
            options: IndexOptions {
                unique: rows.iter().any(|row| row.is_unique),
            },
            columns: rows.into_iter().map(|row| row.column_name).collect(),
        };
        model.entity_mut(id).indices.push(index);
    }
}
