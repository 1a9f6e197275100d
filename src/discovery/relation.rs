use crate::{
    DbErr, EntityModel, ForeignKeyAction, FromQueryResult, QueryResult, RelationInternal,
    Statement,
    util::{escaped_object_list, group_by_ordered},
};
use itertools::Itertools;
use std::str::FromStr;
use tracing::{debug, warn};

/// One (owner column, referenced column) pair of a foreign key
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RelationRow {
    /// `conname || conrelid || confrelid`, unique across tables
    pub constraint_id: String,
    pub constraint_name: String,
    pub owner_table: String,
    pub owner_column: String,
    pub related_table: String,
    pub related_column: String,
    /// 1-based position of the pair inside the constraint
    pub ordinal: i32,
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
}

impl FromQueryResult for RelationRow {
    fn from_query_result(res: &QueryResult) -> Result<Self, DbErr> {
        Ok(Self {
            constraint_id: res.try_get("constraint_id")?,
            constraint_name: res.try_get("constraint_name")?,
            owner_table: res.try_get("owner_table")?,
            owner_column: res.try_get("owner_column")?,
            related_table: res.try_get("related_table")?,
            related_column: res.try_get("related_column")?,
            ordinal: res.try_get("ordinal")?,
            on_delete: res.try_get("on_delete")?,
            on_update: res.try_get("on_update")?,
        })
    }
}

pub(crate) fn relations_query(schemas: &[String]) -> Statement {
    Statement::from_string(format!(
        r#"SELECT DISTINCT
    concat(con.conname, con.conrelid, con.confrelid) AS constraint_id,
    con.conname::text AS constraint_name,
    con.owner_table::text AS owner_table,
    att2.attname::text AS owner_column,
    cl.relname::text AS related_table,
    att.attname::text AS related_column,
    con.ordinality::int4 AS ordinal,
    rc.delete_rule::text AS on_delete,
    rc.update_rule::text AS on_update
FROM (
    SELECT k.parent, k.child, k.ordinality, con1.confrelid, con1.conrelid,
        cl_1.relname AS owner_table, con1.conname, ns.nspname
    FROM pg_constraint con1
    INNER JOIN pg_class cl_1 ON cl_1.oid = con1.conrelid
    INNER JOIN pg_namespace ns ON ns.oid = cl_1.relnamespace
    CROSS JOIN LATERAL unnest(con1.conkey, con1.confkey)
        WITH ORDINALITY AS k(parent, child, ordinality)
    WHERE con1.contype = 'f'
        AND ns.nspname IN ({})
) con
INNER JOIN pg_attribute att ON att.attrelid = con.confrelid AND att.attnum = con.child
INNER JOIN pg_class cl ON cl.oid = con.confrelid
INNER JOIN pg_attribute att2 ON att2.attrelid = con.conrelid AND att2.attnum = con.parent
INNER JOIN information_schema.referential_constraints rc
    ON rc.constraint_name = con.conname
    AND rc.constraint_catalog = current_database()
    AND rc.constraint_schema = con.nspname
ORDER BY constraint_id, ordinal"#,
        escaped_object_list(schemas)
    ))
}

/// Group foreign key rows by constraint identity and attach one relation per
/// group to both tables. Groups referring to a table outside the model are
/// dropped with a warning.
pub(crate) fn apply_relations(model: &mut EntityModel, rows: Vec<RelationRow>) {
    let rows = rows.into_iter().unique_by(|row| {
        (
            row.constraint_id.clone(),
            row.ordinal,
            row.owner_column.clone(),
            row.related_column.clone(),
        )
    });
    let groups = group_by_ordered(rows, |row| row.constraint_id.clone());

    for (constraint_id, mut rows) in groups {
        rows.sort_by_key(|row| row.ordinal);
        let first = &rows[0];
        let (Some(owner), Some(related)) = (
            model.find_entity(&first.owner_table),
            model.find_entity(&first.related_table),
        ) else {
            warn!(
                constraint = %first.constraint_name,
                "Relation between tables {} and {} wasn't found in entity model.",
                first.owner_table,
                first.related_table
            );
            continue;
        };
        debug!(%constraint_id, columns = rows.len(), "Foreign key resolved");

        let relation = RelationInternal {
            name: first.constraint_name.clone(),
            owner_table: owner,
            related_table: related,
            on_delete: referential_action(first.on_delete.as_deref()),
            on_update: referential_action(first.on_update.as_deref()),
            owner_columns: rows.iter().map(|row| row.owner_column.clone()).collect(),
            related_columns: rows.into_iter().map(|row| row.related_column).collect(),
        };
        model.push_relation(relation);
    }
}

fn referential_action(rule: Option<&str>) -> Option<ForeignKeyAction> {
    let rule = rule?;
    match ForeignKeyAction::from_str(rule) {
        Ok(action) => Some(action),
        Err(_) => {
            warn!(rule, "Unknown referential action");
            None
        }
    }
}
