use super::type_mapping::{UnsupportedKind, UnsupportedType, map_column_type};
use crate::{
    Column, ColumnDefault, ColumnOptions, DbErr, EntityModel, FromQueryResult, QueryResult,
    Statement, util::escaped_object_list,
};
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

static CAST_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'::[\w ]*").unwrap());

const TYPES_WITH_PRECISION: &[&str] = &[
    "float",
    "double",
    "dec",
    "decimal",
    "numeric",
    "real",
    "double precision",
    "number",
    "datetime",
    "datetime2",
    "datetimeoffset",
    "time",
    "time with time zone",
    "time without time zone",
    "timestamp",
    "timestamp without time zone",
    "timestamp with time zone",
    "timestamp with local time zone",
];

const TYPES_WITH_LENGTH: &[&str] = &[
    "character varying",
    "varying character",
    "nvarchar",
    "national varchar",
    "character",
    "native character",
    "varchar",
    "char",
    "nchar",
    "national char",
    "varchar2",
    "nvarchar2",
    "raw",
    "binary",
    "varbinary",
    "string",
];

const TYPES_WITH_WIDTH: &[&str] = &["tinyint", "smallint", "mediumint", "int", "bigint"];

/// One row of `information_schema.columns`, with uniqueness and enum labels
/// resolved by subqueries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ColumnRow {
    pub table_schema: String,
    pub table_name: String,
    pub column_name: String,
    pub udt_name: String,
    pub data_type: String,
    pub column_default: Option<String>,
    pub is_nullable: String,
    pub character_maximum_length: Option<i32>,
    pub numeric_precision: Option<i32>,
    pub numeric_scale: Option<i32>,
    /// Default advances a sequence, i.e. a `serial` column
    pub is_serial: bool,
    pub is_identity: Option<String>,
    /// Single-column UNIQUE constraints on this column
    pub unique_count: i32,
    pub enum_values: Option<String>,
}

impl FromQueryResult for ColumnRow {
    fn from_query_result(res: &QueryResult) -> Result<Self, DbErr> {
        Ok(Self {
            table_schema: res.try_get("table_schema")?,
            table_name: res.try_get("table_name")?,
            column_name: res.try_get("column_name")?,
            udt_name: res.try_get("udt_name")?,
            data_type: res.try_get("data_type")?,
            column_default: res.try_get("column_default")?,
            is_nullable: res.try_get("is_nullable")?,
            character_maximum_length: res.try_get("character_maximum_length")?,
            numeric_precision: res.try_get("numeric_precision")?,
            numeric_scale: res.try_get("numeric_scale")?,
            is_serial: res.try_get("is_serial")?,
            is_identity: res.try_get("is_identity")?,
            unique_count: res.try_get("unique_count")?,
            enum_values: res.try_get("enum_values")?,
        })
    }
}

pub(crate) fn columns_query(schemas: &[String]) -> Statement {
    Statement::from_string(format!(
        r#"SELECT c.table_schema::text AS table_schema,
    c.table_name::text AS table_name,
    c.column_name::text AS column_name,
    c.udt_name::text AS udt_name,
    c.data_type::text AS data_type,
    c.column_default::text AS column_default,
    c.is_nullable::text AS is_nullable,
    c.character_maximum_length::int4 AS character_maximum_length,
    c.numeric_precision::int4 AS numeric_precision,
    c.numeric_scale::int4 AS numeric_scale,
    COALESCE(c.column_default LIKE 'nextval%', false) AS is_serial,
    c.is_identity::text AS is_identity,
    (SELECT count(*)
        FROM information_schema.table_constraints tc
        INNER JOIN information_schema.constraint_column_usage cu
            ON cu.constraint_name = tc.constraint_name
            AND cu.constraint_schema = tc.constraint_schema
        WHERE tc.constraint_type = 'UNIQUE'
            AND tc.table_name = c.table_name
            AND tc.table_schema = c.table_schema
            AND cu.column_name = c.column_name
            AND (SELECT count(*)
                FROM information_schema.constraint_column_usage cu2
                WHERE cu2.constraint_name = tc.constraint_name
                    AND cu2.constraint_schema = tc.constraint_schema) = 1
    )::int4 AS unique_count,
    (SELECT string_agg(e.enumlabel::text, ',' ORDER BY e.enumsortorder)
        FROM pg_enum e
        INNER JOIN pg_type t ON t.oid = e.enumtypid
        INNER JOIN pg_namespace n ON n.oid = t.typnamespace
        WHERE n.nspname = c.table_schema AND t.typname = c.udt_name
    ) AS enum_values
FROM information_schema.columns c
WHERE c.table_schema IN ({})
ORDER BY c.ordinal_position"#,
        escaped_object_list(schemas)
    ))
}

/// Add one [Column] per row to the entity it belongs to. Rows of tables
/// outside the model (e.g. views) are ignored, and rows whose type cannot be
/// mapped are skipped with a warning.
pub(crate) fn apply_columns(model: &mut EntityModel, rows: Vec<ColumnRow>) {
    for row in rows {
        let Some(id) = model.find_qualified(&row.table_schema, &row.table_name) else {
            continue;
        };
        match build_column(&row) {
            Ok(column) => model.entity_mut(id).columns.push(column),
            Err(err) => report_unsupported(&row, &err),
        }
    }
}

pub(crate) fn build_column(row: &ColumnRow) -> Result<Column, UnsupportedType> {
    let mapped = map_column_type(&row.data_type, &row.udt_name, row.enum_values.as_deref())?;

    let generated = row.is_serial || row.is_identity.as_deref() == Some("YES");
    let default = if generated {
        None
    } else {
        column_default(row.column_default.as_deref(), &row.data_type)
    };

    let col_type = mapped.col_type.as_str();
    let positive = |v: Option<i32>| v.and_then(|v| u32::try_from(v).ok()).filter(|v| *v > 0);
    let mut options = ColumnOptions {
        name: Some(row.column_name.clone()),
        nullable: row.is_nullable == "YES",
        unique: row.unique_count > 0,
        array: mapped.is_array,
        enum_values: mapped.enum_values.clone(),
        ..Default::default()
    };
    if TYPES_WITH_PRECISION.contains(&col_type) {
        options.precision = row.numeric_precision.and_then(|v| u32::try_from(v).ok());
        options.scale = row.numeric_scale.and_then(|v| u32::try_from(v).ok());
    }
    if TYPES_WITH_LENGTH.contains(&col_type) {
        options.length = positive(row.character_maximum_length);
    }
    if TYPES_WITH_WIDTH.contains(&col_type) {
        options.width = positive(row.character_maximum_length);
    }

    Ok(Column::new(
        row.column_name.as_str(),
        mapped.field_type(),
        col_type,
        generated,
        default,
        options,
    ))
}

/// Default value as code generation should emit it: the cast suffix is
/// dropped, JSON payloads lose their outer quotes, anything else is kept as
/// an expression
pub(crate) fn column_default(raw: Option<&str>, data_type: &str) -> Option<ColumnDefault> {
    let raw = raw.filter(|raw| !raw.is_empty())?;
    let value = CAST_SUFFIX.replace(raw, "'");
    if matches!(data_type, "json" | "jsonb") {
        let mut chars = value.chars();
        chars.next();
        chars.next_back();
        Some(ColumnDefault::Json(chars.as_str().to_owned()))
    } else {
        Some(ColumnDefault::Expression(value.into_owned()))
    }
}

fn report_unsupported(row: &ColumnRow, err: &UnsupportedType) {
    match err.kind {
        UnsupportedKind::UserDefined | UnsupportedKind::Array => warn!(
            table = %row.table_name,
            column = %row.column_name,
            "Unknown {} column type: {}",
            row.data_type,
            row.udt_name
        ),
        UnsupportedKind::Unrecognized => warn!(
            table = %row.table_name,
            column = %row.column_name,
            "Unknown column type: {}",
            row.data_type
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Entity, FieldType, GenericType};
    use pretty_assertions::assert_eq;

    fn row(name: &str, data_type: &str, udt_name: &str) -> ColumnRow {
        ColumnRow {
            table_schema: "public".to_owned(),
            table_name: "post".to_owned(),
            column_name: name.to_owned(),
            udt_name: udt_name.to_owned(),
            data_type: data_type.to_owned(),
            is_nullable: "NO".to_owned(),
            is_identity: Some("NO".to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn serial_and_identity_are_generated() {
        let serial = ColumnRow {
            column_default: Some("nextval('post_id_seq'::regclass)".to_owned()),
            is_serial: true,
            ..row("id", "integer", "int4")
        };
        let col = build_column(&serial).unwrap();
        assert!(col.is_generated());
        assert_eq!(col.default(), None);

        let identity = ColumnRow {
            is_identity: Some("YES".to_owned()),
            ..row("id", "bigint", "int8")
        };
        let col = build_column(&identity).unwrap();
        assert!(col.is_generated());
        assert_eq!(col.options().width, None);
    }

    #[test]
    fn varchar_options() {
        let col = build_column(&ColumnRow {
            is_nullable: "YES".to_owned(),
            character_maximum_length: Some(120),
            unique_count: 1,
            column_default: Some("'draft'::character varying".to_owned()),
            ..row("title", "character varying", "varchar")
        })
        .unwrap();
        assert_eq!(col.name(), "title");
        assert_eq!(col.col_type(), "character varying");
        assert_eq!(col.field_type(), &FieldType::new(GenericType::String));
        assert_eq!(
            col.options(),
            &ColumnOptions {
                name: Some("title".to_owned()),
                nullable: true,
                unique: true,
                length: Some(120),
                ..Default::default()
            }
        );
        assert_eq!(
            col.default(),
            Some(&ColumnDefault::Expression("'draft'".to_owned()))
        );
    }

    #[test]
    fn non_positive_length_is_omitted() {
        for len in [None, Some(0), Some(-1)] {
            let col = build_column(&ColumnRow {
                character_maximum_length: len,
                ..row("code", "character", "bpchar")
            })
            .unwrap();
            assert_eq!(col.options().length, None);
        }
    }

    #[test]
    fn integer_width() {
        for (data_type, udt_name, width) in [("smallint", "int2", 4), ("bigint", "int8", 8)] {
            let col = build_column(&ColumnRow {
                character_maximum_length: Some(width),
                ..row("quantity", data_type, udt_name)
            })
            .unwrap();
            assert_eq!(col.options().width, Some(width as u32));
            assert_eq!(col.options().length, None);
        }

        for len in [None, Some(0), Some(-1)] {
            let col = build_column(&ColumnRow {
                character_maximum_length: len,
                ..row("quantity", "bigint", "int8")
            })
            .unwrap();
            assert_eq!(col.options().width, None);
        }
    }

    #[test]
    fn numeric_precision_and_scale() {
        let col = build_column(&ColumnRow {
            numeric_precision: Some(10),
            numeric_scale: Some(2),
            ..row("price", "numeric", "numeric")
        })
        .unwrap();
        assert_eq!(col.options().precision, Some(10));
        assert_eq!(col.options().scale, Some(2));
        assert_eq!(col.options().length, None);

        let col =
            build_column(&row("created_at", "timestamp with time zone", "timestamptz")).unwrap();
        assert_eq!(col.options().precision, None);
        assert_eq!(col.field_type().to_string(), "Date");
    }

    #[test]
    fn enum_and_array_columns() {
        let col = build_column(&ColumnRow {
            enum_values: Some("sad,ok,happy".to_owned()),
            ..row("mood", "USER-DEFINED", "mood")
        })
        .unwrap();
        assert_eq!(col.col_type(), "enum");
        assert_eq!(col.options().enum_values, vec!["sad", "ok", "happy"]);
        assert_eq!(col.field_type().to_string(), r#""sad" | "ok" | "happy""#);

        let col = build_column(&row("tags", "ARRAY", "_varchar")).unwrap();
        assert!(col.options().array);
        assert_eq!(col.col_type(), "varchar");
        assert_eq!(col.field_type().to_string(), "string[]");
    }

    #[test]
    fn defaults() {
        assert_eq!(column_default(None, "text"), None);
        assert_eq!(column_default(Some(""), "text"), None);
        assert_eq!(
            column_default(Some("'{}'::jsonb"), "jsonb"),
            Some(ColumnDefault::Json("{}".to_owned()))
        );
        assert_eq!(
            column_default(Some(r#"'{"a": 1}'::json"#), "json"),
            Some(ColumnDefault::Json(r#"{"a": 1}"#.to_owned()))
        );
        assert_eq!(
            column_default(Some("now()"), "timestamp with time zone"),
            Some(ColumnDefault::Expression("now()".to_owned()))
        );
        assert_eq!(
            column_default(Some("0"), "integer").map(|d| d.to_string()),
            Some(r#"() => "0""#.to_owned())
        );
        assert_eq!(
            column_default(Some("'a'::text || 'b'::text"), "text"),
            Some(ColumnDefault::Expression("'a'|| 'b'::text".to_owned()))
        );
    }

    #[test]
    fn rows_join_by_table_and_skip_unknown_types() {
        let mut model = EntityModel::new();
        let post = model.push_entity(Entity::new("post", "public", None));
        let view_row = ColumnRow {
            table_name: "post_view".to_owned(),
            ..row("id", "integer", "int4")
        };
        apply_columns(
            &mut model,
            vec![
                row("id", "integer", "int4"),
                view_row,
                row("lsn", "pg_lsn", "pg_lsn"),
                row("shape", "USER-DEFINED", "complex"),
                row("body", "text", "text"),
            ],
        );
        let names: Vec<_> = model.entity(post).columns().iter().map(Column::name).collect();
        assert_eq!(names, vec!["id", "body"]);
    }
}
