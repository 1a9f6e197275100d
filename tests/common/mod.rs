#![allow(dead_code)]

use serde_json::{Map, Value, json};
use std::{
    io,
    sync::{Arc, Mutex},
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Formatted log lines collected by [capture_logs]
#[derive(Debug, Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Record warnings emitted on this thread until the guard is dropped
pub fn capture_logs() -> (tracing::subscriber::DefaultGuard, LogBuffer) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    (tracing::subscriber::set_default(subscriber), buffer)
}

/// Overwrite the keys of `row` with those of `patch`
pub fn with(mut row: Value, patch: Value) -> Value {
    if let (Some(row), Value::Object(patch)) = (row.as_object_mut(), patch) {
        row.extend(patch);
    }
    row
}

pub fn table(schema: &str, name: &str) -> Value {
    json!({
        "table_schema": schema,
        "table_name": name,
        "table_catalog": "bakery",
    })
}

pub fn column(table: &str, name: &str, data_type: &str, udt_name: &str) -> Value {
    let mut row = Map::new();
    for (key, value) in [
        ("table_schema", json!("public")),
        ("table_name", json!(table)),
        ("column_name", json!(name)),
        ("udt_name", json!(udt_name)),
        ("data_type", json!(data_type)),
        ("column_default", Value::Null),
        ("is_nullable", json!("NO")),
        ("character_maximum_length", Value::Null),
        ("numeric_precision", Value::Null),
        ("numeric_scale", Value::Null),
        ("is_serial", json!(false)),
        ("is_identity", json!("NO")),
        ("unique_count", json!(0)),
        ("enum_values", Value::Null),
    ] {
        row.insert(key.to_owned(), value);
    }
    Value::Object(row)
}

pub fn foreign_key(
    constraint_id: &str,
    owner: (&str, &str),
    related: (&str, &str),
    ordinal: i32,
) -> Value {
    json!({
        "constraint_id": constraint_id,
        "constraint_name": constraint_id.trim_end_matches(char::is_numeric),
        "owner_table": owner.0,
        "owner_column": owner.1,
        "related_table": related.0,
        "related_column": related.1,
        "ordinal": ordinal,
        "on_delete": "CASCADE",
        "on_update": "NO ACTION",
    })
}
