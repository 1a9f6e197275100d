#![cfg(feature = "sqlx-postgres")]

pub mod common;

use entity_discovery::{
    ConnectionTrait, Database, DatabaseConnection, DiscoveryOptions, SchemaDiscovery, Statement,
};
use pretty_assertions::assert_eq;

const SCHEMA: &str = "entity_discovery_test";

/// Run against the server in `DATABASE_URL`; skipped when it is not set
async fn setup() -> Option<DatabaseConnection> {
    common::init_tracing();
    let url = std::env::var("DATABASE_URL").ok()?;
    let db = Database::connect(url).await.unwrap();
    for sql in [
        format!("DROP SCHEMA IF EXISTS {SCHEMA} CASCADE"),
        format!("CREATE SCHEMA {SCHEMA}"),
        format!("CREATE TYPE {SCHEMA}.mood AS ENUM ('sad', 'ok', 'happy')"),
        format!(
            "CREATE TABLE {SCHEMA}.account (
                id serial PRIMARY KEY,
                email varchar(255) NOT NULL UNIQUE,
                mood {SCHEMA}.mood,
                tags text[],
                meta jsonb DEFAULT '{{}}'::jsonb
            )"
        ),
        format!(
            "CREATE TABLE {SCHEMA}.order_line (
                order_id int NOT NULL,
                line_no smallint NOT NULL,
                PRIMARY KEY (order_id, line_no)
            )"
        ),
        format!(
            "CREATE TABLE {SCHEMA}.shipment (
                id bigint GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
                account_id int REFERENCES {SCHEMA}.account (id) ON DELETE CASCADE,
                order_id int NOT NULL,
                line_no smallint NOT NULL,
                FOREIGN KEY (order_id, line_no) REFERENCES {SCHEMA}.order_line (order_id, line_no)
            )"
        ),
    ] {
        db.query_all(Statement::from_string(sql)).await.unwrap();
    }
    Some(db)
}

#[tokio::test]
async fn discover_live_schema() {
    let Some(db) = setup().await else {
        return;
    };
    let discovery = SchemaDiscovery::new(&db, DiscoveryOptions::new([SCHEMA]));
    let model = discovery.discover().await.unwrap();

    let mut names: Vec<_> = model.entities().iter().map(|e| e.name()).collect();
    names.sort();
    assert_eq!(names, vec!["account", "order_line", "shipment"]);

    let account = model.entity(model.find_entity("account").unwrap());
    assert!(account.find_column("id").unwrap().is_generated());
    assert_eq!(account.find_column("email").unwrap().options().length, Some(255));
    assert!(account.find_column("email").unwrap().options().unique);
    assert_eq!(
        account.find_column("mood").unwrap().options().enum_values,
        vec!["sad", "ok", "happy"]
    );
    assert_eq!(account.find_column("tags").unwrap().field_type().to_string(), "string[]");

    let shipment = model.find_entity("shipment").unwrap();
    assert!(model.entity(shipment).find_column("id").unwrap().is_generated());
    let composite = model
        .relations()
        .iter()
        .find(|r| r.owner_columns().len() == 2)
        .unwrap();
    assert_eq!(composite.owner_table(), shipment);
    assert_eq!(composite.owner_columns(), &["order_id".to_owned(), "line_no".to_owned()]);
    assert_eq!(composite.related_columns(), &["order_id".to_owned(), "line_no".to_owned()]);

    let line = model.entity(model.find_entity("order_line").unwrap());
    assert_eq!(
        line.primary_key().unwrap().columns(),
        &["order_id".to_owned(), "line_no".to_owned()]
    );

    assert!(!discovery.database_exists("entity_discovery_missing").await.unwrap());

    db.query_all(Statement::from_string(format!("DROP SCHEMA {SCHEMA} CASCADE")))
        .await
        .unwrap();
}
