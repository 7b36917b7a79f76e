#![allow(clippy::unwrap_used)]

use minorm::{
    Entity, SchemaError,
    connection::Dialect,
    entity::{
        column::{Column, ComparableColumn},
        descriptor::ColumnType,
    },
    query::{PushToQuery, statement::CreateTable},
};
use minorm_sqlparse::query::parse_create_table;

use crate::models::{bad_table_name, counter, quote, student};

#[test]
fn test_derived_schema() {
    let schema = student::Entity::schema().unwrap();

    assert_eq!(schema.table_name(), "student");
    assert_eq!(schema.model(), "minorm_tests::models::student::Model");
    assert_eq!(schema.primary_key().column_name(), "id");
    assert_eq!(
        schema
            .columns()
            .iter()
            .map(|e| e.column_name())
            .collect::<Vec<_>>(),
        student::Entity::COLUMN_NAMES
    );

    let name = schema.column("name").unwrap();
    assert_eq!(name.def().column_type(), ColumnType::String { max_length: 20 });
    assert!(!name.def().is_nullable());
    assert!(schema.column("age").unwrap().def().is_nullable());

    // The same cached schema every time.
    assert!(std::ptr::eq(schema, student::Entity::schema().unwrap()));
}

#[test]
fn test_column_attributes() {
    assert_eq!(quote::columns::Text::NAME, "quote_text");
    assert_eq!(
        quote::columns::Slug::def().column_type(),
        ColumnType::String { max_length: 40 }
    );
    assert_eq!(counter::Entity::TABLE_NAME, "counter_row");
    assert_eq!(
        quote::columns::Year::full_column_name().to_string(),
        r#""quotes"."year""#
    );
}

#[test]
fn test_typed_expressions() {
    assert_eq!(
        student::columns::Age::gt(Some(20)).to_string(),
        r#""student"."age">20"#
    );
    assert_eq!(
        student::columns::Name::eq("O'Neil".to_string()).to_string(),
        r#""student"."name"='O''Neil'"#
    );
    assert_eq!(
        student::columns::Age::eq(None).to_string(),
        r#""student"."age" IS NULL"#
    );
    assert_eq!(
        student::columns::Age::not_eq(None).to_string(),
        r#""student"."age" IS NOT NULL"#
    );
    assert_eq!(
        student::columns::Age::not_eq(Some(3)).to_string(),
        r#""student"."age"!=3"#
    );
}

#[test]
fn test_find_query() {
    let query = student::Entity::find()
        .filter(student::columns::Age::gt(Some(20)))
        .filter(student::columns::Name::not_eq("A".to_string()))
        .query()
        .unwrap();

    assert_eq!(
        query,
        r#"SELECT "id" FROM "student" WHERE ("student"."age">20) AND ("student"."name"!='A');"#
    );
}

#[test]
fn test_invalid_table_name() {
    assert!(matches!(
        bad_table_name::Entity::schema(),
        Err(SchemaError::InvalidTableName { .. })
    ));
    assert!(bad_table_name::Entity::find().query().is_err());
}

#[tokio::test]
async fn test_invalid_model_never_reaches_the_database() {
    let mut db = minorm::Database::connect("sqlite::memory:").await.unwrap();

    let result = bad_table_name::Entity::get_many(&mut db, None).await;

    assert!(matches!(
        result,
        Err(minorm::Error::Schema(SchemaError::InvalidTableName { .. }))
    ));
    assert!(!db.in_transaction());
}

#[test]
fn test_create_table_parses_back() {
    let schema = student::Entity::schema().unwrap();

    for dialect in [Dialect::Sqlite, Dialect::Postgres] {
        let sql = CreateTable::new(schema, dialect).to_sql();
        let table = parse_create_table(&sql).unwrap();

        assert_eq!(table.name, "student");
        assert_eq!(table.primary_key.as_deref(), Some("id"));
        assert_eq!(table.find_column("name").unwrap().max_length(), Some(20));
        assert!(!table.find_column("name").unwrap().nullable);
        assert!(table.find_column("age").unwrap().nullable);
    }
}
