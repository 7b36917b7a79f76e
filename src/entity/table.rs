//! The CRUD engine. Everything here works on a [`Schema`] and plain SQL text; the typed API on
//! [`Entity`](crate::entity::Entity) is a thin layer on top.

use sqlx::{any::AnyRow, error::DatabaseError};
use tracing::debug;

use crate::{
    connection::Database,
    entity::{schema::Schema, value::Value},
    error::{Error, Result},
    query::{
        PushToQuery,
        expression::Expression,
        statement::{CreateTable, Delete, Insert, Select, Update},
    },
};

/// Postgres' `duplicate_table` condition.
const DUPLICATE_TABLE: &str = "42P07";

/// Guards table creation inside a transaction the caller opened.
const DDL_SAVEPOINT: &str = "minorm_ddl";

/// Runs statements against the table described by a schema.
#[derive(Debug, Clone, Copy)]
pub struct Table<'s> {
    schema: &'s Schema,
}

impl<'s> Table<'s> {
    #[must_use]
    pub const fn new(schema: &'s Schema) -> Self {
        Self { schema }
    }

    #[must_use]
    pub const fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Create the table unless this connection already did (or found it) before.
    ///
    /// A table that already exists in the database counts as created: the failed statement is
    /// undone and the call succeeds. Outside a transaction the creation is committed right away.
    /// Inside one, the statement runs under a savepoint so the caller's pending work is neither
    /// committed nor discarded; the creation then stands or falls with that transaction.
    ///
    /// # Errors
    ///
    /// Any database error other than the table already existing.
    pub async fn ensure(&self, db: &mut Database) -> Result<()> {
        let table_name = self.schema.table_name();

        if db.is_table_created(table_name) {
            return Ok(());
        }

        let nested = db.in_transaction();
        if nested {
            db.execute(&format!("SAVEPOINT {DDL_SAVEPOINT};")).await?;
        }

        let query = CreateTable::new(self.schema, db.dialect()).to_sql();

        match db.execute(&query).await {
            Ok(_) => {
                if nested {
                    db.execute(&format!("RELEASE SAVEPOINT {DDL_SAVEPOINT};"))
                        .await?;
                } else {
                    db.commit().await?;
                }
                debug!("Table `{table_name}` was created successfully");
            }
            Err(Error::Database(sqlx::Error::Database(e))) if is_duplicate_table(e.as_ref()) => {
                undo_ddl(db, nested).await?;
                debug!("Table `{table_name}` was not created because it already exists");
            }
            Err(e) => {
                if nested {
                    undo_ddl(db, nested).await?;
                }
                return Err(e);
            }
        }

        db.mark_table_created(table_name);
        Ok(())
    }

    /// Insert a row and return its primary key.
    ///
    /// # Errors
    ///
    /// [`Error::InsertFailed`] with the database's message if the database rejects the row, in
    /// which case the transaction has been rolled back. Unknown columns and unsanitizable values
    /// fail before anything is sent.
    pub async fn insert<I, K>(&self, db: &mut Database, values: I) -> Result<Value>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        self.ensure(db).await?;

        let query = Insert::new(self.schema, values)?.to_sql();

        let rows = match db.execute(&query).await {
            Ok(rows) => rows,
            Err(Error::Database(sqlx::Error::Database(e))) => {
                db.rollback().await?;
                return Err(Error::InsertFailed(e.message().to_string()));
            }
            Err(e) => return Err(e),
        };

        let row = rows.as_deref().and_then(<[_]>::first).ok_or_else(|| {
            Error::InsertFailed(format!(
                "no primary key was returned for `{}`",
                self.schema.table_name()
            ))
        })?;

        self.decode_key(row)
    }

    /// Primary keys of all rows matching `filter`, at most `limit` of them.
    ///
    /// # Errors
    ///
    /// If the table cannot be created or the query fails.
    pub async fn select_keys(
        &self,
        db: &mut Database,
        filter: Option<Expression>,
        limit: Option<u64>,
    ) -> Result<Vec<Value>> {
        self.ensure(db).await?;

        let mut select = Select::keys(self.schema).filter(filter);
        if let Some(limit) = limit {
            select = select.limit(limit);
        }

        db.execute(&select.to_sql())
            .await?
            .unwrap_or_default()
            .iter()
            .map(|row| self.decode_key(row))
            .collect()
    }

    /// Delete every row matching `filter`.
    ///
    /// # Errors
    ///
    /// If the table cannot be created or the statement fails.
    pub async fn delete(&self, db: &mut Database, filter: Expression) -> Result<()> {
        self.ensure(db).await?;

        db.execute(&Delete::new(self.schema, filter).to_sql())
            .await?;
        Ok(())
    }

    /// Read one column of the row with the given primary key.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownColumn`], [`Error::RowNotFound`], or a database error.
    pub async fn read_field(&self, db: &mut Database, key: &Value, column: &str) -> Result<Value> {
        let select = Select::column(self.schema, column)?.filter(Some(self.by_key(key)?));
        let column_type = select.columns()[0].def().column_type();

        let row = self.fetch_row(db, key, &select.to_sql()).await?;
        Value::from_row(&row, 0, &column_type)
    }

    /// Overwrite one column of the row with the given primary key.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownColumn`], a sanitize error, or a database error.
    pub async fn write_field(
        &self,
        db: &mut Database,
        key: &Value,
        column: &str,
        value: Value,
    ) -> Result<()> {
        let update = Update::new(self.schema, column, value, self.by_key(key)?)?;

        db.execute(&update.to_sql()).await?;
        Ok(())
    }

    /// Read every column of the row with the given primary key.
    ///
    /// # Errors
    ///
    /// [`Error::RowNotFound`] or a database error.
    pub async fn read_row(&self, db: &mut Database, key: &Value) -> Result<AnyRow> {
        let select = Select::all_columns(self.schema).filter(Some(self.by_key(key)?));

        self.fetch_row(db, key, &select.to_sql()).await
    }

    async fn fetch_row(&self, db: &mut Database, key: &Value, query: &str) -> Result<AnyRow> {
        db.execute(query)
            .await?
            .and_then(|rows| rows.into_iter().next())
            .ok_or_else(|| Error::RowNotFound {
                table: self.schema.table_name().to_string(),
                key: key.to_string(),
            })
    }

    fn by_key(&self, key: &Value) -> Result<Expression> {
        self.schema.primary_key().eq(key.clone())
    }

    fn decode_key(&self, row: &AnyRow) -> Result<Value> {
        Value::from_row(row, 0, &self.schema.primary_key().def().column_type())
    }
}

/// Undo a failed `CREATE TABLE`, touching nothing but the statement when it ran under the
/// savepoint.
async fn undo_ddl(db: &mut Database, nested: bool) -> Result<()> {
    if nested {
        db.execute(&format!("ROLLBACK TO SAVEPOINT {DDL_SAVEPOINT};"))
            .await?;
        db.execute(&format!("RELEASE SAVEPOINT {DDL_SAVEPOINT};"))
            .await?;
        Ok(())
    } else {
        db.rollback().await
    }
}

fn is_duplicate_table(e: &dyn DatabaseError) -> bool {
    e.code().is_some_and(|code| code == DUPLICATE_TABLE) || e.message().contains("already exists")
}
