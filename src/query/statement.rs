//! The statements the CRUD engine sends to the database, rendered as plain SQL text.

use itertools::Itertools;
use sqlx::{Any, QueryBuilder};

use crate::{
    connection::Dialect,
    entity::{column::ColumnName, descriptor::BoundColumn, schema::Schema, value::Value},
    error::{Error, Result},
    query::{PushToQuery, expression::Expression},
};

fn push_table(builder: &mut QueryBuilder<'_, Any>, schema: &Schema) {
    ColumnName::new(schema.table_name().to_string()).push_to(builder);
}

/// `CREATE TABLE "t" ("c" <definition>, ...);`
pub struct CreateTable<'s> {
    schema: &'s Schema,
    dialect: Dialect,
}

impl<'s> CreateTable<'s> {
    #[must_use]
    pub const fn new(schema: &'s Schema, dialect: Dialect) -> Self {
        Self { schema, dialect }
    }
}

impl PushToQuery for CreateTable<'_> {
    fn push_to(&self, builder: &mut QueryBuilder<'_, Any>) {
        builder.push("CREATE TABLE ");
        push_table(builder, self.schema);
        builder.push(format_args!(
            " ({});",
            self.schema
                .columns()
                .iter()
                .map(|e| e.render_column(self.dialect))
                .join(", ")
        ));
    }
}

/// `INSERT INTO "t" ("c", ...) VALUES (...) RETURNING "pk";`
pub struct Insert<'s> {
    schema: &'s Schema,
    columns: Vec<&'s BoundColumn>,
    literals: Vec<String>,
}

impl<'s> Insert<'s> {
    /// Sanitize every value with its column.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownColumn`] for a name the schema does not have, or the column's sanitize
    /// error.
    pub fn new<I, K>(schema: &'s Schema, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut columns = vec![];
        let mut literals = vec![];

        for (name, value) in values {
            let column = find_column(schema, name.as_ref())?;
            literals.push(column.sanitize(value)?);
            columns.push(column);
        }

        Ok(Self {
            schema,
            columns,
            literals,
        })
    }
}

impl PushToQuery for Insert<'_> {
    fn push_to(&self, builder: &mut QueryBuilder<'_, Any>) {
        builder.push("INSERT INTO ");
        push_table(builder, self.schema);

        if self.columns.is_empty() {
            builder.push(" DEFAULT VALUES");
        } else {
            builder.push(format_args!(
                " ({}) VALUES ({})",
                self.columns
                    .iter()
                    .map(|e| ColumnName::new(e.column_name().to_string()))
                    .join(", "),
                self.literals.join(", ")
            ));
        }

        builder.push(" RETURNING ");
        ColumnName::new(self.schema.primary_key().column_name().to_string()).push_to(builder);
        builder.push(";");
    }
}

/// `SELECT "c", ... FROM "t" [WHERE ...] [LIMIT n];`
pub struct Select<'s> {
    schema: &'s Schema,
    columns: Vec<&'s BoundColumn>,
    filter: Option<Expression>,
    limit: Option<u64>,
}

impl<'s> Select<'s> {
    /// Select only the primary key.
    #[must_use]
    pub fn keys(schema: &'s Schema) -> Self {
        Self {
            schema,
            columns: vec![schema.primary_key()],
            filter: None,
            limit: None,
        }
    }

    /// Select every column, in declaration order.
    #[must_use]
    pub fn all_columns(schema: &'s Schema) -> Self {
        Self {
            schema,
            columns: schema.columns().iter().collect(),
            filter: None,
            limit: None,
        }
    }

    /// Select a single column by name.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownColumn`] if the schema has no such column.
    pub fn column(schema: &'s Schema, name: &str) -> Result<Self> {
        Ok(Self {
            schema,
            columns: vec![find_column(schema, name)?],
            filter: None,
            limit: None,
        })
    }

    #[must_use]
    pub fn filter(mut self, filter: Option<Expression>) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn columns(&self) -> &[&'s BoundColumn] {
        &self.columns
    }
}

impl PushToQuery for Select<'_> {
    fn push_to(&self, builder: &mut QueryBuilder<'_, Any>) {
        builder.push(format_args!(
            "SELECT {} FROM ",
            self.columns
                .iter()
                .map(|e| ColumnName::new(e.column_name().to_string()))
                .join(", ")
        ));
        push_table(builder, self.schema);

        if let Some(filter) = &self.filter {
            builder.push(" WHERE ");
            filter.push_to(builder);
        }

        if let Some(limit) = self.limit {
            builder.push(format_args!(" LIMIT {limit}"));
        }

        builder.push(";");
    }
}

/// `UPDATE "t" SET "c"=<value> WHERE ...;`
pub struct Update<'s> {
    schema: &'s Schema,
    column: &'s BoundColumn,
    literal: String,
    filter: Expression,
}

impl<'s> Update<'s> {
    /// # Errors
    ///
    /// [`Error::UnknownColumn`] or the column's sanitize error.
    pub fn new(schema: &'s Schema, column: &str, value: Value, filter: Expression) -> Result<Self> {
        let column = find_column(schema, column)?;

        Ok(Self {
            schema,
            column,
            literal: column.sanitize(value)?,
            filter,
        })
    }
}

impl PushToQuery for Update<'_> {
    fn push_to(&self, builder: &mut QueryBuilder<'_, Any>) {
        builder.push("UPDATE ");
        push_table(builder, self.schema);
        builder.push(" SET ");
        ColumnName::new(self.column.column_name().to_string()).push_to(builder);
        builder.push(format_args!("={} WHERE ", self.literal));
        self.filter.push_to(builder);
        builder.push(";");
    }
}

/// `DELETE FROM "t" WHERE ...;`
pub struct Delete<'s> {
    schema: &'s Schema,
    filter: Expression,
}

impl<'s> Delete<'s> {
    #[must_use]
    pub const fn new(schema: &'s Schema, filter: Expression) -> Self {
        Self { schema, filter }
    }
}

impl PushToQuery for Delete<'_> {
    fn push_to(&self, builder: &mut QueryBuilder<'_, Any>) {
        builder.push("DELETE FROM ");
        push_table(builder, self.schema);
        builder.push(" WHERE ");
        self.filter.push_to(builder);
        builder.push(";");
    }
}

fn find_column<'s>(schema: &'s Schema, name: &str) -> Result<&'s BoundColumn> {
    schema.column(name).ok_or_else(|| Error::UnknownColumn {
        table: schema.table_name().to_string(),
        column: name.to_string(),
    })
}
