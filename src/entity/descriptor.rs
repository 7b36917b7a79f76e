//! Runtime column descriptors.
//!
//! A [`ColumnDef`] is what a model declares for a field; binding it to a column and table name
//! yields a [`BoundColumn`], which is what the rest of the crate works with.

use std::fmt::Display;

use crate::{
    connection::Dialect,
    entity::{
        column::ColumnName,
        value::Value,
    },
    error::{Error, Result},
    query::{Operator, expression::Expression},
};

pub const DEFAULT_STRING_LENGTH: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    String { max_length: u32 },
}

impl ColumnType {
    /// A bounded string type, falling back to [`DEFAULT_STRING_LENGTH`].
    #[must_use]
    pub fn string(max_length: Option<u32>) -> Self {
        Self::String {
            max_length: max_length.unwrap_or(DEFAULT_STRING_LENGTH),
        }
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => write!(f, "INTEGER"),
            Self::String { max_length } => write!(f, "VARCHAR({max_length})"),
        }
    }
}

/// A column as declared on a model, before it knows its own name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    column_type: ColumnType,
    nullable: bool,
    primary_key: bool,
}

impl ColumnDef {
    #[must_use]
    pub const fn new(column_type: ColumnType, nullable: bool) -> Self {
        Self {
            column_type,
            nullable,
            primary_key: false,
        }
    }

    #[must_use]
    pub const fn integer() -> Self {
        Self::new(ColumnType::Integer, false)
    }

    #[must_use]
    pub const fn string(max_length: u32) -> Self {
        Self::new(ColumnType::String { max_length }, false)
    }

    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        self.column_type
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// The DDL fragment for this column, without its name: `<type> [PRIMARY KEY | NOT NULL]`.
    ///
    /// Integer primary keys render as the dialect's auto-incrementing type.
    #[must_use]
    pub fn render_definition(&self, dialect: Dialect) -> String {
        if self.primary_key {
            return match (self.column_type, dialect) {
                (ColumnType::Integer, Dialect::Postgres) => "SERIAL PRIMARY KEY".to_string(),
                (column_type, _) => format!("{column_type} PRIMARY KEY"),
            };
        }

        if self.nullable {
            self.column_type.to_string()
        } else {
            format!("{} NOT NULL", self.column_type)
        }
    }

    /// Convert a host value to the shape this column stores.
    ///
    /// Integer columns accept text holding a number; string columns take integers as their
    /// decimal text. `Null` passes through.
    ///
    /// # Errors
    ///
    /// [`Error::Sanitize`] if an integer column is handed non-numeric text.
    pub fn coerce(&self, value: Value) -> Result<Value> {
        match (self.column_type, value) {
            (ColumnType::Integer, Value::Text(text)) => text
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| Error::Sanitize {
                    value: format!("{text:?}"),
                    column_type: self.column_type.to_string(),
                }),
            (ColumnType::String { .. }, Value::Integer(e)) => Ok(Value::Text(e.to_string())),
            (_, value) => Ok(value),
        }
    }

    /// Turn a host value into a SQL literal for this column, after [`ColumnDef::coerce`].
    ///
    /// This escapes single quotes and nothing else.
    ///
    /// # Errors
    ///
    /// [`Error::Sanitize`] if an integer column is handed non-numeric text.
    pub fn sanitize(&self, value: Value) -> Result<String> {
        Ok(self.coerce(value)?.to_literal())
    }

    /// Attach the column and table names. Consumes the declaration, so a column is named
    /// exactly once.
    #[must_use]
    pub fn bind(self, column_name: impl Into<String>, table_name: impl Into<String>) -> BoundColumn {
        BoundColumn {
            def: self,
            column_name: column_name.into(),
            table_name: table_name.into(),
        }
    }
}

/// A column that knows which table it belongs to.
#[derive(Debug, Clone)]
pub struct BoundColumn {
    def: ColumnDef,
    column_name: String,
    table_name: String,
}

impl BoundColumn {
    #[must_use]
    pub const fn def(&self) -> &ColumnDef {
        &self.def
    }

    #[must_use]
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// `"table"."column"`
    #[must_use]
    pub fn full_column_name(&self) -> ColumnName {
        ColumnName::new_with_table_or_alias(self.table_name.clone(), self.column_name.clone())
    }

    /// `"column" <definition>`, as used inside `CREATE TABLE`.
    #[must_use]
    pub fn render_column(&self, dialect: Dialect) -> String {
        format!(
            "{} {}",
            ColumnName::new(self.column_name.clone()),
            self.def.render_definition(dialect)
        )
    }

    /// Sanitize a value with this column's rules.
    ///
    /// # Errors
    ///
    /// See [`ColumnDef::sanitize`].
    pub fn sanitize(&self, value: impl Into<Value>) -> Result<String> {
        self.def.sanitize(value.into())
    }

    /// # Errors
    ///
    /// If the value cannot be sanitized for this column.
    pub fn eq(&self, value: impl Into<Value>) -> Result<Expression> {
        Expression::new(self, Operator::Equals, value)
    }

    /// # Errors
    ///
    /// If the value cannot be sanitized for this column.
    pub fn not_eq(&self, value: impl Into<Value>) -> Result<Expression> {
        Expression::new(self, Operator::DoesNotEqual, value)
    }

    /// # Errors
    ///
    /// If the value cannot be sanitized for this column.
    pub fn lt(&self, value: impl Into<Value>) -> Result<Expression> {
        Expression::new(self, Operator::Lt, value)
    }

    /// # Errors
    ///
    /// If the value cannot be sanitized for this column.
    pub fn gt(&self, value: impl Into<Value>) -> Result<Expression> {
        Expression::new(self, Operator::Gt, value)
    }

    /// # Errors
    ///
    /// If the value cannot be sanitized for this column.
    pub fn leq(&self, value: impl Into<Value>) -> Result<Expression> {
        Expression::new(self, Operator::Leq, value)
    }

    /// # Errors
    ///
    /// If the value cannot be sanitized for this column.
    pub fn geq(&self, value: impl Into<Value>) -> Result<Expression> {
        Expression::new(self, Operator::Geq, value)
    }
}
