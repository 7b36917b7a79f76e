use std::fmt::Display;

use sqlx::{Row, any::AnyRow};

use crate::{
    entity::descriptor::ColumnType,
    error::{Error, Result},
};

/// A host value on its way into (or out of) a SQL statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
}

impl Value {
    /// Render the value as a SQL literal without consulting any column.
    ///
    /// Text is single-quoted with embedded quotes doubled.
    #[must_use]
    pub fn to_literal(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Integer(e) => e.to_string(),
            Self::Text(e) => quote_literal(e),
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Decode the value at `index` of a row, reading it as the given column type.
    pub(crate) fn from_row(row: &AnyRow, index: usize, column_type: &ColumnType) -> Result<Self> {
        let decode_err = |e: sqlx::Error| Error::Decode {
            column: row
                .try_column(index)
                .map(|c| sqlx::Column::name(c).to_string())
                .unwrap_or_else(|_| index.to_string()),
            message: e.to_string(),
        };

        Ok(match column_type {
            ColumnType::Integer => row
                .try_get::<Option<i64>, _>(index)
                .map_err(decode_err)?
                .map_or(Self::Null, Self::Integer),
            ColumnType::String { .. } => row
                .try_get::<Option<String>, _>(index)
                .map_err(decode_err)?
                .map_or(Self::Null, Self::Text),
        })
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Integer(e) => write!(f, "{e}"),
            Self::Text(e) => write!(f, "{e:?}"),
        }
    }
}

fn quote_literal(input: &str) -> String {
    format!("'{}'", input.replace('\'', "''"))
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Self>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A Rust type that can back a model field.
///
/// Only two column types exist, so this is implemented for the integer types, [`String`], and
/// [`Option`] of either (which makes the column nullable).
pub trait FieldType: Into<Value> + Sized {
    const NULLABLE: bool;

    /// The column type for this field. `max_length` only applies to string columns.
    fn column_type(max_length: Option<u32>) -> ColumnType;

    /// Convert a value read back from the database.
    ///
    /// # Errors
    ///
    /// If the value does not fit this type, e.g. a `NULL` for a non-optional field.
    fn from_value(value: Value) -> Result<Self, String>;
}

impl FieldType for i64 {
    const NULLABLE: bool = false;

    fn column_type(_max_length: Option<u32>) -> ColumnType {
        ColumnType::Integer
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Integer(e) => Ok(e),
            other => Err(format!("expected an integer, got {other}")),
        }
    }
}

impl FieldType for i32 {
    const NULLABLE: bool = false;

    fn column_type(_max_length: Option<u32>) -> ColumnType {
        ColumnType::Integer
    }

    fn from_value(value: Value) -> Result<Self, String> {
        let wide = i64::from_value(value)?;
        Self::try_from(wide).map_err(|e| format!("{wide} does not fit into i32: {e}"))
    }
}

impl FieldType for String {
    const NULLABLE: bool = false;

    fn column_type(max_length: Option<u32>) -> ColumnType {
        ColumnType::string(max_length)
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Text(e) => Ok(e),
            other => Err(format!("expected text, got {other}")),
        }
    }
}

impl<T> FieldType for Option<T>
where
    T: FieldType,
{
    const NULLABLE: bool = true;

    fn column_type(max_length: Option<u32>) -> ColumnType {
        T::column_type(max_length)
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
