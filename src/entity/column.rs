use std::fmt::Display;

use sqlx::{Any, Column as _, QueryBuilder, Row, any::AnyRow};

use crate::{
    entity::{
        Entity,
        descriptor::ColumnDef,
        value::{FieldType, Value},
    },
    error::{Error, Result},
    query::{Operator, PushToQuery, expression::Expression},
};

pub struct ColumnName {
    table_or_alias: Option<String>,
    column_name: String,
}

impl ColumnName {
    #[must_use]
    pub const fn new(column_name: String) -> Self {
        Self {
            table_or_alias: None,
            column_name,
        }
    }

    #[must_use]
    pub const fn new_with_table_or_alias(table_or_alias: String, column_name: String) -> Self {
        Self {
            table_or_alias: Some(table_or_alias),
            column_name,
        }
    }
}

impl Display for ColumnName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(table_or_alias) = &self.table_or_alias {
            write!(f, "\"{table_or_alias}\".")?;
        }
        write!(f, "\"{}\"", self.column_name)
    }
}

impl PushToQuery for ColumnName {
    fn push_to(&self, builder: &mut QueryBuilder<'_, Any>) {
        builder.push(self);
    }
}

/// A column of a derived model, known at compile time.
///
/// Implemented by the structs the `DatabaseModel` derive generates in the model's `columns`
/// module.
pub trait Column {
    /// The underlying rust type of this column.
    type Type: FieldType;

    /// The entity that this column belongs to.
    type Entity: Entity;

    /// The name this column has in the database;
    const NAME: &'static str;

    /// The declaration this column contributes to its entity's schema.
    fn def() -> ColumnDef;

    /// The fully qualified name of this column, usually something like
    /// `"entity_table_name"."column_name"`.
    fn full_column_name() -> ColumnName {
        ColumnName::new_with_table_or_alias(
            Self::Entity::TABLE_NAME.to_string(),
            Self::NAME.to_string(),
        )
    }

    /// Read this column's value out of a row selected by name.
    ///
    /// # Errors
    ///
    /// If the row has no such column, or its value does not fit [`Self::Type`].
    fn value_from_row(row: &AnyRow) -> Result<Self::Type> {
        let index = row.try_column(Self::NAME)?.ordinal();
        let value = Value::from_row(row, index, &Self::def().column_type())?;

        Self::Type::from_value(value).map_err(|message| Error::Decode {
            column: Self::NAME.to_string(),
            message,
        })
    }
}

/// Comparisons between a column and a value of the column's own type.
///
/// The value already has the right shape for the column, so building these cannot fail.
/// Comparing with `None` through `eq`/`not_eq` renders `IS NULL`/`IS NOT NULL`.
pub trait ComparableColumn: Column + Sized {
    fn eq(other: Self::Type) -> Expression {
        compare::<Self>(Operator::Equals, other)
    }

    fn not_eq(other: Self::Type) -> Expression {
        compare::<Self>(Operator::DoesNotEqual, other)
    }

    fn lt(other: Self::Type) -> Expression {
        compare::<Self>(Operator::Lt, other)
    }

    fn gt(other: Self::Type) -> Expression {
        compare::<Self>(Operator::Gt, other)
    }

    fn leq(other: Self::Type) -> Expression {
        compare::<Self>(Operator::Leq, other)
    }

    fn geq(other: Self::Type) -> Expression {
        compare::<Self>(Operator::Geq, other)
    }
}

impl<T> ComparableColumn for T where T: Column {}

fn compare<C: Column>(operator: Operator, other: C::Type) -> Expression {
    let value: Value = other.into();

    match operator {
        Operator::Equals if value.is_null() => null_check::<C>(true),
        Operator::DoesNotEqual if value.is_null() => null_check::<C>(false),
        _ => Expression::from_parts(&C::full_column_name(), operator, &value.to_literal()),
    }
}

fn null_check<C: Column>(is_null: bool) -> Expression {
    let check = if is_null { "IS NULL" } else { "IS NOT NULL" };
    Expression::raw(format!("{} {check}", C::full_column_name()))
}

pub trait NullableColumn: Column + Sized {
    fn is_null() -> Expression {
        null_check::<Self>(true)
    }

    fn is_not_null() -> Expression {
        null_check::<Self>(false)
    }
}

impl<T, Type> NullableColumn for T
where
    T: Column<Type = Option<Type>>,
    Type: FieldType,
{
}
