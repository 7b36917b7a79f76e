use std::{
    fmt::Display,
    ops::{BitAnd, BitOr, Not},
};

use sqlx::{Any, QueryBuilder};

use crate::{
    entity::{column::ColumnName, descriptor::BoundColumn, value::Value},
    error::Result,
    query::{Operator, PushToQuery},
};

/// A boolean SQL predicate, stored as its rendered text.
///
/// Expressions never change after construction; the combinators return new ones. They are
/// purely textual, nothing checks that the combined operands make sense together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression(String);

impl Expression {
    /// `"table"."column"<op><value>`, with the value sanitized by the column.
    ///
    /// # Errors
    ///
    /// If the column cannot turn `value` into a literal.
    pub fn new(column: &BoundColumn, operator: Operator, value: impl Into<Value>) -> Result<Self> {
        let literal = column.sanitize(value)?;
        Ok(Self::from_parts(&column.full_column_name(), operator, &literal))
    }

    pub(crate) fn from_parts(column: &ColumnName, operator: Operator, literal: &str) -> Self {
        Self(format!("{column}{operator}{literal}"))
    }

    /// Wrap an already rendered fragment.
    #[must_use]
    pub fn raw(fragment: impl Into<String>) -> Self {
        Self(fragment.into())
    }

    #[must_use]
    pub fn and_(first: &Self, second: &Self) -> Self {
        Self(format!("({first}) AND ({second})"))
    }

    #[must_use]
    pub fn or_(first: &Self, second: &Self) -> Self {
        Self(format!("({first}) OR ({second})"))
    }

    #[must_use]
    pub fn not_(first: &Self) -> Self {
        Self(format!("NOT ({first})"))
    }

    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::and_(&self, &other)
    }

    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::or_(&self, &other)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PushToQuery for Expression {
    fn push_to(&self, builder: &mut QueryBuilder<'_, Any>) {
        builder.push(&self.0);
    }
}

impl BitAnd for Expression {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl BitOr for Expression {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl Not for Expression {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::not_(&self)
    }
}
