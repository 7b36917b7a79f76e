pub mod expression;
pub mod parse;
pub mod select;
pub mod statement;

use std::fmt::Display;

use sqlx::{Any, QueryBuilder};

/// This trait represents anything that can be pushed into a [`QueryBuilder`], i.e. any kind of
/// query fragment, like a condition or a whole statement.
pub trait PushToQuery {
    /// Push the object's contents into a query builder.
    fn push_to(&self, builder: &mut QueryBuilder<'_, Any>);

    /// Render the object into a SQL string.
    fn to_sql(&self) -> String {
        let mut builder = QueryBuilder::new("");
        self.push_to(&mut builder);
        builder.into_sql()
    }
}

impl PushToQuery for String {
    fn push_to(&self, builder: &mut QueryBuilder<'_, Any>) {
        builder.push(self);
    }
}

/// Comparison operators between a column and a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    DoesNotEqual,
    Lt,
    Gt,
    Leq,
    Geq,
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Equals => "=",
                Self::DoesNotEqual => "!=",
                Self::Lt => "<",
                Self::Gt => ">",
                Self::Leq => "<=",
                Self::Geq => ">=",
            }
        )
    }
}
