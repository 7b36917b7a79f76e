use std::marker::PhantomData;

use crate::{
    connection::Database,
    entity::{
        Entity,
        record::{Record, Records},
    },
    error::Result,
    query::{PushToQuery, expression::Expression, statement},
};

/// A typed query for the primary keys of an entity's rows.
pub struct Select<T>
where
    T: Entity,
{
    marker: PhantomData<T>,
    conditions: Vec<Expression>,
}

impl<T> Select<T>
where
    T: Entity,
{
    pub(crate) const fn new() -> Self {
        Self {
            marker: PhantomData,
            conditions: vec![],
        }
    }

    /// Append a new `WHERE` condition using an `AND` statement as glue. Each condition is
    /// wrapped in `()` brackets once there is more than one.
    #[must_use]
    pub fn filter(mut self, condition: Expression) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn filter_opt(self, condition: Option<Expression>) -> Self {
        match condition {
            Some(condition) => self.filter(condition),
            None => self,
        }
    }

    fn condition(&self) -> Option<Expression> {
        self.conditions.iter().cloned().reduce(Expression::and)
    }

    /// Return the raw SQL query of this statement.
    ///
    /// # Errors
    ///
    /// If the entity's schema is invalid.
    pub fn query(&self) -> Result<String> {
        Ok(statement::Select::keys(T::schema()?)
            .filter(self.condition())
            .to_sql())
    }

    /// Execute the query, returning the first matching row, if any.
    ///
    /// # Errors
    ///
    /// If there's been a problem communicating with the database.
    pub async fn one(self, db: &mut Database) -> Result<Option<Record<T>>> {
        let keys = T::table()?
            .select_keys(db, self.condition(), Some(1))
            .await?;

        Ok(keys.into_iter().next().map(Record::new))
    }

    /// Execute the query, returning all matching rows.
    ///
    /// # Errors
    ///
    /// If there's been a problem communicating with the database.
    pub async fn all(self, db: &mut Database) -> Result<Records<T>> {
        let keys = T::table()?
            .select_keys(db, self.condition(), None)
            .await?;

        Ok(Records::new(keys))
    }
}
