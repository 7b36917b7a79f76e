use std::{fmt::Debug, marker::PhantomData};

use crate::{
    connection::Database,
    entity::{
        Entity,
        column::Column,
        value::{FieldType, Value},
    },
    error::{Error, Result},
    query::parse::ParseFromRow,
};

/// A reference to one row, holding nothing but its primary key.
///
/// Every read goes to the database and every write is sent immediately; nothing is cached.
pub struct Record<E: Entity> {
    key: Value,
    marker: PhantomData<E>,
}

impl<E: Entity> Record<E> {
    pub(crate) const fn new(key: Value) -> Self {
        Self {
            key,
            marker: PhantomData,
        }
    }

    /// The primary key of the referenced row.
    #[must_use]
    pub const fn key(&self) -> &Value {
        &self.key
    }

    /// Read a column by name. The primary key is answered without a query.
    ///
    /// # Errors
    ///
    /// If the column does not exist, the row is gone, or the query fails.
    pub async fn get_field(&self, db: &mut Database, column: &str) -> Result<Value> {
        if column == E::PrimaryKeyColumn::NAME {
            return Ok(self.key.clone());
        }

        E::table()?.read_field(db, &self.key, column).await
    }

    /// Write a column by name. Writing the primary key re-points this record at the new key, as
    /// the column stores it, once the update went through.
    ///
    /// # Errors
    ///
    /// If the column does not exist, the value cannot be sanitized, or the update fails.
    pub async fn set_field(
        &mut self,
        db: &mut Database,
        column: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        let table = E::table()?;
        let value = value.into();

        table
            .write_field(db, &self.key, column, value.clone())
            .await?;

        if column == E::PrimaryKeyColumn::NAME {
            self.key = table.schema().primary_key().def().coerce(value)?;
        }

        Ok(())
    }

    /// Typed version of [`Record::get_field`].
    ///
    /// # Errors
    ///
    /// As [`Record::get_field`], or [`Error::Decode`] if the stored value does not fit the
    /// column's type.
    pub async fn get<C>(&self, db: &mut Database) -> Result<C::Type>
    where
        C: Column<Entity = E>,
    {
        let value = self.get_field(db, C::NAME).await?;

        C::Type::from_value(value).map_err(|message| Error::Decode {
            column: C::NAME.to_string(),
            message,
        })
    }

    /// Typed version of [`Record::set_field`].
    ///
    /// # Errors
    ///
    /// As [`Record::set_field`].
    pub async fn set<C>(&mut self, db: &mut Database, value: C::Type) -> Result<()>
    where
        C: Column<Entity = E>,
    {
        self.set_field(db, C::NAME, value).await
    }

    /// Read the whole row at once.
    ///
    /// # Errors
    ///
    /// If the row is gone, the query fails, or the row does not parse.
    pub async fn load(&self, db: &mut Database) -> Result<E::Model> {
        let row = E::table()?.read_row(db, &self.key).await?;
        E::Model::parse_from_row(&row)
    }
}

impl<E: Entity> Debug for Record<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}> {}", E::TABLE_NAME, self.key)
    }
}

impl<E: Entity> Clone for Record<E> {
    fn clone(&self) -> Self {
        Self::new(self.key.clone())
    }
}

impl<E: Entity> PartialEq for Record<E> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

/// The result of a multi-row query: keys already fetched, wrapped into [`Record`]s one at a
/// time as the iterator advances. It can be walked once.
pub struct Records<E: Entity> {
    keys: std::vec::IntoIter<Value>,
    marker: PhantomData<E>,
}

impl<E: Entity> Records<E> {
    pub(crate) fn new(keys: Vec<Value>) -> Self {
        Self {
            keys: keys.into_iter(),
            marker: PhantomData,
        }
    }
}

impl<E: Entity> Iterator for Records<E> {
    type Item = Record<E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.keys.next().map(Record::new)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<E: Entity> ExactSizeIterator for Records<E> {}
