pub mod column;
pub mod descriptor;
pub mod model;
pub mod record;
pub mod schema;
pub mod table;
pub mod value;

use column::Column;
use model::{ActiveModel, Model};
use record::{Record, Records};
use schema::Schema;
use table::Table;

use crate::{
    connection::Database,
    error::{Result, SchemaError},
    query::{expression::Expression, select::Select},
};

/// A model type bound to a database table.
///
/// Implemented by `#[derive(DatabaseModel)]`; the CRUD methods below are the public face of
/// [`Table`]. Every one of them creates the table first if this connection has not done so yet.
/// None of them commit.
#[allow(async_fn_in_trait)]
pub trait Entity: Sized + 'static {
    type PrimaryKeyColumn: Column<Entity = Self>;

    type Model: Model<Entity = Self>;

    type ActiveModel: ActiveModel<Model = Self::Model>;

    /// The name of this entity's table in the database.
    const TABLE_NAME: &'static str;

    const COLUMN_NAMES: &[&'static str];

    /// The validated schema of this entity, built once per process.
    ///
    /// # Errors
    ///
    /// The validation error, every time, if the declaration is invalid.
    fn schema() -> Result<&'static Schema, SchemaError>;

    /// # Errors
    ///
    /// If the schema is invalid.
    fn table() -> Result<Table<'static>> {
        Ok(Table::new(Self::schema()?))
    }

    fn find() -> Select<Self> {
        Select::new()
    }

    /// # Errors
    ///
    /// See [`Table::ensure`].
    async fn ensure_table(db: &mut Database) -> Result<()> {
        Self::table()?.ensure(db).await
    }

    /// Insert a row from the values present in `values` and return a reference to it.
    ///
    /// # Errors
    ///
    /// See [`Table::insert`].
    async fn insert(db: &mut Database, values: Self::ActiveModel) -> Result<Record<Self>> {
        let key = Self::table()?.insert(db, values.assignments()).await?;
        Ok(Record::new(key))
    }

    /// All rows matching `filter`, or all rows if there is none.
    ///
    /// # Errors
    ///
    /// See [`Table::select_keys`].
    async fn get_many(db: &mut Database, filter: Option<Expression>) -> Result<Records<Self>> {
        Self::find().filter_opt(filter).all(db).await
    }

    /// The first row matching `filter`.
    ///
    /// # Errors
    ///
    /// See [`Table::select_keys`].
    async fn get_one(db: &mut Database, filter: Expression) -> Result<Option<Record<Self>>> {
        Self::find().filter(filter).one(db).await
    }

    /// Delete every row matching `filter`. Use an always-true filter to empty the table.
    ///
    /// # Errors
    ///
    /// See [`Table::delete`].
    async fn delete(db: &mut Database, filter: Expression) -> Result<()> {
        Self::table()?.delete(db, filter).await
    }
}
