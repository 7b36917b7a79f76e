//! A minimal ORM.
//!
//! Models are declared with `#[derive(DatabaseModel)]`, which validates them into a
//! [`Schema`](entity::schema::Schema) and generates typed columns. CRUD operations on an
//! [`Entity`] render plain SQL text and run it over an explicitly passed [`Database`]; tables are
//! created lazily on first use.
//!
//! ```rust,no_run
//! mod student {
//!     use minorm::DatabaseModel;
//!
//!     #[derive(DatabaseModel, Debug)]
//!     #[minorm(primary_key = id, table = "student")]
//!     pub struct Model {
//!         pub id: i64,
//!         #[minorm(max_length = 20)]
//!         pub name: String,
//!         pub age: Option<i64>,
//!     }
//! }
//!
//! # async fn run() -> minorm::Result<()> {
//! use minorm::{Database, Entity, entity::column::ComparableColumn};
//!
//! let mut db = Database::connect_from_env().await?;
//!
//! let pavlo = student::Entity::insert(
//!     &mut db,
//!     student::ActiveModel {
//!         name: "Pavlo".to_string().into(),
//!         ..Default::default()
//!     },
//! )
//! .await?;
//! db.commit().await?;
//!
//! let name = pavlo.get::<student::columns::Name>(&mut db).await?;
//! let adults = student::Entity::get_many(&mut db, Some(student::columns::Age::gt(Some(20)))).await?;
//! # let _ = (name, adults);
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod entity;
pub mod error;
pub mod query;

pub use connection::Database;
pub use entity::Entity;
pub use error::{Error, Result, SchemaError};

pub use minorm_macros::DatabaseModel;

pub use sqlx;
