use sqlx::any::AnyRow;

use crate::error::Error;

/// Trait describing a struct that may be parsed from a [`sqlx::Row`].
pub trait ParseFromRow: Sized {
    /// # Errors
    ///
    /// If a column is missing from the row or holds a value of the wrong type.
    fn parse_from_row(row: &AnyRow) -> Result<Self, Error>;
}
