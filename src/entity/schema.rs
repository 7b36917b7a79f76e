//! Model metadata: the validated, immutable description of a model's table.

use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

use crate::{
    entity::descriptor::{BoundColumn, ColumnDef},
    error::SchemaError,
};

// Only the start of the name is checked.
static TABLE_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new("^[a-zA-Z_]+").unwrap()
});

#[derive(Debug, Clone)]
pub struct Schema {
    model: String,
    table_name: String,
    columns: Vec<BoundColumn>,
    primary_key: usize,
}

impl Schema {
    #[must_use]
    pub fn builder(model: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            model: model.into(),
            table_name: None,
            columns: vec![],
        }
    }

    /// The name of the model this schema was declared for, used in error messages.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// All columns, in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[BoundColumn] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&BoundColumn> {
        self.columns.iter().find(|e| e.column_name() == name)
    }

    #[must_use]
    pub fn primary_key(&self) -> &BoundColumn {
        &self.columns[self.primary_key]
    }
}

/// Collects a model's declarations and validates them into a [`Schema`].
pub struct SchemaBuilder {
    model: String,
    table_name: Option<String>,
    columns: Vec<(String, ColumnDef)>,
}

impl SchemaBuilder {
    #[must_use]
    pub fn table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    #[must_use]
    pub fn column(mut self, name: impl Into<String>, def: ColumnDef) -> Self {
        self.columns.push((name.into(), def));
        self
    }

    /// Validate the declarations and bind every column to its name and table.
    ///
    /// # Errors
    ///
    /// If the table name is missing or invalid, if there is not exactly one primary key, or if a
    /// column name is used twice.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let table_name = validate_table_name(&self.model, self.table_name.as_deref())?.to_string();
        let primary_key = validate_primary_key(&self.model, &self.columns)?;

        if let Some(column) = self.columns.iter().map(|(name, _)| name).duplicates().next() {
            return Err(SchemaError::DuplicateColumn {
                model: self.model,
                column: column.clone(),
            });
        }

        let columns = bind_columns(&table_name, self.columns);

        Ok(Schema {
            model: self.model,
            table_name,
            columns,
            primary_key,
        })
    }
}

/// Check that a table name is present and starts with letters or underscores.
///
/// # Errors
///
/// [`SchemaError::MissingTableName`] or [`SchemaError::InvalidTableName`].
pub fn validate_table_name<'a>(
    model: &str,
    table_name: Option<&'a str>,
) -> Result<&'a str, SchemaError> {
    let Some(table_name) = table_name else {
        return Err(SchemaError::MissingTableName(model.to_string()));
    };

    if !TABLE_NAME_PATTERN.is_match(table_name) {
        return Err(SchemaError::InvalidTableName {
            model: model.to_string(),
            table: table_name.to_string(),
        });
    }

    Ok(table_name)
}

/// Find the one primary key column, returning its position.
///
/// # Errors
///
/// [`SchemaError::MissingPrimaryKey`] when there is none, [`SchemaError::MultiplePrimaryKeys`]
/// when there are several.
pub fn validate_primary_key(
    model: &str,
    columns: &[(String, ColumnDef)],
) -> Result<usize, SchemaError> {
    let keys = columns
        .iter()
        .positions(|(_, def)| def.is_primary_key())
        .collect::<Vec<_>>();

    match keys.as_slice() {
        [] => Err(SchemaError::MissingPrimaryKey(model.to_string())),
        [single] => Ok(*single),
        _ => Err(SchemaError::MultiplePrimaryKeys {
            model: model.to_string(),
            columns: keys.iter().map(|i| columns[*i].0.clone()).collect(),
        }),
    }
}

/// Name every declared column after its field and attach the table name.
#[must_use]
pub fn bind_columns(table_name: &str, columns: Vec<(String, ColumnDef)>) -> Vec<BoundColumn> {
    columns
        .into_iter()
        .map(|(name, def)| def.bind(name, table_name))
        .collect()
}
