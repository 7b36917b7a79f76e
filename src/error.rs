use thiserror::Error;

/// Problems found while validating a model declaration.
///
/// Kept separate from [`Error`] so a derived model can cache the outcome of its one-time
/// validation and hand it out again on every call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("No table name is specified for model `{0}`")]
    MissingTableName(String),

    #[error("Invalid table name `{table}` is specified for model `{model}`")]
    InvalidTableName { model: String, table: String },

    #[error("No primary key is specified for model `{0}`")]
    MissingPrimaryKey(String),

    #[error("Model `{model}` declares more than one primary key: {columns:?}")]
    MultiplePrimaryKeys { model: String, columns: Vec<String> },

    #[error("Column `{column}` is declared more than once on model `{model}`")]
    DuplicateColumn { model: String, column: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "Missing database URL, either set the `DATABASE_URL` environment variable, or add it to a `.env` file"
    )]
    MissingDatabaseUrl,

    #[error(
        "Unsupported database URL `{0}`, ensure it starts with either `postgres` or `sqlite`"
    )]
    UnsupportedDatabase(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Insert failed: {0}")]
    InsertFailed(String),

    #[error("Cannot use {value} as a value for a {column_type} column")]
    Sanitize { value: String, column_type: String },

    #[error("Table `{table}` has no column `{column}`")]
    UnknownColumn { table: String, column: String },

    #[error("No row in `{table}` has primary key {key}")]
    RowNotFound { table: String, key: String },

    #[error("Failed to decode column `{column}`: {message}")]
    Decode { column: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
