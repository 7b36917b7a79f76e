use std::io::Write;

use clap::{Parser, ValueEnum};
use eyre::Context;
use minorm::{
    Entity,
    connection::Dialect,
    query::{PushToQuery, statement::CreateTable},
};
use minorm_sqlparse::query::parse_create_table;

use crate::student;

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
enum SchemaDialect {
    Postgres,
    #[default]
    Sqlite,
}

impl From<SchemaDialect> for Dialect {
    fn from(value: SchemaDialect) -> Self {
        match value {
            SchemaDialect::Postgres => Self::Postgres,
            SchemaDialect::Sqlite => Self::Sqlite,
        }
    }
}

/// Print the `CREATE TABLE` statement of the example `student` model
#[derive(Parser, Debug)]
pub struct PrintSchema {
    /// The SQL dialect to render the statement in.
    #[arg(short, long, value_enum, default_value_t)]
    dialect: SchemaDialect,

    /// Parse the rendered statement back and print the resulting table description as JSON.
    #[arg(long)]
    json: bool,
}

impl PrintSchema {
    pub fn run(&self) -> eyre::Result<()> {
        let schema = student::Entity::schema().context("The student model is invalid")?;
        let create_table = CreateTable::new(schema, self.dialect.into()).to_sql();

        let output = if self.json {
            let table = parse_create_table(&create_table)
                .with_context(|| format!("Failed to parse `{create_table}`"))?;

            serde_json::to_string_pretty(&table).context("Failed to serialize table")?
        } else {
            create_table
        };

        writeln!(std::io::stdout(), "{output}").context("Failed to write to stdout")?;

        Ok(())
    }
}
