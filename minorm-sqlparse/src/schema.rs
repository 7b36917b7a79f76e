use serde::{Deserialize, Serialize};
use sqlparser::ast::{
    CharacterLength, ColumnDef, ColumnOption, CreateTable, DataType, ObjectNamePart,
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SqlColumn {
    pub name: String,
    pub column_type: DataType,
    pub nullable: bool,
    pub primary_key: bool,
}

impl SqlColumn {
    /// The declared length of a `VARCHAR(n)` column.
    #[must_use]
    pub fn max_length(&self) -> Option<u64> {
        match &self.column_type {
            DataType::Varchar(Some(CharacterLength::IntegerLength { length, .. }))
            | DataType::CharacterVarying(Some(CharacterLength::IntegerLength { length, .. })) => {
                Some(*length)
            }
            _ => None,
        }
    }
}

impl From<&ColumnDef> for SqlColumn {
    fn from(value: &ColumnDef) -> Self {
        let primary_key = value.options.iter().any(|e| {
            matches!(
                e.option,
                ColumnOption::Unique {
                    is_primary: true,
                    ..
                }
            )
        });

        Self {
            name: value.name.value.clone(),
            column_type: value.data_type.clone(),
            // Primary keys are implicitly NOT NULL.
            nullable: !primary_key
                && value
                    .options
                    .iter()
                    .find_map(|e| match e.option {
                        ColumnOption::Null => Some(true),
                        ColumnOption::NotNull => Some(false),
                        _ => None,
                    })
                    .unwrap_or(true),
            primary_key,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SqlTable {
    pub name: String,
    pub columns: Vec<SqlColumn>,
    pub primary_key: Option<String>,
}

impl SqlTable {
    #[must_use]
    pub fn find_column(&self, name: &str) -> Option<&SqlColumn> {
        self.columns.iter().find(|e| e.name.eq(name))
    }
}

impl From<&CreateTable> for SqlTable {
    fn from(create_table: &CreateTable) -> Self {
        let columns: Vec<SqlColumn> = create_table.columns.iter().map(SqlColumn::from).collect();

        Self {
            name: create_table
                .name
                .0
                .iter()
                .map(|e| match e {
                    ObjectNamePart::Identifier(ident) => ident.value.clone(),
                    #[allow(unreachable_patterns)]
                    other => other.to_string(),
                })
                .next_back()
                .unwrap_or_default(),
            primary_key: columns
                .iter()
                .find(|e| e.primary_key)
                .map(|e| e.name.clone()),
            columns,
        }
    }
}
