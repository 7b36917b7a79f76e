use sqlparser::{
    ast::Statement,
    dialect::GenericDialect,
    parser::{Parser, ParserError},
};

use crate::schema::SqlTable;

/// Parse the first `CREATE TABLE` statement found in `query`.
///
/// # Errors
///
/// If the query is not valid SQL, or contains no `CREATE TABLE` statement.
pub fn parse_create_table(query: &str) -> Result<SqlTable, ParserError> {
    let ast = Parser::parse_sql(&GenericDialect {}, query)?;

    ast.iter()
        .find_map(|e| {
            if let Statement::CreateTable(statement) = e {
                Some(statement.into())
            } else {
                None
            }
        })
        .ok_or_else(|| ParserError::ParserError("No CREATE TABLE statement found".to_string()))
}
