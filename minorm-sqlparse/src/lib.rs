//! Parses `CREATE TABLE` statements back into plain table descriptions.

pub mod query;
pub mod schema;
