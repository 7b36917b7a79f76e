//! Models used to exercise the derive and the CRUD engine end to end.

pub mod models;

#[cfg(test)]
mod crud;
#[cfg(test)]
mod schema;
