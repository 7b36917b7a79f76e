mod model;

use model::derive_database_model;
use proc_macro::TokenStream;
use proc_macro_error2::proc_macro_error;

/// Declare a database model.
///
/// Generates, next to the annotated struct (one model per module):
/// - `Entity`, implementing `minorm::Entity` with a validated schema,
/// - `ActiveModel`, the column values used for inserts,
/// - `columns`, one typed column struct per field, named in PascalCase.
///
/// ```rust,ignore
/// #[derive(DatabaseModel)]
/// #[minorm(primary_key = id, table = "student")]
/// pub struct Model {
///     pub id: i64,
///     #[minorm(max_length = 20)]
///     pub name: String,
/// }
/// ```
#[proc_macro_error]
#[proc_macro_derive(DatabaseModel, attributes(minorm))]
pub fn database_model(input: TokenStream) -> TokenStream {
    derive_database_model(input.into()).into()
}
