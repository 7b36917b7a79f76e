use convert_case::{Case, Casing};
use darling::{FromDeriveInput, FromField, ast::Data};
use proc_macro_error2::{abort, emit_error};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Ident, Type, Visibility, parse2};

#[derive(FromField, Debug, Clone)]
#[darling(attributes(minorm))]
struct DeriveModelField {
    ident: Option<Ident>,
    ty: Type,
    column: Option<String>,
    max_length: Option<u32>,
    vis: Visibility,
}

#[derive(FromDeriveInput)]
#[darling(attributes(minorm))]
struct DeriveModelTarget {
    ident: Ident,
    table: Option<String>,
    primary_key: Ident,
    data: Data<(), DeriveModelField>,
}

#[derive(Clone)]
struct TargetColumn {
    field_ident: Ident,
    db_name: String,
    struct_ident: Ident,
    ty: Type,
    max_length: Option<u32>,
    field_vis: Visibility,
}

// One generated item per block, kept together for readability.
#[allow(clippy::too_many_lines)]
pub fn derive_database_model(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match parse2(input) {
        Ok(e) => e,
        Err(e) => return e.to_compile_error(),
    };

    let target = match DeriveModelTarget::from_derive_input(&input) {
        Ok(r) => r,
        Err(e) => return e.write_errors(),
    };

    let Some(struct_data) = target.data.take_struct() else {
        abort! {
            input, "Target is not a struct.";
            note = "This macro must be run on a struct.";
        };
    };

    let columns = struct_data
        .fields
        .iter()
        .map(|e| {
            let Some(ident) = &e.ident else {
                abort! {
                    e.ty, "Field has no ident.";
                    note = "This macro cannot be run on tuple structs.";
                };
            };

            TargetColumn {
                field_ident: ident.clone(),
                db_name: e.column.as_ref().cloned().unwrap_or_else(|| ident.to_string()),
                struct_ident: Ident::new(
                    &ident.to_string().to_case(Case::Pascal),
                    ident.span(),
                ),
                ty: e.ty.clone(),
                max_length: e.max_length,
                field_vis: e.vis.clone(),
            }
        })
        .collect::<Vec<_>>();

    // Make sure all columns have unique names.
    if let Some(duplicate) = columns
        .iter()
        .find(|e| columns.iter().filter(|o| e.db_name.eq(&o.db_name)).count() > 1)
    {
        columns.iter().for_each(|e| {
            if columns.iter().filter(|o| e.db_name.eq(&o.db_name)).count() > 1 {
                emit_error! {
                    e.field_ident.span(), "Clashing occurrence of \"{}\" here.", e.db_name
                };
            }
        });

        abort! {
            duplicate.field_ident.span(), "Duplicate column definition \"{}\"", duplicate.db_name;
            note = "Columns must have unique names, if necessary use the #[minorm(column = \"my_column_name\")] attribute to specify a unique name.";
        }
    }

    let Some(primary_key) = columns
        .iter()
        .find(|e| e.field_ident.eq(&target.primary_key))
    else {
        abort! {
            target.primary_key, "Primary key does not name a field.";
            note = "Specify which field is supposed to act as the primary key, using #[minorm(primary_key = field_name)]";
        }
    };
    let primary_key_struct_ident = &primary_key.struct_ident;

    let model_ident = &target.ident;
    let model_name = model_ident.to_string();

    let columns_module = {
        let column_impls = columns.iter().map(|e| {
            let struct_ident = &e.struct_ident;
            let db_name = &e.db_name;
            let ty = &e.ty;

            let max_length = e.max_length.map_or_else(
                || quote! { ::std::option::Option::None },
                |len| quote! { ::std::option::Option::Some(#len) },
            );

            let primary_key = if e.field_ident.eq(&target.primary_key) {
                quote! { .primary_key() }
            } else {
                quote! {}
            };

            quote! {
                pub struct #struct_ident;

                impl ::minorm::entity::column::Column for #struct_ident {
                    type Type = #ty;
                    type Entity = super::Entity;
                    const NAME: &'static str = #db_name;

                    fn def() -> ::minorm::entity::descriptor::ColumnDef {
                        ::minorm::entity::descriptor::ColumnDef::new(
                            <#ty as ::minorm::entity::value::FieldType>::column_type(#max_length),
                            <#ty as ::minorm::entity::value::FieldType>::NULLABLE,
                        )
                        #primary_key
                    }
                }
            }
        });

        quote! {
            pub mod columns {
                #(
                    #column_impls
                )*
            }
        }
    };

    let entity_impl = {
        let table_name = target
            .table
            .unwrap_or_else(|| model_ident.to_string().to_case(Case::Snake));

        let column_names_decl = columns.iter().map(|e| &e.db_name);

        let schema_columns = columns.iter().map(|e| {
            let struct_ident = &e.struct_ident;

            quote! {
                .column(columns::#struct_ident::NAME, columns::#struct_ident::def())
            }
        });

        quote! {
            pub struct Entity;

            impl ::minorm::entity::Entity for Entity {
                type PrimaryKeyColumn = columns::#primary_key_struct_ident;

                type Model = #model_ident;

                type ActiveModel = ActiveModel;

                const TABLE_NAME: &'static str = #table_name;

                const COLUMN_NAMES: &[&'static str] = &[
                    #(#column_names_decl),*
                ];

                fn schema() -> ::std::result::Result<
                    &'static ::minorm::entity::schema::Schema,
                    ::minorm::SchemaError,
                > {
                    use ::minorm::entity::column::Column;

                    static SCHEMA: ::std::sync::OnceLock<
                        ::std::result::Result<::minorm::entity::schema::Schema, ::minorm::SchemaError>,
                    > = ::std::sync::OnceLock::new();

                    SCHEMA
                        .get_or_init(|| {
                            ::minorm::entity::schema::Schema::builder(
                                ::std::concat!(::std::module_path!(), "::", #model_name),
                            )
                            .table(<Self as ::minorm::entity::Entity>::TABLE_NAME)
                            #(
                                #schema_columns
                            )*
                            .build()
                        })
                        .as_ref()
                        .map_err(::std::clone::Clone::clone)
                }
            }
        }
    };

    let model_impl = {
        let column_field_assignments = columns.iter().map(|e| {
            let field_ident = &e.field_ident;
            let struct_ident = &e.struct_ident;

            quote! {
                #field_ident: columns::#struct_ident::value_from_row(row)?,
            }
        });

        let active_model_field_assignments = columns.iter().map(|e| {
            let ident = &e.field_ident;

            quote! {
                #ident: ::minorm::entity::model::ActiveModelValue::Unchanged(self.#ident),
            }
        });

        quote! {
            impl ::minorm::entity::model::Model for #model_ident {
                type Entity = Entity;
                type ActiveModel = ActiveModel;

                fn into_active(self) -> Self::ActiveModel {
                    ActiveModel {
                        #(
                            #active_model_field_assignments
                        )*
                    }
                }
            }

            impl ::minorm::query::parse::ParseFromRow for #model_ident {
                fn parse_from_row(
                    row: &::minorm::sqlx::any::AnyRow,
                ) -> ::std::result::Result<Self, ::minorm::Error> {
                    use ::minorm::entity::column::Column;

                    Ok(Self {
                        #(
                            #column_field_assignments
                        )*
                    })
                }
            }
        }
    };

    let active_model_impl = {
        let active_model_field_decls = columns.iter().map(|e| {
            let ident = &e.field_ident;
            let ty = &e.ty;
            let vis = &e.field_vis;

            quote! {
                #vis #ident: ::minorm::entity::model::ActiveModelValue<#ty>,
            }
        });

        let assignments = columns.iter().map(|e| {
            let ident = &e.field_ident;
            let struct_ident = &e.struct_ident;

            quote! {
                if let ::std::option::Option::Some(value) = self.#ident.to_value() {
                    assignments.push((columns::#struct_ident::NAME, value));
                }
            }
        });

        quote! {
            #[derive(::std::default::Default, ::std::clone::Clone, ::std::fmt::Debug)]
            pub struct ActiveModel {
                #(
                    #active_model_field_decls
                )*
            }

            impl ::minorm::entity::model::ActiveModel for ActiveModel {
                type Model = #model_ident;

                fn assignments(&self) -> ::std::vec::Vec<(&'static str, ::minorm::entity::value::Value)> {
                    use ::minorm::entity::column::Column;

                    let mut assignments = ::std::vec::Vec::new();
                    #(
                        #assignments
                    )*
                    assignments
                }
            }
        }
    };

    quote! {
        #model_impl

        #active_model_impl

        #entity_impl

        #columns_module
    }
}
