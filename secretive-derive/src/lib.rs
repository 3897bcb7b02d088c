//! Derive macro for `secretive`.
//!
//! This crate generates the value-model adapters behind `#[derive(Reflect)]`.
//! It:
//! - reads `#[reflect(...)]` field attributes
//! - emits `Reflect` (and, for record-shaped structs, `ReflectRecord`)
//!   implementations that project to and rebuild from the dynamic value model
//!
//! It does **not** decide what gets scrubbed. Policies live in the main
//! `secretive` crate and are applied at runtime.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::cargo_common_metadata,
    clippy::doc_markdown,
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::option_if_let_else,
    clippy::redundant_pub_crate,
    clippy::use_self
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::unwrap_used))]

#[allow(unused_extern_crates)]
extern crate proc_macro;

#[cfg(feature = "slog")]
use proc_macro2::Span;
use proc_macro2::TokenStream;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::{format_ident, quote};
#[cfg(feature = "slog")]
use syn::parse_quote;
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Result};

mod derive_struct;
mod generics;
mod strategy;
use derive_struct::{derive_struct, StructKind};
use generics::{add_opaque_bounds, add_record_bounds, add_reflect_bounds};

/// Derives `secretive::Reflect` for structs.
///
/// Named-field structs project to a record whose field names become path
/// segments; the derive also emits the (hidden) `ReflectRecord` impl that
/// makes the type usable with `#[reflect(flatten)]`. Newtype structs are
/// transparent: they reflect exactly as their single field does, adding no
/// path segment. Unit structs project to an empty record.
///
/// Enums and unions are rejected at compile time; model variants as distinct
/// record types.
///
/// # Field Attributes
///
/// - **No annotation**: the field is walked. Its type must implement
///   `Reflect`. `PhantomData` fields are the exception: they are skipped on
///   projection and rebuilt directly, and their type parameters pick up no
///   bounds.
///
/// - `#[reflect(flatten)]`: promotes the fields of an embedded record into
///   the enclosing record's namespace, so their path segments omit the
///   embedding field's name. The field type must be a named-field struct
///   deriving `Reflect`. Reconstruction consumes promoted fields from the
///   shared record, so names must not collide with the enclosing type's own
///   fields.
///
/// - `#[reflect(opaque)]`: carries the field as an opaque leaf that the
///   scrub engine copies verbatim and never walks into. The field type must
///   be `Clone + PartialEq + Debug + Send + Sync + 'static` but needs no
///   `Reflect` impl. Opaque values cannot be represented as JSON.
///
/// # Additional Generated Impls
///
/// - `slog::Value` (behind `cfg(feature = "slog")`): implemented by cloning
///   the value and routing it through `secretive::slog::IntoScrubbedJson`,
///   so log lines only ever carry the scrubbed form. **Note:** this impl
///   requires the type to implement `Clone`. The derive first looks for a
///   top-level `slog` crate; if not found, it checks the
///   `SECRETIVE_SLOG_CRATE` env var for an alternate path (e.g.,
///   `my_log::slog`). If neither is available, compilation fails with a
///   clear error.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Returns the token stream to reference the secretive crate root.
///
/// Handles crate renaming (e.g., `my_scrub = { package = "secretive", ... }`)
/// and internal usage (when the derive is used inside the secretive crate
/// itself).
fn crate_root() -> proc_macro2::TokenStream {
    match crate_name("secretive") {
        Ok(FoundCrate::Itself) => quote! { crate },
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Err(_) => quote! { ::secretive },
    }
}

/// Returns the token stream to reference the slog crate root.
///
/// Handles crate renaming (e.g., `my_slog = { package = "slog", ... }`).
/// If the top-level `slog` crate is not available, falls back to the
/// `SECRETIVE_SLOG_CRATE` env var, which should be a path like
/// `my_log::slog`.
#[cfg(feature = "slog")]
fn slog_crate() -> Result<proc_macro2::TokenStream> {
    match crate_name("slog") {
        Ok(FoundCrate::Itself) => Ok(quote! { crate }),
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            Ok(quote! { ::#ident })
        }
        Err(_) => {
            let env_value = std::env::var("SECRETIVE_SLOG_CRATE").map_err(|_| {
                syn::Error::new(
                    Span::call_site(),
                    "slog support is enabled, but no top-level `slog` crate was found. \
Set the SECRETIVE_SLOG_CRATE env var to a path (e.g., `my_log::slog`) or add \
`slog` as a direct dependency.",
                )
            })?;
            let path = syn::parse_str::<syn::Path>(&env_value).map_err(|_| {
                syn::Error::new(
                    Span::call_site(),
                    format!("SECRETIVE_SLOG_CRATE must be a valid Rust path (got `{env_value}`)"),
                )
            })?;
            Ok(quote! { #path })
        }
    }
}

fn crate_path(item: &str) -> proc_macro2::TokenStream {
    let root = crate_root();
    let item_ident = syn::parse_str::<syn::Path>(item).expect("secretive crate path should parse");
    quote! { #root::#item_ident }
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        ..
    } = input;

    let crate_root = crate_root();

    let output = match &data {
        Data::Struct(data) => derive_struct(&ident, data.clone(), &generics)?,
        Data::Enum(data) => {
            return Err(syn::Error::new(
                data.enum_token.span(),
                "`Reflect` cannot be derived for enums; model variants as distinct record types",
            ));
        }
        Data::Union(u) => {
            return Err(syn::Error::new(
                u.union_token.span(),
                "`Reflect` cannot be derived for unions",
            ));
        }
    };

    let bounded_generics = add_reflect_bounds(generics.clone(), &output.walked_generics);
    let bounded_generics = add_record_bounds(bounded_generics, &output.flattened_generics);
    let bounded_generics = add_opaque_bounds(bounded_generics, &output.opaque_generics);
    let (impl_generics, ty_generics, where_clause) = bounded_generics.split_for_impl();
    let context = ident.to_string();

    let reflect_impls = match output.kind {
        StructKind::Record {
            to_record_body,
            from_record_body,
        } => quote! {
            impl #impl_generics #crate_root::Reflect for #ident #ty_generics #where_clause {
                fn to_value(&self) -> #crate_root::Value {
                    #crate_root::Value::Record(#crate_root::ReflectRecord::to_record(self))
                }

                fn from_value(
                    value: #crate_root::Value,
                ) -> ::core::result::Result<Self, #crate_root::ReflectError> {
                    match value {
                        #crate_root::Value::Record(mut record) => {
                            #crate_root::ReflectRecord::from_record(&mut record)
                        }
                        other => ::core::result::Result::Err(
                            #crate_root::ReflectError::ShapeMismatch {
                                context: #context,
                                expected: "a record",
                                found: other.shape(),
                            },
                        ),
                    }
                }
            }

            impl #impl_generics #crate_root::ReflectRecord for #ident #ty_generics #where_clause {
                fn to_record(&self) -> #crate_root::Record {
                    #to_record_body
                }

                #[allow(unused_variables)]
                fn from_record(
                    record: &mut #crate_root::Record,
                ) -> ::core::result::Result<Self, #crate_root::ReflectError> {
                    #from_record_body
                }
            }
        },
        StructKind::Transparent {
            to_value_body,
            from_value_body,
        } => quote! {
            impl #impl_generics #crate_root::Reflect for #ident #ty_generics #where_clause {
                fn to_value(&self) -> #crate_root::Value {
                    #to_value_body
                }

                fn from_value(
                    value: #crate_root::Value,
                ) -> ::core::result::Result<Self, #crate_root::ReflectError> {
                    #from_value_body
                }
            }
        },
    };

    // Only generate the slog impl when the slog feature is enabled on
    // secretive-derive. If slog is not available, emit a clear error with
    // instructions.
    #[cfg(feature = "slog")]
    let slog_impl = {
        let slog_crate = slog_crate()?;
        let mut slog_generics = generics;
        let slog_where_clause = slog_generics.make_where_clause();
        let self_ty: syn::Type = parse_quote!(#ident #ty_generics);
        slog_where_clause
            .predicates
            .push(parse_quote!(#self_ty: ::core::clone::Clone));
        slog_where_clause
            .predicates
            .push(parse_quote!(#self_ty: #crate_root::slog::IntoScrubbedJson));
        let (slog_impl_generics, slog_ty_generics, slog_where_clause) =
            slog_generics.split_for_impl();
        quote! {
            impl #slog_impl_generics #slog_crate::Value for #ident #slog_ty_generics #slog_where_clause {
                fn serialize(
                    &self,
                    record: &#slog_crate::Record<'_>,
                    key: #slog_crate::Key,
                    serializer: &mut dyn #slog_crate::Serializer,
                ) -> #slog_crate::Result {
                    let scrubbed =
                        #crate_root::slog::IntoScrubbedJson::into_scrubbed_json(self.clone());
                    #slog_crate::Value::serialize(&scrubbed, record, key, serializer)
                }
            }
        }
    };

    #[cfg(not(feature = "slog"))]
    let slog_impl = quote! {};

    Ok(quote! {
        #reflect_impls

        #slog_impl

        // `slog` already provides `impl<V: Value> Value for &V`, so a
        // reference impl here would conflict with the blanket impl.
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_str(source: &str) -> Result<TokenStream> {
        expand(syn::parse_str::<DeriveInput>(source).expect("test input should parse"))
    }

    #[test]
    fn named_struct_gets_record_impls() {
        let tokens = expand_str("struct Login { username: String, password: String }").unwrap();
        let rendered = tokens.to_string();
        assert!(rendered.contains("Reflect for Login"));
        assert!(rendered.contains("ReflectRecord for Login"));
        assert!(rendered.contains("\"password\""));
    }

    #[test]
    fn newtype_struct_is_transparent() {
        let tokens = expand_str("struct Token(String);").unwrap();
        let rendered = tokens.to_string();
        assert!(rendered.contains("Reflect for Token"));
        assert!(!rendered.contains("ReflectRecord for Token"));
    }

    #[test]
    fn unit_struct_projects_empty_record() {
        let tokens = expand_str("struct Nothing;").unwrap();
        let rendered = tokens.to_string();
        assert!(rendered.contains("ReflectRecord for Nothing"));
    }

    #[test]
    fn enums_are_rejected() {
        let err = expand_str("enum Kind { A, B }").unwrap_err();
        assert!(err.to_string().contains("cannot be derived for enums"));
    }

    #[test]
    fn unions_are_rejected() {
        let err = expand_str("union Raw { a: u32, b: f32 }").unwrap_err();
        assert!(err.to_string().contains("cannot be derived for unions"));
    }

    #[test]
    fn wide_tuple_structs_are_rejected() {
        let err = expand_str("struct Pair(String, String);").unwrap_err();
        assert!(err.to_string().contains("newtype form"));
    }

    #[test]
    fn flatten_on_newtype_is_rejected() {
        let err = expand_str("struct Wrapper(#[reflect(flatten)] String);").unwrap_err();
        assert!(err.to_string().contains("named field"));
    }

    #[test]
    fn walked_generics_pick_up_reflect_bounds() {
        let tokens = expand_str("struct Holder<T> { inner: T }").unwrap();
        let rendered = tokens.to_string();
        assert!(rendered.contains("T : :: secretive :: Reflect"));
    }

    #[test]
    fn phantom_generics_stay_unbounded() {
        let tokens =
            expand_str("struct Tagged<T> { id: String, _marker: ::core::marker::PhantomData<T> }")
                .unwrap();
        let rendered = tokens.to_string();
        assert!(!rendered.contains("T : :: secretive :: Reflect"));
        assert!(rendered.contains("PhantomData"));
    }

    #[test]
    fn opaque_field_uses_downcast() {
        let tokens = expand_str(
            "struct Snapshot { name: String, #[reflect(opaque)] raw: Payload }",
        )
        .unwrap();
        let rendered = tokens.to_string();
        assert!(rendered.contains("downcast_ref"));
        assert!(rendered.contains("OpaqueMismatch"));
    }
}
