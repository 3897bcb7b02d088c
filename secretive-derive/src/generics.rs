//! Generic type parameter handling and trait bound management.
//!
//! This module adds bounds only for generics that actually appear in fields
//! the generated adapter touches, and only the bound that field's strategy
//! needs.
//!
//! ## PhantomData Handling
//!
//! `PhantomData<T>` fields are explicitly skipped when collecting generics.
//! This is essential for marker-typed wrappers:
//!
//! ```ignore
//! struct TypedId<T> {
//!     id: String,
//!     _marker: PhantomData<T>,  // T should NOT require Reflect
//! }
//! ```
//!
//! Without this, `TypedId<Instant>` would fail because `Instant` doesn't
//! implement `Reflect`, even though `_marker` carries no data.

use syn::{parse_quote, Ident};

use crate::crate_path;

pub(crate) fn collect_generics_from_type(
    ty: &syn::Type,
    generics: &syn::Generics,
    result: &mut Vec<Ident>,
) {
    let mut visit = |ty: &syn::Type| {
        if let syn::Type::Path(path) = ty {
            if let Some(segment) = path.path.segments.last() {
                // Skip PhantomData - it's a zero-sized marker that doesn't
                // need bounds. PhantomData fields are rebuilt out of thin air
                // on reconstruction, so their parameters never flow through
                // the value model.
                if segment.ident == "PhantomData" {
                    return;
                }

                if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                    for arg in &args.args {
                        if let syn::GenericArgument::Type(inner_ty) = arg {
                            collect_generics_from_type(inner_ty, generics, result);
                        }
                    }
                }

                // Check if this type identifier matches a generic parameter
                for param in generics.type_params() {
                    if segment.ident == param.ident && !result.iter().any(|g| g == &param.ident) {
                        result.push(param.ident.clone());
                    }
                }
            }
        }
    };
    visit(ty);
}

/// Adds `Reflect` bounds to generic parameters used in walked fields.
pub(crate) fn add_reflect_bounds(
    mut generics: syn::Generics,
    used_generics: &[Ident],
) -> syn::Generics {
    for param in generics.type_params_mut() {
        if used_generics.iter().any(|g| g == &param.ident) {
            let reflect_path = crate_path("Reflect");
            param.bounds.push(parse_quote!(#reflect_path));
        }
    }
    generics
}

/// Adds `ReflectRecord` bounds to generic parameters used in flattened fields.
pub(crate) fn add_record_bounds(
    mut generics: syn::Generics,
    used_generics: &[Ident],
) -> syn::Generics {
    for param in generics.type_params_mut() {
        if used_generics.iter().any(|g| g == &param.ident) {
            let record_path = crate_path("ReflectRecord");
            param.bounds.push(parse_quote!(#record_path));
        }
    }
    generics
}

/// Adds the opaque-payload bounds to generic parameters used in
/// `#[reflect(opaque)]` fields. `Any` carries the implicit `'static`.
pub(crate) fn add_opaque_bounds(
    mut generics: syn::Generics,
    used_generics: &[Ident],
) -> syn::Generics {
    for param in generics.type_params_mut() {
        if used_generics.iter().any(|g| g == &param.ident) {
            param.bounds.push(parse_quote!(::core::any::Any));
            param.bounds.push(parse_quote!(::core::clone::Clone));
            param.bounds.push(parse_quote!(::core::cmp::PartialEq));
            param.bounds.push(parse_quote!(::core::fmt::Debug));
            param.bounds.push(parse_quote!(::core::marker::Send));
            param.bounds.push(parse_quote!(::core::marker::Sync));
        }
    }
    generics
}
