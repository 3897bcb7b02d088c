//! Struct-specific `Reflect` derivation.
//!
//! This module generates the record projection and reconstruction bodies for
//! struct fields and collects the generic parameters that require trait
//! bounds, split by the strategy that touched them.

use proc_macro2::{Ident, TokenStream};
use quote::{quote, quote_spanned};
use syn::{spanned::Spanned, DataStruct, Fields, Result};

use crate::{
    crate_root,
    generics::collect_generics_from_type,
    strategy::{parse_field_strategy, Strategy},
};

/// Shape of the generated implementation.
pub(crate) enum StructKind {
    /// Named-field and unit structs project to a [`Record`]: the derive emits
    /// both `Reflect` and `ReflectRecord` (the latter enables flattening).
    Record {
        to_record_body: TokenStream,
        from_record_body: TokenStream,
    },
    /// Newtype structs are transparent: they reflect exactly as their single
    /// field does and add no record layer (and no path segment).
    Transparent {
        to_value_body: TokenStream,
        from_value_body: TokenStream,
    },
}

pub(crate) struct StructDeriveOutput {
    pub(crate) kind: StructKind,
    pub(crate) walked_generics: Vec<Ident>,
    pub(crate) flattened_generics: Vec<Ident>,
    pub(crate) opaque_generics: Vec<Ident>,
}

pub(crate) fn derive_struct(
    name: &Ident,
    data: DataStruct,
    generics: &syn::Generics,
) -> Result<StructDeriveOutput> {
    let root = crate_root();
    match data.fields {
        Fields::Named(fields) => derive_named_struct(name, fields, generics, &root),
        Fields::Unnamed(fields) => derive_newtype_struct(name, fields, generics, &root),
        Fields::Unit => Ok(StructDeriveOutput {
            kind: StructKind::Record {
                to_record_body: quote! { #root::Record::new() },
                from_record_body: quote! { ::core::result::Result::Ok(Self) },
            },
            walked_generics: Vec::new(),
            flattened_generics: Vec::new(),
            opaque_generics: Vec::new(),
        }),
    }
}

fn derive_named_struct(
    name: &Ident,
    fields: syn::FieldsNamed,
    generics: &syn::Generics,
    root: &TokenStream,
) -> Result<StructDeriveOutput> {
    let context = name.to_string();
    let mut bindings = Vec::new();
    let mut to_fields = Vec::new();
    let mut from_fields = Vec::new();
    let mut walked_generics = Vec::new();
    let mut flattened_generics = Vec::new();
    let mut opaque_generics = Vec::new();

    for field in fields.named {
        let span = field.span();
        let strategy = parse_field_strategy(&field.attrs)?;
        let ident = field.ident.expect("named field should have an identifier");
        let field_name = ident.to_string();
        let ty = &field.ty;

        match strategy {
            Strategy::Walk if is_phantom_data(ty) => {
                // Zero-sized marker: never projected, rebuilt from thin air.
                from_fields.push(quote_spanned! { span =>
                    let #ident = ::core::marker::PhantomData;
                });
            }
            Strategy::Walk => {
                collect_generics_from_type(ty, generics, &mut walked_generics);
                to_fields.push(quote_spanned! { span =>
                    record.push(#field_name, #root::Reflect::to_value(&self.#ident));
                });
                from_fields.push(quote_spanned! { span =>
                    let #ident = #root::Reflect::from_value(record.take(#field_name).ok_or(
                        #root::ReflectError::MissingField {
                            context: #context,
                            field: #field_name,
                        },
                    )?)?;
                });
            }
            Strategy::Flatten => {
                collect_generics_from_type(ty, generics, &mut flattened_generics);
                to_fields.push(quote_spanned! { span =>
                    for (promoted_name, promoted_value) in
                        #root::ReflectRecord::to_record(&self.#ident)
                    {
                        record.push(promoted_name, promoted_value);
                    }
                });
                // Promoted fields are consumed from the shared record; the
                // enclosing type's own fields must not collide with them.
                from_fields.push(quote_spanned! { span =>
                    let #ident = #root::ReflectRecord::from_record(record)?;
                });
            }
            Strategy::Opaque => {
                collect_generics_from_type(ty, generics, &mut opaque_generics);
                let type_name = quote!(#ty).to_string();
                to_fields.push(quote_spanned! { span =>
                    record.push(
                        #field_name,
                        #root::Value::Opaque(#root::Opaque::new(
                            ::core::clone::Clone::clone(&self.#ident),
                        )),
                    );
                });
                from_fields.push(quote_spanned! { span =>
                    let #ident = match record.take(#field_name).ok_or(
                        #root::ReflectError::MissingField {
                            context: #context,
                            field: #field_name,
                        },
                    )? {
                        #root::Value::Opaque(opaque) => match opaque.downcast_ref::<#ty>() {
                            ::core::option::Option::Some(inner) => {
                                ::core::clone::Clone::clone(inner)
                            }
                            ::core::option::Option::None => {
                                return ::core::result::Result::Err(
                                    #root::ReflectError::OpaqueMismatch { context: #type_name },
                                )
                            }
                        },
                        other => {
                            return ::core::result::Result::Err(
                                #root::ReflectError::ShapeMismatch {
                                    context: #context,
                                    expected: "an opaque value",
                                    found: other.shape(),
                                },
                            )
                        }
                    };
                });
            }
        }
        bindings.push(ident);
    }

    let to_record_body = if to_fields.is_empty() {
        quote! { #root::Record::new() }
    } else {
        quote! {
            let mut record = #root::Record::new();
            #(#to_fields)*
            record
        }
    };

    Ok(StructDeriveOutput {
        kind: StructKind::Record {
            to_record_body,
            from_record_body: quote! {
                #(#from_fields)*
                ::core::result::Result::Ok(Self { #(#bindings),* })
            },
        },
        walked_generics,
        flattened_generics,
        opaque_generics,
    })
}

fn derive_newtype_struct(
    name: &Ident,
    fields: syn::FieldsUnnamed,
    generics: &syn::Generics,
    root: &TokenStream,
) -> Result<StructDeriveOutput> {
    if fields.unnamed.len() != 1 {
        return Err(syn::Error::new(
            fields.span(),
            "`Reflect` supports tuple structs only in newtype form (exactly one field); \
            give the fields names to derive a record",
        ));
    }
    let context = name.to_string();
    let field = fields
        .unnamed
        .into_iter()
        .next()
        .expect("length was checked above");
    let span = field.span();
    let strategy = parse_field_strategy(&field.attrs)?;
    let ty = &field.ty;
    let index = syn::Index::from(0);

    let mut walked_generics = Vec::new();
    let mut opaque_generics = Vec::new();

    let kind = match strategy {
        Strategy::Walk => {
            collect_generics_from_type(ty, generics, &mut walked_generics);
            StructKind::Transparent {
                to_value_body: quote_spanned! { span =>
                    #root::Reflect::to_value(&self.#index)
                },
                from_value_body: quote_spanned! { span =>
                    ::core::result::Result::Ok(Self(#root::Reflect::from_value(value)?))
                },
            }
        }
        Strategy::Flatten => {
            return Err(syn::Error::new(
                span,
                "#[reflect(flatten)] requires a named field inside a record",
            ));
        }
        Strategy::Opaque => {
            collect_generics_from_type(ty, generics, &mut opaque_generics);
            let type_name = quote!(#ty).to_string();
            StructKind::Transparent {
                to_value_body: quote_spanned! { span =>
                    #root::Value::Opaque(#root::Opaque::new(
                        ::core::clone::Clone::clone(&self.#index),
                    ))
                },
                from_value_body: quote_spanned! { span =>
                    match value {
                        #root::Value::Opaque(opaque) => match opaque.downcast_ref::<#ty>() {
                            ::core::option::Option::Some(inner) => ::core::result::Result::Ok(
                                Self(::core::clone::Clone::clone(inner)),
                            ),
                            ::core::option::Option::None => ::core::result::Result::Err(
                                #root::ReflectError::OpaqueMismatch { context: #type_name },
                            ),
                        },
                        other => ::core::result::Result::Err(
                            #root::ReflectError::ShapeMismatch {
                                context: #context,
                                expected: "an opaque value",
                                found: other.shape(),
                            },
                        ),
                    }
                },
            }
        }
    };

    Ok(StructDeriveOutput {
        kind,
        walked_generics,
        flattened_generics: Vec::new(),
        opaque_generics,
    })
}

fn is_phantom_data(ty: &syn::Type) -> bool {
    if let syn::Type::Path(path) = ty {
        path.path
            .segments
            .last()
            .map_or(false, |segment| segment.ident == "PhantomData")
    } else {
        false
    }
}
