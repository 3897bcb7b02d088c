//! Parsing of `#[reflect(...)]` field attributes.
//!
//! This module maps attribute syntax to adapter decisions and produces
//! structured errors for invalid forms.

use proc_macro2::Span;
use syn::{spanned::Spanned, Attribute, Meta, Result};

/// Field adapter strategy based on `#[reflect(...)]` attributes.
///
/// ## Strategy Mapping
///
/// | Attribute | Strategy | Behavior |
/// |-----------|----------|----------|
/// | None | `Walk` | Project via `Reflect` (field type must implement it) |
/// | `#[reflect(flatten)]` | `Flatten` | Promote the sub-record's fields |
/// | `#[reflect(opaque)]` | `Opaque` | Carry the field verbatim, never walked |
#[derive(Clone, Debug)]
pub(crate) enum Strategy {
    /// No annotation: project the field through its `Reflect` impl.
    Walk,
    /// `#[reflect(flatten)]`: promote the embedded record's fields into the
    /// enclosing record's namespace. The field type must implement
    /// `ReflectRecord` (named-field structs deriving `Reflect` do).
    Flatten,
    /// `#[reflect(opaque)]`: carry the field as an opaque leaf. The field
    /// type must be `Clone + PartialEq + Debug + Send + Sync + 'static`.
    Opaque,
}

fn set_strategy(target: &mut Option<Strategy>, next: Strategy, span: Span) -> Result<()> {
    if target.is_some() {
        return Err(syn::Error::new(
            span,
            "conflicting #[reflect] options specified on the same field",
        ));
    }
    *target = Some(next);
    Ok(())
}

pub(crate) fn parse_field_strategy(attrs: &[Attribute]) -> Result<Strategy> {
    let mut strategy: Option<Strategy> = None;
    for attr in attrs {
        if !attr.path().is_ident("reflect") {
            continue;
        }

        match &attr.meta {
            Meta::Path(_) => {
                return Err(syn::Error::new(
                    attr.span(),
                    "bare #[reflect] has no meaning; unannotated fields are walked already. \
                    Use #[reflect(flatten)] or #[reflect(opaque)]",
                ));
            }
            Meta::List(list) => {
                list.parse_nested_meta(|meta| {
                    if meta.path.is_ident("flatten") {
                        set_strategy(&mut strategy, Strategy::Flatten, meta.path.span())
                    } else if meta.path.is_ident("opaque") {
                        set_strategy(&mut strategy, Strategy::Opaque, meta.path.span())
                    } else {
                        Err(meta.error(format!(
                            "unknown #[reflect] option `{}`; expected `flatten` or `opaque`",
                            meta.path
                                .get_ident()
                                .map_or_else(|| "?".to_string(), ToString::to_string)
                        )))
                    }
                })?;
            }
            Meta::NameValue(_) => {
                return Err(syn::Error::new(
                    attr.span(),
                    "name-value syntax is not supported for #[reflect]",
                ));
            }
        }
    }

    // Default: no annotation means the field is walked through Reflect
    Ok(strategy.unwrap_or(Strategy::Walk))
}
