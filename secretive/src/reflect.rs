//! Adapters between concrete Rust types and the dynamic [`Value`] model.
//!
//! This module defines the two adapter traits:
//!
//! - [`Reflect`]: types that can be projected into a [`Value`] and rebuilt
//!   from one. The derive macro generates impls for user structs.
//! - [`ReflectRecord`]: record-shaped types; machinery used by the derive to
//!   support field flattening.
//!
//! ## Shape mapping for std types
//!
//! | Rust type | Value shape |
//! |-----------|-------------|
//! | `String`, `Cow<'static, str>` | string scalar |
//! | integers, `bool`, `char`, floats | non-string scalar |
//! | `()` | null |
//! | `Option<T>` | null / reference |
//! | `Box<T>` | transparent |
//! | `Vec<T>` | initialized sequence |
//! | `BTreeMap<String, T>`, `HashMap<String, T>` | initialized mapping |
//! | [`Value`] | itself |
//! | [`Opaque`] | opaque leaf |
//!
//! The absent sequence/mapping variants never arise from these impls; they
//! serve dynamically built values. Reconstruction of a concrete container
//! from an absent variant fails with [`ReflectError::AbsentContainer`].

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::error::ReflectError;
use crate::value::{Opaque, Record, Scalar, Value};

/// A type with an adapter into and out of the dynamic value model.
///
/// Derive this with `#[derive(Reflect)]` for structs with named fields; the
/// generated adapter preserves field declaration order, so paths built during
/// traversal use the Rust field identifiers.
///
/// `from_value` is the inverse of `to_value` for any value produced by
/// `to_value` or by a shape-preserving transformation of one (which is what
/// the traversal engine produces).
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Reflect`",
    label = "this type cannot be projected into the value model",
    note = "use `#[derive(Reflect)]` on the type definition",
    note = "or mark the field `#[reflect(opaque)]` to carry it verbatim"
)]
pub trait Reflect: Sized {
    /// Projects this value into the dynamic model.
    #[must_use]
    fn to_value(&self) -> Value;

    /// Rebuilds a concrete value from the dynamic model.
    fn from_value(value: Value) -> Result<Self, ReflectError>;
}

/// A record-shaped type whose fields live in a shared namespace.
///
/// Implemented by the derive for named-field and unit structs. Flattened
/// fields promote their sub-record's fields into the enclosing record at
/// adapter-construction time, and `from_record` consumes them back out of
/// the same namespace.
#[doc(hidden)]
pub trait ReflectRecord: Reflect {
    /// Projects this value into an ordered field list.
    #[must_use]
    fn to_record(&self) -> Record;

    /// Rebuilds a concrete value by consuming fields from `record`.
    fn from_record(record: &mut Record) -> Result<Self, ReflectError>;
}

impl Reflect for String {
    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::String(self.clone()))
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Scalar(Scalar::String(text)) => Ok(text),
            other => Err(ReflectError::shape_mismatch(
                "String",
                "a string scalar",
                &other,
            )),
        }
    }
}

impl Reflect for Cow<'static, str> {
    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::String(self.clone().into_owned()))
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        String::from_value(value).map(Cow::Owned)
    }
}

impl Reflect for bool {
    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::Bool(*self))
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Scalar(Scalar::Bool(flag)) => Ok(flag),
            other => Err(ReflectError::shape_mismatch(
                "bool",
                "a boolean scalar",
                &other,
            )),
        }
    }
}

impl Reflect for char {
    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::Char(*self))
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Scalar(Scalar::Char(character)) => Ok(character),
            other => Err(ReflectError::shape_mismatch(
                "char",
                "a character scalar",
                &other,
            )),
        }
    }
}

impl Reflect for () {
    fn to_value(&self) -> Value {
        Value::Null
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Null => Ok(()),
            other => Err(ReflectError::shape_mismatch("()", "null", &other)),
        }
    }
}

macro_rules! impl_reflect_signed {
    ($($ty:ty),*) => {$(
        impl Reflect for $ty {
            fn to_value(&self) -> Value {
                Value::Scalar(Scalar::Int(*self as i64))
            }

            fn from_value(value: Value) -> Result<Self, ReflectError> {
                match value {
                    Value::Scalar(Scalar::Int(raw)) => {
                        <$ty>::try_from(raw).map_err(|_| ReflectError::OutOfRange {
                            context: stringify!($ty),
                            value: i128::from(raw),
                        })
                    }
                    Value::Scalar(Scalar::UInt(raw)) => {
                        <$ty>::try_from(raw).map_err(|_| ReflectError::OutOfRange {
                            context: stringify!($ty),
                            value: i128::from(raw),
                        })
                    }
                    other => Err(ReflectError::shape_mismatch(
                        stringify!($ty),
                        "an integer scalar",
                        &other,
                    )),
                }
            }
        }
    )*};
}

macro_rules! impl_reflect_unsigned {
    ($($ty:ty),*) => {$(
        impl Reflect for $ty {
            fn to_value(&self) -> Value {
                Value::Scalar(Scalar::UInt(*self as u64))
            }

            fn from_value(value: Value) -> Result<Self, ReflectError> {
                match value {
                    Value::Scalar(Scalar::UInt(raw)) => {
                        <$ty>::try_from(raw).map_err(|_| ReflectError::OutOfRange {
                            context: stringify!($ty),
                            value: i128::from(raw),
                        })
                    }
                    Value::Scalar(Scalar::Int(raw)) => {
                        <$ty>::try_from(raw).map_err(|_| ReflectError::OutOfRange {
                            context: stringify!($ty),
                            value: i128::from(raw),
                        })
                    }
                    other => Err(ReflectError::shape_mismatch(
                        stringify!($ty),
                        "an integer scalar",
                        &other,
                    )),
                }
            }
        }
    )*};
}

impl_reflect_signed!(i8, i16, i32, i64, isize);
impl_reflect_unsigned!(u8, u16, u32, u64, usize);

impl Reflect for f64 {
    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::Float(*self))
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Scalar(Scalar::Float(raw)) => Ok(raw),
            other => Err(ReflectError::shape_mismatch(
                "f64",
                "a floating-point scalar",
                &other,
            )),
        }
    }
}

impl Reflect for f32 {
    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::Float(f64::from(*self)))
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        f64::from_value(value).map(|raw| raw as f32)
    }
}

impl<T> Reflect for Option<T>
where
    T: Reflect,
{
    fn to_value(&self) -> Value {
        match self {
            None => Value::Null,
            Some(inner) => Value::Reference(Box::new(inner.to_value())),
        }
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Null => Ok(None),
            Value::Reference(inner) => T::from_value(*inner).map(Some),
            other => Err(ReflectError::shape_mismatch(
                "Option",
                "a reference or null",
                &other,
            )),
        }
    }
}

impl<T> Reflect for Box<T>
where
    T: Reflect,
{
    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        T::from_value(value).map(Box::new)
    }
}

impl<T> Reflect for Vec<T>
where
    T: Reflect,
{
    fn to_value(&self) -> Value {
        Value::Sequence(self.iter().map(Reflect::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Sequence(sequence) => match sequence.into_items() {
                Some(items) => items.into_iter().map(T::from_value).collect(),
                None => Err(ReflectError::AbsentContainer { context: "Vec" }),
            },
            other => Err(ReflectError::shape_mismatch("Vec", "a sequence", &other)),
        }
    }
}

impl<T> Reflect for BTreeMap<String, T>
where
    T: Reflect,
{
    fn to_value(&self) -> Value {
        Value::Mapping(
            self.iter()
                .map(|(key, value)| (key.clone(), value.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Mapping(mapping) => match mapping.into_entries() {
                Some(entries) => entries
                    .into_iter()
                    .map(|(key, value)| Ok((key, T::from_value(value)?)))
                    .collect(),
                None => Err(ReflectError::AbsentContainer { context: "BTreeMap" }),
            },
            other => Err(ReflectError::shape_mismatch(
                "BTreeMap",
                "a mapping",
                &other,
            )),
        }
    }
}

impl<T, S> Reflect for HashMap<String, T, S>
where
    T: Reflect,
    S: BuildHasher + Default,
{
    fn to_value(&self) -> Value {
        Value::Mapping(
            self.iter()
                .map(|(key, value)| (key.clone(), value.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Mapping(mapping) => match mapping.into_entries() {
                Some(entries) => entries
                    .into_iter()
                    .map(|(key, value)| Ok((key, T::from_value(value)?)))
                    .collect(),
                None => Err(ReflectError::AbsentContainer { context: "HashMap" }),
            },
            other => Err(ReflectError::shape_mismatch(
                "HashMap",
                "a mapping",
                &other,
            )),
        }
    }
}

/// Identity adapter: dynamically built values flow through unchanged.
impl Reflect for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        Ok(value)
    }
}

impl Reflect for Opaque {
    fn to_value(&self) -> Value {
        Value::Opaque(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Opaque(opaque) => Ok(opaque),
            other => Err(ReflectError::shape_mismatch(
                "Opaque",
                "an opaque value",
                &other,
            )),
        }
    }
}
