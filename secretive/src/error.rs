//! Errors from the typed adapter layer.
//!
//! The value-level operations are total; errors only arise when converting
//! between concrete Rust types and the dynamic [`Value`](crate::Value) model.
//! Every error is terminal for the current call: a failing reconstruction
//! yields no partially-built value.

use thiserror::Error;

use crate::value::ShapeKind;

/// Failure to convert between a concrete type and the dynamic value model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReflectError {
    /// The value's shape does not match what the target type expects.
    #[error("expected {expected} for `{context}`, found {found}")]
    ShapeMismatch {
        /// The type being rebuilt.
        context: &'static str,
        /// Human-readable description of the expected shape.
        expected: &'static str,
        /// The shape actually found.
        found: ShapeKind,
    },

    /// A record is missing a field the target type requires.
    #[error("record for `{context}` is missing field `{field}`")]
    MissingField {
        /// The type being rebuilt.
        context: &'static str,
        /// The missing field name.
        field: &'static str,
    },

    /// An absent sequence or mapping cannot materialize a concrete container.
    #[error("cannot rebuild `{context}` from an absent container")]
    AbsentContainer {
        /// The container type being rebuilt.
        context: &'static str,
    },

    /// An integer scalar does not fit the target type.
    #[error("value {value} is out of range for `{context}`")]
    OutOfRange {
        /// The numeric type being rebuilt.
        context: &'static str,
        /// The offending payload.
        value: i128,
    },

    /// An opaque payload holds a different concrete type.
    #[error("opaque value does not hold a `{context}`")]
    OpaqueMismatch {
        /// The expected payload type.
        context: &'static str,
    },

    /// The value cannot be expressed in the requested output form.
    #[error("{context} cannot be represented in the target form")]
    Unrepresentable {
        /// What failed to convert.
        context: &'static str,
    },
}

impl ReflectError {
    pub(crate) fn shape_mismatch(
        context: &'static str,
        expected: &'static str,
        found: &crate::value::Value,
    ) -> Self {
        ReflectError::ShapeMismatch {
            context,
            expected,
            found: found.shape(),
        }
    }
}
