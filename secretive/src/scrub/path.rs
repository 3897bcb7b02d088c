//! Textual addresses for the leaves visited during traversal.

use std::fmt;

/// The address of a leaf within a composite value.
///
/// Grammar, as seen by policy callbacks:
///
/// ```text
/// path ::= ( "/" fieldName | "[" index "]" | "/" mapKey )*
/// ```
///
/// The root path is the empty string for scrub-initiated traversal and a
/// single `/` for restore-initiated traversal. The asymmetry only affects
/// the root segment's leading character; it is preserved so path-sensitive
/// callbacks see the same addresses across reimplementations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path {
    text: String,
}

impl Path {
    /// The scrub root: an empty path.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// The restore root: a single separator.
    pub(crate) fn restore_root() -> Self {
        Self {
            text: String::from("/"),
        }
    }

    /// Descends into a record field.
    #[must_use]
    pub fn field(&self, name: &str) -> Self {
        Self {
            text: format!("{}/{}", self.text, name),
        }
    }

    /// Descends into a sequence element.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self {
            text: format!("{}[{}]", self.text, index),
        }
    }

    /// Descends into a mapping entry. Map keys share the field separator.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        self.field(key)
    }

    /// The rendered path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
