//! Type-erased carriers for shapes the engine cannot classify.
//!
//! An [`Opaque`] wraps any `'static` value that is cloneable, comparable and
//! printable. The engine copies it verbatim and never walks its interior, so
//! external types (timestamps, decimals, handles) can ride along inside a
//! scrubbed value without implementing the adapter traits.

use std::any::Any;
use std::fmt;

/// Object-safe surface for the erased payload.
///
/// The blanket impl below covers every eligible concrete type; the trait is
/// an implementation detail of [`Opaque`].
trait OpaqueLeaf: Any + fmt::Debug + Send + Sync {
    fn clone_box(&self) -> Box<dyn OpaqueLeaf>;
    fn eq_dyn(&self, other: &dyn OpaqueLeaf) -> bool;
    fn as_any(&self) -> &dyn Any;
}

impl<T> OpaqueLeaf for T
where
    T: Any + Clone + PartialEq + fmt::Debug + Send + Sync,
{
    fn clone_box(&self) -> Box<dyn OpaqueLeaf> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn OpaqueLeaf) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A verbatim-copied value of a shape the engine does not inspect.
///
/// Equality compares the erased payloads; two opaques holding different
/// concrete types are never equal.
pub struct Opaque {
    leaf: Box<dyn OpaqueLeaf>,
}

impl Opaque {
    /// Wraps a concrete value.
    #[must_use]
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Clone + PartialEq + fmt::Debug + Send + Sync,
    {
        Self {
            leaf: Box::new(value),
        }
    }

    /// Returns `true` when the payload is a `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.leaf.as_any().is::<T>()
    }

    /// Borrows the payload as a `T`, if it holds one.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.leaf.as_any().downcast_ref()
    }
}

impl Clone for Opaque {
    fn clone(&self) -> Self {
        Self {
            leaf: self.leaf.clone_box(),
        }
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        self.leaf.eq_dyn(other.leaf.as_ref())
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Opaque").field(&self.leaf).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_round_trip() {
        let opaque = Opaque::new(42_u32);
        assert!(opaque.is::<u32>());
        assert!(!opaque.is::<i32>());
        assert_eq!(opaque.downcast_ref::<u32>(), Some(&42));
        assert_eq!(opaque.downcast_ref::<i32>(), None);
    }

    #[test]
    fn equality_requires_matching_types() {
        assert_eq!(Opaque::new(1_u32), Opaque::new(1_u32));
        assert_ne!(Opaque::new(1_u32), Opaque::new(2_u32));
        assert_ne!(Opaque::new(1_u32), Opaque::new(1_i32));
    }

    #[test]
    fn clone_preserves_payload() {
        let opaque = Opaque::new(String::from("payload"));
        assert_eq!(opaque.clone(), opaque);
    }
}
