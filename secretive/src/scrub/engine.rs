//! The recursive deep-copy walk and the scrub/restore entry points.
//!
//! The engine never mutates its input: it produces a freshly allocated copy
//! node by node, consulting the policy at each string leaf. Traversal depth
//! equals the input's structural depth; [`Value`] is a tree by construction
//! in this model, so termination is guaranteed.
//!
//! Entry points come in two levels:
//!
//! - value level (`*_value`): total functions over the dynamic [`Value`];
//! - typed level: project through [`Reflect`], walk, rebuild — failing fast
//!   before any output is produced if the root cannot be classified or the
//!   result cannot be rebuilt.

use crate::error::ReflectError;
use crate::reflect::Reflect;
use crate::value::{Mapping, Record, Scalar, Sequence, Value};

use super::path::Path;
use super::policy::{DefaultPolicy, ScrubPolicy};
use super::store::SecretStore;

/// Scrubs `value` with [`DefaultPolicy`].
///
/// Returns the scrubbed copy and the token table mapping each emitted token
/// back to the original it replaced. The input is left untouched.
pub fn scrub<T: Reflect>(value: &T) -> Result<(T, SecretStore), ReflectError> {
    scrub_with(value, DefaultPolicy)
}

/// Scrubs `value` with a caller-supplied policy.
///
/// The store contains exactly the tokens the policy actually emitted;
/// declined leaves contribute nothing.
pub fn scrub_with<T, P>(value: &T, policy: P) -> Result<(T, SecretStore), ReflectError>
where
    T: Reflect,
    P: ScrubPolicy,
{
    let (scrubbed, store) = scrub_value_with(&value.to_value(), policy);
    Ok((T::from_value(scrubbed)?, store))
}

/// Replaces tokens in `value` with their originals from `secrets`.
///
/// Matching is by leaf content, not by path: any string leaf anywhere in the
/// value whose current content equals a known token is restored, regardless
/// of where the token was originally emitted. Each token is substituted at
/// most once per call. The caller's store is never mutated.
pub fn restore<T: Reflect>(value: &T, secrets: &SecretStore) -> Result<T, ReflectError> {
    T::from_value(restore_value(&value.to_value(), secrets))
}

/// Value-level [`scrub`]: total over any [`Value`].
#[must_use]
pub fn scrub_value(value: &Value) -> (Value, SecretStore) {
    scrub_value_with(value, DefaultPolicy)
}

/// Value-level [`scrub_with`]: total over any [`Value`].
///
/// Root path seed is the empty string.
#[must_use]
pub fn scrub_value_with<P: ScrubPolicy>(value: &Value, mut policy: P) -> (Value, SecretStore) {
    let mut store = SecretStore::new();
    let scrubbed = walk(&Path::root(), value, &mut store, &mut policy);
    (scrubbed, store)
}

/// Value-level [`restore`]: total over any [`Value`].
///
/// Root path seed is a single separator. The inner policy ignores paths, so
/// the seed has no behavioral effect here; it is preserved for parity with
/// path-sensitive callback reuse.
#[must_use]
pub fn restore_value(value: &Value, secrets: &SecretStore) -> Value {
    // Work on a private copy so the caller's store survives unchanged and a
    // token restores at most once per call. The walk still accumulates the
    // reverse entries into a store of its own; that store is discarded.
    let mut working = secrets.clone();
    let mut discarded = SecretStore::new();
    let mut policy = |_path: &str, current: &str| working.take(current);
    walk(&Path::restore_root(), value, &mut discarded, &mut policy)
}

/// Depth-first deep copy, dispatching on the source shape.
fn walk<P: ScrubPolicy>(
    path: &Path,
    source: &Value,
    store: &mut SecretStore,
    policy: &mut P,
) -> Value {
    match source {
        // Absent reference: stays absent.
        Value::Null => Value::Null,

        // Present reference: fresh cell, recurse with the same path.
        Value::Reference(inner) => Value::Reference(Box::new(walk(path, inner, store, policy))),

        // Record: visit fields in declared order.
        Value::Record(record) => {
            let mut copy = Record::with_capacity(record.len());
            for (name, child) in record.iter() {
                copy.push(name, walk(&path.field(name), child, store, policy));
            }
            Value::Record(copy)
        }

        // Sequence: an absent source stays absent, no allocation.
        Value::Sequence(sequence) => match sequence.items() {
            None => Value::Sequence(Sequence::absent()),
            Some(items) => {
                let mut copy = Vec::with_capacity(items.len());
                for (index, child) in items.iter().enumerate() {
                    copy.push(walk(&path.index(index), child, store, policy));
                }
                Value::Sequence(Sequence::from(copy))
            }
        },

        // Mapping: an absent source stays absent; each key visited once.
        Value::Mapping(mapping) => match mapping.entries() {
            None => Value::Mapping(Mapping::absent()),
            Some(entries) => {
                let mut copy = Mapping::empty();
                for (key, child) in entries {
                    copy.insert(key.clone(), walk(&path.key(key), child, store, policy));
                }
                Value::Mapping(copy)
            }
        },

        // String leaf: the policy decides.
        Value::Scalar(Scalar::String(current)) => match policy.on_value(path.as_str(), current) {
            Some(replacement) if replacement != *current => {
                store.insert(replacement.clone(), current.clone());
                Value::Scalar(Scalar::String(replacement))
            }
            _ => Value::Scalar(Scalar::String(current.clone())),
        },

        // Any other scalar: verbatim copy, no callback.
        Value::Scalar(scalar) => Value::Scalar(scalar.clone()),

        // Unsupported shape: verbatim copy, interior never visited.
        Value::Opaque(opaque) => Value::Opaque(opaque.clone()),
    }
}

/// Convenience methods over every [`Reflect`] type.
pub trait Scrubbable: Reflect {
    /// See [`scrub`].
    fn scrub(&self) -> Result<(Self, SecretStore), ReflectError> {
        scrub(self)
    }

    /// See [`scrub_with`].
    fn scrub_with<P: ScrubPolicy>(&self, policy: P) -> Result<(Self, SecretStore), ReflectError> {
        scrub_with(self, policy)
    }

    /// See [`restore`].
    fn restore(&self, secrets: &SecretStore) -> Result<Self, ReflectError> {
        restore(self, secrets)
    }
}

impl<T> Scrubbable for T where T: Reflect {}
