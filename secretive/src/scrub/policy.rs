//! The pluggable decision callback consulted once per string leaf.
//!
//! A policy is a capability, not a subtype: implement [`ScrubPolicy`] on a
//! struct when the decision carries state, or pass a closure — the blanket
//! impl covers any `FnMut(&str, &str) -> Option<String>`.
//!
//! ## Caller obligations
//!
//! - Returning `None` leaves the leaf exactly as-is.
//! - Returning `Some(token)` commits `store[token] = current` and writes the
//!   token into the output leaf.
//! - Tokens returned across a traversal must be mutually unique: the engine
//!   does not detect collisions, and a colliding token silently overwrites
//!   the earlier store entry.
//! - Tokens must not accidentally equal an untouched leaf's natural value;
//!   restoration matches on leaf content, so a natural value equal to a
//!   known token would be "restored" too.

/// Prefix used by [`DefaultPolicy`] tokens.
pub const TOKEN_PREFIX: &str = "$ref-";

/// Decides, per string leaf, whether to replace it with a token.
pub trait ScrubPolicy {
    /// Called once per string leaf with the leaf's path and current value.
    ///
    /// Returns the replacement token, or `None` to keep the value.
    fn on_value(&mut self, path: &str, value: &str) -> Option<String>;
}

impl<F> ScrubPolicy for F
where
    F: FnMut(&str, &str) -> Option<String>,
{
    fn on_value(&mut self, path: &str, value: &str) -> Option<String> {
        self(path, value)
    }
}

/// The built-in policy: replace every non-empty string leaf with
/// `"$ref-" + path`.
///
/// Leaving empty strings untouched is policy, not mechanism — the engine
/// would happily replace them if a custom policy asked it to.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultPolicy;

impl ScrubPolicy for DefaultPolicy {
    fn on_value(&mut self, path: &str, value: &str) -> Option<String> {
        if value.is_empty() {
            None
        } else {
            Some(format!("{TOKEN_PREFIX}{path}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_tokenizes_by_path() {
        let mut policy = DefaultPolicy;
        assert_eq!(
            policy.on_value("/spec/field", "secret"),
            Some(String::from("$ref-/spec/field"))
        );
    }

    #[test]
    fn default_policy_leaves_empty_strings() {
        let mut policy = DefaultPolicy;
        assert_eq!(policy.on_value("/spec/field", ""), None);
    }

    #[test]
    fn closures_are_policies() {
        let mut calls = 0;
        let mut policy = |path: &str, _value: &str| {
            calls += 1;
            (path == "/x").then(|| String::from("token"))
        };
        assert_eq!(ScrubPolicy::on_value(&mut policy, "/x", "v"), Some(String::from("token")));
        assert_eq!(ScrubPolicy::on_value(&mut policy, "/y", "v"), None);
        assert_eq!(calls, 2);
    }
}
