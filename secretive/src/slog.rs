//! Adapters for emitting scrubbed values through `slog`.
//!
//! This module connects [`Reflect`] with `slog` by providing a
//! `slog::Value` wrapper that serializes the *scrubbed* form of a value as
//! structured JSON via `slog`'s nested-value support.
//!
//! It is responsible for:
//! - Ensuring the logged representation went through the default scrub
//!   policy, never the original string leaves.
//! - Avoiding fallible logging APIs: conversion failures are represented as
//!   placeholder strings rather than propagated as errors.
//!
//! It does not configure `slog`, keep the secret store (the table built
//! while scrubbing for a log line is dropped), or attempt to validate that
//! a custom policy redacts correctly.

use serde_json::Value as JsonValue;
use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::reflect::Reflect;
use crate::scrub::scrub_value;

/// A `slog::Value` that emits an owned scrubbed payload as structured JSON.
pub struct ScrubbedJson {
    value: JsonValue,
}

impl ScrubbedJson {
    fn new(value: JsonValue) -> Self {
        Self { value }
    }
}

impl SlogValue for ScrubbedJson {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let nested = slog::Serde(self.value.clone());
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

/// Converts values into a `slog::Value` that logs their scrubbed form.
///
/// Calling `into_scrubbed_json` consumes the value, scrubs it with the
/// default policy, drops the secret store, and keeps the scrubbed structure
/// as JSON. String leaves appear as `$ref-`-prefixed path tokens; every
/// other leaf is logged verbatim.
///
/// ## Example
/// ```ignore
/// use secretive::slog::IntoScrubbedJson;
///
/// info!(logger, "event"; "payload" => event.into_scrubbed_json());
/// ```
pub trait IntoScrubbedJson: Reflect {
    /// Scrubs `self` and returns a `slog::Value` serializing as JSON.
    ///
    /// If the scrubbed output cannot be expressed as JSON (it contains an
    /// opaque leaf), the returned value stores the placeholder string
    /// `"failed to scrub value for logging"`.
    #[must_use]
    fn into_scrubbed_json(self) -> ScrubbedJson {
        let (scrubbed, _secrets) = scrub_value(&self.to_value());
        let json = JsonValue::try_from(scrubbed).unwrap_or_else(|_| {
            JsonValue::String(String::from("failed to scrub value for logging"))
        });
        ScrubbedJson::new(json)
    }
}

impl<T> IntoScrubbedJson for T where T: Reflect {}
