//! Reversible scrubbing for structured values.
//!
//! This crate separates:
//! - **Shape**: a dynamic [`Value`] model every input is classified into.
//! - **Policy**: the per-leaf decision of whether a string becomes a token.
//!
//! [`scrub`] walks a value depth-first, building a textual [`Path`] for
//! every leaf, and produces a structurally identical deep copy in which the
//! policy replaced selected string leaves with opaque tokens — together with
//! a [`SecretStore`] mapping each token back to its original. [`restore`]
//! walks a (possibly previously scrubbed) value and swaps tokens back for
//! their originals.
//!
//! Key rules:
//! - The engine never mutates its input; output is freshly allocated.
//! - Only string leaves reach the policy; every other scalar, and any
//!   [`Opaque`] leaf, is copied verbatim.
//! - Absent references and uninitialized sequences/mappings stay absent in
//!   the output; they are never materialized as empty containers.
//! - Token uniqueness is the policy author's responsibility; a colliding
//!   token silently overwrites the earlier store entry.
//! - Restoration matches on leaf *content*, not on path: any leaf equal to
//!   a known token is restored, wherever it sits. Keep tokens distinctive.
//!
//! Tokens are opaque identifiers, not encryption: anyone holding the store
//! can reverse the scrub.
//!
//! What this crate does not do:
//! - perform I/O or define a persistence format (the store is plain data;
//!   serialize it however you like, e.g. as JSON with the `json` feature)
//! - detect cycles: the [`Value`] model is a tree by construction
//! - provide locking: concurrent calls are independent, but do not mutate a
//!   [`SecretStore`] while a restore is copying it
//!
//! The `Reflect` derive macro lives in `secretive-derive` and is re-exported
//! here.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::cargo_common_metadata,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::doc_markdown,
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::option_if_let_else,
    clippy::redundant_pub_crate,
    clippy::use_self
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub use secretive_derive::Reflect;

#[allow(unused_extern_crates)]
extern crate self as secretive;

// Module declarations
mod error;
mod reflect;
mod scrub;
mod value;

#[cfg(feature = "json")]
mod json;
#[cfg(feature = "slog")]
pub mod slog;

// Re-exports
pub use error::ReflectError;
pub use reflect::Reflect;
pub use scrub::{
    restore, restore_value, scrub, scrub_value, scrub_value_with, scrub_with, DefaultPolicy, Path,
    ScrubPolicy, Scrubbable, SecretStore, TOKEN_PREFIX,
};
pub use value::{Mapping, Opaque, Record, Scalar, Sequence, ShapeKind, Value};

#[doc(hidden)]
pub use reflect::ReflectRecord;
