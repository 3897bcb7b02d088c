//! Scrubbing machinery: paths, policies, the secret store, and the engine.
//!
//! This module ties the pieces together:
//!
//! - **`path`**: textual leaf addresses built during descent
//! - **`policy`**: the pluggable decision callback ([`ScrubPolicy`])
//! - **`store`**: the token → original table ([`SecretStore`])
//! - **`engine`**: the recursive walk and the scrub/restore entry points

mod engine;
mod path;
mod policy;
mod store;

pub use engine::{
    restore, restore_value, scrub, scrub_value, scrub_value_with, scrub_with, Scrubbable,
};
pub use path::Path;
pub use policy::{DefaultPolicy, ScrubPolicy, TOKEN_PREFIX};
pub use store::SecretStore;
