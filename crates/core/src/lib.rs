//! Cornerstone Core - Shared domain types.
//!
//! Used by every Cornerstone component:
//! - `web` - Public marketing site, admin dashboard and JSON API
//! - `cli` - Migrations, user management and token tooling
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. Database encoding is opt-in through the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, email addresses, user roles and content kinds

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
