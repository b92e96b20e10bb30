//! Cornerstone web library.
//!
//! The public marketing site, the admin dashboard and the JSON API that
//! edits the site's content, as a library so the router can be tested and
//! the CLI can reuse the token and account services.
//!
//! # Access control
//!
//! Sessions are stateless: a signed token in the `token` cookie carries the
//! user's id, email and role. `/admin` pages sit behind a gate that
//! redirects anything but a valid admin session to `/login`; API handlers
//! that change data take the `RequireAdmin` extractor.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
