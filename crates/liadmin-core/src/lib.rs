//! Core library for the Livingimage admin console.
//!
//! Holds everything that is not rendering: configuration, the persisted
//! admin session, the route guard, the authenticated API client, and the
//! per-view fetch lifecycle. The CLI crate consumes these and only does
//! argument parsing and table output.

pub mod api;
pub mod config;
pub mod fetch;
pub mod guard;
pub mod login;
pub mod session;
pub mod table;
