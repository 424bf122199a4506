//! Recipe Box Core - Shared types library.
//!
//! This crate provides common types used across all Recipe Box components:
//! - `web` - The HTTP service (auth, recipe search, saved recipes, cart)
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, usernames, quantities, and the
//!   transient recipe model returned by a search

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
