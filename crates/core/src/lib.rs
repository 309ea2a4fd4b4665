//! Watchshop Core - Shared types library.
//!
//! This crate provides common types used across all Watchshop components:
//! - `storefront` - The HTTP backend (catalog, accounts, basket, admin)
//! - `cli` - Command-line tools for managing the data files
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no file access, no HTTP.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and usernames

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
