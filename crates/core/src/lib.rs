//! Jaelle Core - Shared types library.
//!
//! This crate provides common types used across the Jaelle components:
//! - `storefront` - REST API client, cart store and form handling
//! - `cli` - Command-line front end for browsing and managing the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps it
//! lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, slugs and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
