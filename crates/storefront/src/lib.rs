//! Jaelle Storefront library.
//!
//! Client-side building blocks for the Jaelle shop: a typed REST API client
//! for the catalogue and account endpoints, the shopping cart store, debounced
//! product search and checkout/registration form validation.
//!
//! # Modules
//!
//! - [`api`] - HTTP client, endpoint accessors, pagination and CSRF handling
//! - [`cart`] - Cart reducer with derived totals and JSON persistence
//! - [`config`] - Environment-driven configuration
//! - [`error`] - The uniform [`ApiError`](error::ApiError) contract
//! - [`featured`] - Featured product selection
//! - [`forms`] - Checkout, registration and login form validation
//! - [`search`] - Debounced search-as-you-type

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod featured;
pub mod forms;
pub mod search;

pub use api::ApiClient;
pub use cart::{Cart, CartAction, CartItem};
pub use config::StorefrontConfig;
pub use error::ApiError;
