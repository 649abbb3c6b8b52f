//! Greengrocer storefront library.
//!
//! Catalog, session cart, checkout and account services behind an axum
//! router. The binary in `main.rs` wires it to `PostgreSQL` and Sentry;
//! integration tests drive the same router against in-memory stores.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
