//! The `bizdir` library crate.
//!
//! This crate contains the domain models, session layer, authentication
//! gate, routing table, and error handling for the business directory API.
//! It is used by the main binary (`main.rs`) to construct and run the
//! application, and by the integration tests to assemble the same app
//! in-process.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod security;
pub mod session;
