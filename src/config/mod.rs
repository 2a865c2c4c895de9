//! Configuration module for pixeldiff
//!
//! Provides types and parsing for `pixeldiff.toml` project configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
