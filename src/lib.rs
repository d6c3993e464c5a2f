//! moviq library
//!
//! Exposes the catalog client, request cache, retry wrapper and favorites
//! store, plus the CLI and app layers, for use by the binary and integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod error;
pub mod favorites;
pub mod render;
pub mod retry;
pub mod shell;
