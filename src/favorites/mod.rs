//! Locally persisted favorites
//!
//! The favorites list is the only durable state in moviq. It lives in memory
//! and is written back to a single JSON file after every change.

mod store;

pub use store::{FavoritesError, FavoritesStore, FAVORITES_FILE};
