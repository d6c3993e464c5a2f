//! In-memory request cache with a fixed time-to-live
//!
//! Responses from the catalog API are kept for a few minutes so that repeated
//! fetches of the same resource (the same search, the same detail page) do not
//! hit the network again. Nothing here is written to disk; the cache lives and
//! dies with the process.

mod manager;

pub use manager::{cache_key, RequestCache, DEFAULT_TTL_MINUTES};
