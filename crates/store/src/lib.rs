#![cfg_attr(test, allow(unused_crate_dependencies))]
//! [`ContentStore`](dsedit_primitives::ContentStore) backends.
//!
//! - [`HttpContentStore`] talks to the console's dataset REST endpoints.
//! - [`MemoryContentStore`] keeps everything in process, for offline use and
//!   tests.

/// REST client for the console API.
pub mod http;
/// In-process store.
pub mod memory;

pub use http::{DEFAULT_TIMEOUT, HttpContentStore};
pub use memory::MemoryContentStore;
