//! Read access to the hosted database.
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | `Backend` trait, `ListQuery` model, `FetchError` |
//! | [`postgrest`] | HTTP adapter for the hosted REST endpoint |
//! | [`memory`] | In-process adapter with the same query semantics |
//! | [`listings`] | Typed queries each page section reads through |

pub mod listings;
pub mod memory;
pub mod postgrest;
pub mod store;

pub use memory::MemoryBackend;
pub use postgrest::PostgrestBackend;
pub use store::{Backend, Collection, Direction, FetchError, Filter, ListQuery};
