//! In-memory infrastructure adapter
//!
//! Persistence mechanics sit outside the billing engine; the domain crates
//! only know the port traits. This crate provides the in-memory adapter
//! used by the test suites and by callers that embed the engine without a
//! database: facility-scoped maps behind one reader-writer lock, with the
//! multi-entity payment commit applied atomically.

pub mod store;

pub use store::MemoryStore;
