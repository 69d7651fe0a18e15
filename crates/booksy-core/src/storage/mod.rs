//! Storage layer
//!
//! The book store is a single JSON file holding every book. There is no
//! index or log: each save rewrites the whole mapping.

pub mod persistence;

pub use persistence::{BookMap, JsonPersistence, LoadOutcome, SkippedRecord};
