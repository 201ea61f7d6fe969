//! Core types and trait definitions for the Diario journal.
//!
//! A journal is two keyed maps: per-day metadata (mood, status check-ins)
//! and per-day free-text notes. [`journal::DayRecordStore`] owns both and
//! mirrors them into any [`store::KeyValueStore`] backend.

// Native `async fn` in traits; the `Send` bounds are spelled out on the trait.
#![allow(async_fn_in_trait)]

pub mod day;
pub mod entry;
pub mod error;
pub mod journal;
pub mod memory;
pub mod store;

pub use day::DayKey;
pub use entry::{DayMetadata, MetadataMap, Mood, NoteMap, StatusChange, StatusCheck};
pub use error::{Error, Result};
pub use journal::DayRecordStore;
