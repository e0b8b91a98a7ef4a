#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Construction-time policy: initial capacity and maximum load factor.
pub mod config;

/// Error type shared by every table operation.
pub mod error;

/// The open-addressing table itself.
///
/// This module provides [`HashTable`](hash_table::HashTable), its slot model,
/// iterators, and slot-by-slot display.
pub mod hash_table;

/// Probe strategies and probe sequence computation.
pub mod probe;

pub use config::TableConfig;
pub use error::Error;
pub use error::Result;
pub use hash_table::HashTable;
pub use hash_table::Slot;
pub use probe::ProbeStrategy;
