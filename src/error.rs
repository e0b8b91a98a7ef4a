use thiserror::Error;

/// Errors reported by [`HashTable`](crate::HashTable) operations and
/// [`TableConfig`](crate::TableConfig) validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The key is not stored in the table. The table is left unchanged.
    #[error("key {0} not found")]
    KeyNotFound(i64),

    /// An insert found no usable slot on its probe sequence and the table
    /// could not grow to make room.
    #[error("no free slot for key {key} at capacity {capacity}")]
    TableFull {
        /// Key that could not be placed.
        key: i64,
        /// Capacity of the table when placement failed.
        capacity: usize,
    },

    /// Doubling the capacity would overflow `usize`.
    #[error("capacity overflow while growing from {0} slots")]
    CapacityOverflow(usize),

    /// Initial capacity must be at least one slot.
    #[error("invalid initial capacity {0}, must be at least 1")]
    InvalidCapacity(usize),

    /// Maximum load factor must lie in `(0, 1]`.
    #[error("invalid maximum load factor {0}, must be in (0, 1]")]
    InvalidLoadFactor(f64),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
