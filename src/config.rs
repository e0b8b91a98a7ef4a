use crate::error::Error;
use crate::error::Result;

/// Number of slots a table starts with unless configured otherwise.
pub const DEFAULT_INITIAL_CAPACITY: usize = 10;

/// Occupancy ratio above which a table doubles its capacity.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.7;

/// Construction-time policy for a [`HashTable`](crate::HashTable).
///
/// # Examples
///
/// ```rust
/// use probed_hash::HashTable;
/// use probed_hash::ProbeStrategy;
/// use probed_hash::TableConfig;
///
/// let config = TableConfig::default()
///     .with_initial_capacity(16)
///     .with_max_load_factor(0.5);
/// let table = HashTable::with_config(ProbeStrategy::Quadratic, config).unwrap();
/// assert_eq!(table.capacity(), 16);
/// assert_eq!(table.max_load_factor(), 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    /// Slot count of a freshly built table.
    pub initial_capacity: usize,
    /// The table grows once `len / capacity` exceeds this ratio.
    pub max_load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

impl TableConfig {
    /// Sets the initial slot count.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the load factor threshold that triggers growth.
    pub fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    /// Checks that the capacity is non-zero and the load factor lies in
    /// `(0, 1]`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probed_hash::Error;
    /// use probed_hash::TableConfig;
    ///
    /// assert!(TableConfig::default().validate().is_ok());
    /// assert_eq!(
    ///     TableConfig::default().with_initial_capacity(0).validate(),
    ///     Err(Error::InvalidCapacity(0))
    /// );
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(Error::InvalidCapacity(self.initial_capacity));
        }
        // Written so NaN is rejected as well.
        if !(self.max_load_factor > 0.0 && self.max_load_factor <= 1.0) {
            return Err(Error::InvalidLoadFactor(self.max_load_factor));
        }
        Ok(())
    }
}
