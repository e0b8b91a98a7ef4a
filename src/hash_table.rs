use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::fmt::Debug;
use core::iter::Enumerate;
use core::mem;
use core::slice;

use log::debug;
use log::trace;
use log::warn;

use crate::config::TableConfig;
use crate::error::Error;
use crate::error::Result;
use crate::probe::ProbeSequence;
use crate::probe::ProbeStrategy;
use crate::probe::home_index;

/// State of a single slot in a [`HashTable`].
///
/// Emptiness is an explicit tag, so every `i64` (including `0`) is a valid
/// key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Slot {
    /// Never written since the last rehash or clear. Terminates lookups.
    #[default]
    Empty,
    /// Previously occupied, now deleted. Lookups continue past it and
    /// inserts may reuse it.
    Tombstone,
    /// A live entry.
    Occupied {
        /// The stored key.
        key: i64,
        /// The stored value.
        value: String,
    },
}

impl Slot {
    /// Returns `true` for a never-written slot.
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    /// Returns `true` for a deleted slot.
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }

    /// Returns `true` if the slot holds a live entry.
    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied { .. })
    }

    /// Key of the live entry, if any.
    pub fn key(&self) -> Option<i64> {
        match self {
            Slot::Occupied { key, .. } => Some(*key),
            _ => None,
        }
    }

    /// Value of the live entry, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    fn into_entry(self) -> Option<(i64, String)> {
        match self {
            Slot::Occupied { key, value } => Some((key, value)),
            _ => None,
        }
    }
}

fn empty_slots(capacity: usize) -> Vec<Slot> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, Slot::default);
    slots
}

/// Assign each key the first free index on its probe sequence in a table of
/// `capacity` empty slots, in iteration order.
///
/// Returns `None` if some key's probe sequence has no free index left.
fn plan_positions(
    keys: impl Iterator<Item = i64>,
    capacity: usize,
    strategy: ProbeStrategy,
) -> Option<Vec<usize>> {
    let mut taken = vec![false; capacity];
    let mut positions = Vec::new();
    for key in keys {
        let index = ProbeSequence::new(strategy, key, capacity).find(|&index| !taken[index])?;
        taken[index] = true;
        positions.push(index);
    }
    Some(positions)
}

/// Debug statistics for hash table analysis.
///
/// Available in tests or with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStats {
    /// Number of live entries
    pub populated: usize,
    /// Total number of slots
    pub capacity: usize,
    /// Number of deleted slots awaiting reuse or rehash
    pub tombstones: usize,
    /// Number of never-written slots
    pub empty_slots: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Largest probe attempt at which a live entry sits
    pub max_probe_length: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Slots: {} empty, {} tombstones",
            self.empty_slots, self.tombstones
        );
        println!("Longest probe: {}", self.max_probe_length);
    }
}

/// An open-addressing hash table mapping `i64` keys to `String` values.
///
/// Collisions are resolved with the [`ProbeStrategy`] chosen at
/// construction. Deletions leave tombstones behind so that lookups of keys
/// further along the same probe sequence keep working. Once the load factor
/// exceeds the configured maximum the table doubles its capacity and
/// reinserts every live entry.
///
/// Inserting a key that is already present replaces its value.
///
/// ## Example
///
/// ```rust
/// use probed_hash::Error;
/// use probed_hash::HashTable;
/// use probed_hash::ProbeStrategy;
///
/// let mut table = HashTable::new(ProbeStrategy::Linear);
/// table.insert(2, "two").unwrap();
/// table.insert(42, "forty-two").unwrap();
///
/// // 42 collides with 2 and lands on the next slot.
/// assert_eq!(table.slots().nth(3).unwrap().1.key(), Some(42));
///
/// table.remove(2).unwrap();
/// assert_eq!(table.search(2), Err(Error::KeyNotFound(2)));
/// assert_eq!(table.search(42), Ok("forty-two"));
/// ```
#[derive(Clone)]
pub struct HashTable {
    slots: Vec<Slot>,
    populated: usize,
    tombstones: usize,
    strategy: ProbeStrategy,
    config: TableConfig,
}

impl Debug for HashTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use alloc::format;
        use alloc::string::ToString;

        f.debug_struct("HashTable")
            .field("strategy", &self.strategy)
            .field("populated", &self.populated)
            .field("capacity", &self.capacity())
            .field("tombstones", &self.tombstones)
            .field(
                "slots",
                &self
                    .slots
                    .iter()
                    .map(|slot| match slot {
                        Slot::Empty => "..".to_string(),
                        Slot::Tombstone => "xx".to_string(),
                        Slot::Occupied { key, value } => format!("{key}={value:?}"),
                    })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Default for HashTable {
    fn default() -> Self {
        Self::new(ProbeStrategy::default())
    }
}

impl HashTable {
    /// Creates an empty table with the default configuration: 10 slots and
    /// a maximum load factor of 0.7.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probed_hash::HashTable;
    /// use probed_hash::ProbeStrategy;
    ///
    /// let table = HashTable::new(ProbeStrategy::Quadratic);
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 10);
    /// ```
    pub fn new(strategy: ProbeStrategy) -> Self {
        Self::build(strategy, TableConfig::default())
    }

    /// Creates an empty table with an explicit configuration.
    ///
    /// Fails with [`Error::InvalidCapacity`] or [`Error::InvalidLoadFactor`]
    /// if the configuration does not validate.
    pub fn with_config(strategy: ProbeStrategy, config: TableConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(strategy, config))
    }

    fn build(strategy: ProbeStrategy, config: TableConfig) -> Self {
        Self {
            slots: empty_slots(config.initial_capacity),
            populated: 0,
            tombstones: 0,
            strategy,
            config,
        }
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the probing strategy fixed at construction.
    pub fn strategy(&self) -> ProbeStrategy {
        self.strategy
    }

    /// Returns the number of tombstoned slots.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.populated as f64 / self.capacity() as f64
    }

    /// Returns the load factor above which the table grows.
    pub fn max_load_factor(&self) -> f64 {
        self.config.max_load_factor
    }

    /// Home slot of `key` at the current capacity.
    pub fn hash(&self, key: i64) -> usize {
        home_index(key, self.capacity())
    }

    /// Slot examined on `attempt` when probing for `key` at the current
    /// capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probed_hash::HashTable;
    /// use probed_hash::ProbeStrategy;
    ///
    /// let table = HashTable::new(ProbeStrategy::Quadratic);
    /// let indices: Vec<usize> = (0..5).map(|attempt| table.probe(7, attempt)).collect();
    /// assert_eq!(indices, [7, 8, 1, 6, 3]);
    /// ```
    pub fn probe(&self, key: i64, attempt: usize) -> usize {
        self.strategy.probe(self.hash(key), attempt, self.capacity())
    }

    /// The full probe sequence for `key` at the current capacity.
    pub fn probe_sequence(&self, key: i64) -> ProbeSequence {
        ProbeSequence::new(self.strategy, key, self.capacity())
    }

    /// Index of the live slot holding `key`.
    ///
    /// Continues past tombstones and stops at the first empty slot.
    fn find_index(&self, key: i64) -> Option<usize> {
        for index in self.probe_sequence(key) {
            match &self.slots[index] {
                Slot::Occupied { key: k, .. } if *k == key => return Some(index),
                Slot::Empty => return None,
                _ => {}
            }
        }
        None
    }

    /// Index an insert of `key` should write to: the live slot already
    /// holding `key`, otherwise the first tombstone or empty slot on the
    /// probe sequence.
    ///
    /// Returns `None` if the sequence holds neither.
    fn find_insert_index(&self, key: i64) -> Option<usize> {
        let mut first_tombstone = None;
        for index in self.probe_sequence(key) {
            match &self.slots[index] {
                Slot::Occupied { key: k, .. } if *k == key => return Some(index),
                Slot::Occupied { .. } => {}
                Slot::Tombstone => {
                    first_tombstone.get_or_insert(index);
                }
                Slot::Empty => return Some(first_tombstone.unwrap_or(index)),
            }
        }
        first_tombstone
    }

    /// Inserts `value` under `key`, returning the previous value if the key
    /// was already present.
    ///
    /// A new entry takes the first tombstone or empty slot on the key's
    /// probe sequence. Afterwards the table doubles its capacity for as long
    /// as the load factor exceeds the configured maximum. If the probe
    /// sequence has no usable slot at all, which quadratic probing can hit
    /// well below the load factor threshold, the table grows and the insert
    /// is retried.
    ///
    /// # Errors
    ///
    /// [`Error::TableFull`] if the key could not be placed and the table
    /// cannot grow further. [`Error::CapacityOverflow`] if growth after a
    /// successful insert overflows; the entry stays inserted in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probed_hash::HashTable;
    /// use probed_hash::ProbeStrategy;
    ///
    /// let mut table = HashTable::new(ProbeStrategy::Linear);
    /// assert_eq!(table.insert(7, "seven").unwrap(), None);
    /// assert_eq!(table.insert(7, "SEVEN").unwrap(), Some("seven".to_string()));
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn insert(&mut self, key: i64, value: impl Into<String>) -> Result<Option<String>> {
        let value = value.into();
        loop {
            let Some(index) = self.find_insert_index(key) else {
                let capacity = self.capacity();
                warn!("probe sequence for key {key} exhausted at capacity {capacity}, growing");
                self.rehash()
                    .map_err(|_| Error::TableFull { key, capacity })?;
                continue;
            };

            let slot = &mut self.slots[index];
            if let Slot::Occupied { value: current, .. } = slot {
                return Ok(Some(mem::replace(current, value)));
            }
            if slot.is_tombstone() {
                self.tombstones -= 1;
            }
            *slot = Slot::Occupied { key, value };
            self.populated += 1;
            break;
        }

        while self.load_factor() > self.config.max_load_factor {
            self.rehash()?;
        }
        Ok(None)
    }

    /// Removes `key`, leaving a tombstone in its slot, and returns its value.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is absent. The table is unchanged.
    pub fn remove(&mut self, key: i64) -> Result<String> {
        let Some(index) = self.find_index(key) else {
            debug!("remove: key {key} not found");
            return Err(Error::KeyNotFound(key));
        };

        let slot = mem::replace(&mut self.slots[index], Slot::Tombstone);
        self.populated -= 1;
        self.tombstones += 1;
        slot.into_entry()
            .map(|(_, value)| value)
            .ok_or(Error::KeyNotFound(key))
    }

    /// Looks up the value stored under `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is absent.
    pub fn search(&self, key: i64) -> Result<&str> {
        self.get(key).ok_or(Error::KeyNotFound(key))
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: i64) -> Option<&str> {
        let index = self.find_index(key)?;
        self.slots[index].value()
    }

    /// Returns a mutable reference to the value stored under `key`, if any.
    pub fn get_mut(&mut self, key: i64) -> Option<&mut String> {
        let index = self.find_index(key)?;
        match &mut self.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: i64) -> bool {
        self.find_index(key).is_some()
    }

    /// Removes every entry and tombstone, keeping the current capacity.
    pub fn clear(&mut self) {
        self.slots.fill(Slot::Empty);
        self.populated = 0;
        self.tombstones = 0;
    }

    /// Iterates over live entries in slot order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.populated,
        }
    }

    /// Every slot with its index, in index order.
    pub fn slots(&self) -> Enumerate<slice::Iter<'_, Slot>> {
        self.slots.iter().enumerate()
    }

    /// Renders one line per slot: `Index i: [key, value]` for live entries
    /// and `Index i: [ ]` for empty or deleted slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probed_hash::HashTable;
    /// use probed_hash::ProbeStrategy;
    /// use probed_hash::TableConfig;
    ///
    /// let config = TableConfig::default().with_initial_capacity(3);
    /// let mut table = HashTable::with_config(ProbeStrategy::Linear, config).unwrap();
    /// table.insert(1, "one").unwrap();
    ///
    /// assert_eq!(
    ///     table.display().to_string(),
    ///     "Index 0: [ ]\nIndex 1: [1, one]\nIndex 2: [ ]\n"
    /// );
    /// ```
    pub fn display(&self) -> SlotDisplay<'_> {
        SlotDisplay { table: self }
    }

    /// Doubles the capacity and reinserts every live entry in slot order,
    /// dropping tombstones.
    ///
    /// Positions are planned before any slot moves. If some key finds no
    /// free slot at the doubled capacity, the capacity doubles again.
    fn rehash(&mut self) -> Result<()> {
        let old_capacity = self.capacity();
        let mut capacity = old_capacity;
        let positions = loop {
            capacity = capacity
                .checked_mul(2)
                .ok_or(Error::CapacityOverflow(capacity))?;
            trace!(
                "planning rehash of {} entries into {capacity} slots",
                self.populated
            );
            match plan_positions(self.iter().map(|(key, _)| key), capacity, self.strategy) {
                Some(positions) => break positions,
                None => warn!("rehash into {capacity} slots could not place every key, doubling"),
            }
        };

        let old_slots = mem::replace(&mut self.slots, empty_slots(capacity));
        self.populated = 0;
        self.tombstones = 0;
        for ((key, value), index) in old_slots
            .into_iter()
            .filter_map(Slot::into_entry)
            .zip(positions)
        {
            self.slots[index] = Slot::Occupied { key, value };
            self.populated += 1;
        }

        debug!(
            "rehashed {} entries from {old_capacity} to {capacity} slots",
            self.populated
        );
        Ok(())
    }

    /// Probe attempt at which `key` is found from its home slot.
    #[cfg(any(test, feature = "stats"))]
    fn probe_length(&self, key: i64) -> Option<usize> {
        let index = self.find_index(key)?;
        self.probe_sequence(key).position(|probed| probed == index)
    }

    /// Computes a histogram of probe lengths for the current table state.
    ///
    /// Entry `d` counts the live entries found on probe attempt `d`. The
    /// vector is as long as the largest attempt plus one, and empty for an
    /// empty table.
    ///
    /// Available in tests or with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> Vec<usize> {
        let mut hist = Vec::new();
        for (key, _) in self.iter() {
            if let Some(length) = self.probe_length(key) {
                if hist.len() <= length {
                    hist.resize(length + 1, 0);
                }
                hist[length] += 1;
            }
        }
        hist
    }

    /// Returns occupancy statistics for debugging.
    ///
    /// Available in tests or with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        DebugStats {
            populated: self.populated,
            capacity: self.capacity(),
            tombstones: self.tombstones,
            empty_slots: self.slots.iter().filter(|slot| slot.is_empty()).count(),
            load_factor: self.load_factor(),
            max_probe_length: self.probe_histogram().len().saturating_sub(1),
        }
    }
}

/// Iterator over the live entries of a [`HashTable`], in slot order.
pub struct Iter<'a> {
    slots: slice::Iter<'a, Slot>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (i64, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied { key, value } = slot {
                self.remaining -= 1;
                return Some((*key, value.as_str()));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a HashTable {
    type Item = (i64, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Slot-by-slot rendering of a [`HashTable`], returned by
/// [`HashTable::display`].
pub struct SlotDisplay<'a> {
    table: &'a HashTable,
}

impl fmt::Display for SlotDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.table.slots() {
            match slot {
                Slot::Occupied { key, value } => writeln!(f, "Index {index}: [{key}, {value}]")?,
                _ => writeln!(f, "Index {index}: [ ]")?,
            }
        }
        Ok(())
    }
}
