/// Collision resolution scheme used by a [`HashTable`](crate::HashTable).
///
/// The strategy is picked when the table is built and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProbeStrategy {
    /// `(home + attempt) mod capacity`
    #[default]
    Linear,
    /// `(home + attempt²) mod capacity`
    Quadratic,
}

impl ProbeStrategy {
    /// Distance from the home slot for the given attempt, already reduced
    /// modulo `capacity`.
    ///
    /// `capacity` must be non-zero.
    #[inline(always)]
    pub fn offset(self, attempt: usize, capacity: usize) -> usize {
        match self {
            ProbeStrategy::Linear => attempt % capacity,
            ProbeStrategy::Quadratic => {
                let attempt = attempt as u128;
                ((attempt * attempt) % capacity as u128) as usize
            }
        }
    }

    /// Slot index examined on `attempt` for a key whose home slot is `home`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probed_hash::ProbeStrategy;
    ///
    /// assert_eq!(ProbeStrategy::Linear.probe(8, 3, 10), 1);
    /// assert_eq!(ProbeStrategy::Quadratic.probe(8, 3, 10), 7);
    /// ```
    #[inline(always)]
    pub fn probe(self, home: usize, attempt: usize, capacity: usize) -> usize {
        // Both terms are < capacity; wrap without forming a sum that could
        // overflow.
        let home = home % capacity;
        let offset = self.offset(attempt, capacity);
        if home >= capacity - offset {
            home - (capacity - offset)
        } else {
            home + offset
        }
    }
}

/// Home slot of `key` in a table of `capacity` slots.
///
/// Negative keys are normalized with Euclidean remainder, so the result is
/// always in `0..capacity`.
///
/// # Examples
///
/// ```rust
/// use probed_hash::probe::home_index;
///
/// assert_eq!(home_index(42, 10), 2);
/// assert_eq!(home_index(-1, 10), 9);
/// assert_eq!(home_index(0, 10), 0);
/// ```
#[inline(always)]
pub fn home_index(key: i64, capacity: usize) -> usize {
    (key as i128).rem_euclid(capacity as i128) as usize
}

/// The slot indices visited for one key, attempt `0` first.
///
/// Yields exactly `capacity` indices. Quadratic sequences may revisit slots.
#[derive(Debug, Clone)]
pub struct ProbeSequence {
    strategy: ProbeStrategy,
    home: usize,
    capacity: usize,
    attempt: usize,
}

impl ProbeSequence {
    pub(crate) fn new(strategy: ProbeStrategy, key: i64, capacity: usize) -> Self {
        Self {
            strategy,
            home: home_index(key, capacity),
            capacity,
            attempt: 0,
        }
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.attempt >= self.capacity {
            return None;
        }
        let index = self.strategy.probe(self.home, self.attempt, self.capacity);
        self.attempt += 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.capacity - self.attempt;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}
