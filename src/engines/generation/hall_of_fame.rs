use std::collections::HashSet;
use std::hash::Hash;

/// Which end of the score range ranks first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankOrder {
    #[default]
    LowerIsBetter,
    HigherIsBetter,
}

impl RankOrder {
    /// True when `a` ranks strictly ahead of `b`. NaN ranks behind every
    /// number in either order.
    fn ahead(self, a: f64, b: f64) -> bool {
        match (a.is_nan(), b.is_nan()) {
            (false, true) => true,
            (true, _) => false,
            (false, false) => match self {
                RankOrder::LowerIsBetter => a < b,
                RankOrder::HigherIsBetter => a > b,
            },
        }
    }
}

/// Outcome of [`HallOfFame::try_add`]
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome<K> {
    /// Stored without displacing anything
    Added,
    /// Stored after evicting the weakest entry, returned here
    Evicted(K, f64),
    /// Duplicate key, or not better than the weakest entry of a full table
    Rejected,
}

impl<K> AddOutcome<K> {
    pub fn is_inserted(&self) -> bool {
        !matches!(self, AddOutcome::Rejected)
    }
}

/// Capacity-bounded table of distinct keys ordered best first.
///
/// Equal scores keep insertion order, and a full table only admits a
/// candidate that ranks strictly ahead of its weakest entry.
#[derive(Debug, Clone)]
pub struct HallOfFame<K> {
    entries: Vec<(K, f64)>,
    max_size: usize,
    seen: HashSet<K>,
    order: RankOrder,
}

impl<K: Clone + Eq + Hash> HallOfFame<K> {
    pub fn new(max_size: usize) -> Self {
        Self::with_order(max_size, RankOrder::default())
    }

    pub fn with_order(max_size: usize, order: RankOrder) -> Self {
        Self {
            entries: Vec::with_capacity(max_size),
            max_size,
            seen: HashSet::with_capacity(max_size),
            order,
        }
    }

    /// Offer `key` with `score`; the key is cloned only when stored
    pub fn try_add(&mut self, key: &K, score: f64) -> AddOutcome<K> {
        if self.max_size == 0 || self.seen.contains(key) {
            return AddOutcome::Rejected;
        }

        let full = self.entries.len() >= self.max_size;
        if full {
            let Some(&(_, worst)) = self.entries.last() else {
                return AddOutcome::Rejected;
            };
            if !self.order.ahead(score, worst) {
                return AddOutcome::Rejected;
            }
        }

        let order = self.order;
        let position = self
            .entries
            .partition_point(|(_, existing)| !order.ahead(score, *existing));
        self.entries.insert(position, (key.clone(), score));
        self.seen.insert(key.clone());

        if full {
            if let Some((removed, removed_score)) = self.entries.pop() {
                self.seen.remove(&removed);
                return AddOutcome::Evicted(removed, removed_score);
            }
        }
        AddOutcome::Added
    }

    /// Entries best first
    pub fn get_all(&self) -> &[(K, f64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<(K, f64)> {
        self.entries
    }
}
