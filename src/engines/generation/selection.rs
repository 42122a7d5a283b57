//! Parent selection over a population sorted ascending by loss.
//!
//! Both strategies lean on that ordering: position alone ranks an
//! individual, so neither reads the loss values.

use crate::engines::evaluation::Individual;
use rand::seq::index;
use rand::{Rng, RngCore};

pub trait SelectionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Smallest population this strategy can draw from
    fn min_population(&self) -> usize;

    /// Pick a parent; returns it together with its index
    fn select<'a>(&self, population: &'a [Individual], rng: &mut dyn RngCore) -> (&'a Individual, usize);
}

/// Draw `k` distinct individuals, keep the best (lowest index)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TournamentSelection {
    pub k: usize,
}

impl TournamentSelection {
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self { k: 2 }
    }
}

impl SelectionStrategy for TournamentSelection {
    fn name(&self) -> &'static str {
        "tournament"
    }

    fn min_population(&self) -> usize {
        self.k.max(1)
    }

    fn select<'a>(&self, population: &'a [Individual], rng: &mut dyn RngCore) -> (&'a Individual, usize) {
        let winner = index::sample(rng, population.len(), self.k.max(1))
            .into_iter()
            .min()
            .unwrap_or(0);
        (&population[winner], winner)
    }
}

/// Uniform pick among the `k` best
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationSelection {
    pub k: usize,
}

impl TruncationSelection {
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl SelectionStrategy for TruncationSelection {
    fn name(&self) -> &'static str {
        "truncation"
    }

    fn min_population(&self) -> usize {
        self.k.max(1)
    }

    fn select<'a>(&self, population: &'a [Individual], rng: &mut dyn RngCore) -> (&'a Individual, usize) {
        let index = rng.gen_range(0..self.k.max(1));
        (&population[index], index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::RuleNode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sorted_population(n: usize) -> Vec<Individual> {
        (0..n)
            .map(|i| Individual::scored(RuleNode::leaf(i), i as f64))
            .collect()
    }

    #[test]
    fn test_tournament_of_whole_population_picks_leader() {
        let population = sorted_population(6);
        let mut rng = StdRng::seed_from_u64(11);
        let selection = TournamentSelection::new(6);
        for _ in 0..20 {
            let (winner, index) = selection.select(&population, &mut rng);
            assert_eq!(index, 0);
            assert_eq!(winner.tree, RuleNode::leaf(0));
        }
    }

    #[test]
    fn test_tournament_never_picks_worst_with_k2() {
        let population = sorted_population(5);
        let mut rng = StdRng::seed_from_u64(5);
        let selection = TournamentSelection::default();
        let mut seen = [0usize; 5];
        for _ in 0..500 {
            let (winner, index) = selection.select(&population, &mut rng);
            assert_eq!(winner.loss, Some(index as f64));
            seen[index] += 1;
        }
        // two distinct draws: the last slot can never win
        assert_eq!(seen[4], 0);
        assert!(seen[0] > seen[3]);
    }

    #[test]
    fn test_truncation_stays_in_top_k() {
        let population = sorted_population(10);
        let mut rng = StdRng::seed_from_u64(8);
        let selection = TruncationSelection::new(3);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let (_, index) = selection.select(&population, &mut rng);
            assert!(index < 3);
            seen[index] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_min_population() {
        assert_eq!(TournamentSelection::new(4).min_population(), 4);
        assert_eq!(TruncationSelection::new(0).min_population(), 1);
    }
}
