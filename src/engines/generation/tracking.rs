use crate::engines::evaluation::{Individual, ScoredTree};
use crate::engines::generation::hall_of_fame::{HallOfFame, RankOrder};
use crate::grammar::RuleNode;
use std::collections::HashMap;

/// Named auxiliary output attached to an optimization result
#[derive(Debug, Clone, PartialEq)]
pub enum AuxOutput {
    /// Trees best first
    Ranked(Vec<ScoredTree>),
}

/// Produces the per-run tracker; the strategy itself holds no run state
pub trait TrackingStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn tracker(&self) -> Box<dyn Tracker>;
}

/// Mutable tracking state owned by one optimization run
pub trait Tracker {
    /// Called once per generation with the freshly sorted population
    fn observe(&mut self, population: &[Individual]);

    /// Number of retained entries
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move retained data into the result's auxiliary outputs
    fn export(self: Box<Self>, aux: &mut HashMap<String, AuxOutput>);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoTracking;

impl TrackingStrategy for NoTracking {
    fn name(&self) -> &'static str {
        "none"
    }

    fn tracker(&self) -> Box<dyn Tracker> {
        Box::new(NullTracker)
    }
}

struct NullTracker;

impl Tracker for NullTracker {
    fn observe(&mut self, _population: &[Individual]) {}

    fn len(&self) -> usize {
        0
    }

    fn export(self: Box<Self>, _aux: &mut HashMap<String, AuxOutput>) {}
}

/// Keep the `k` best distinct trees seen over the whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopKTracking {
    pub k: usize,
}

impl TopKTracking {
    pub const AUX_KEY: &'static str = "top_k";

    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl TrackingStrategy for TopKTracking {
    fn name(&self) -> &'static str {
        "top_k"
    }

    fn tracker(&self) -> Box<dyn Tracker> {
        Box::new(TopKTracker::new(self.k))
    }
}

pub struct TopKTracker {
    k: usize,
    hall_of_fame: HallOfFame<RuleNode>,
}

impl TopKTracker {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            hall_of_fame: HallOfFame::with_order(k, RankOrder::LowerIsBetter),
        }
    }
}

impl Tracker for TopKTracker {
    /// Offers individuals in ascending loss order and stops after `k`
    /// insertions: every later candidate of this pass is no better than
    /// those `k`, so a full table would reject it.
    fn observe(&mut self, population: &[Individual]) {
        let mut inserted = 0;
        for individual in population {
            if inserted >= self.k {
                break;
            }
            let Some(loss) = individual.loss else {
                continue;
            };
            if self.hall_of_fame.try_add(&individual.tree, loss).is_inserted() {
                inserted += 1;
            }
        }
    }

    fn len(&self) -> usize {
        self.hall_of_fame.len()
    }

    fn export(self: Box<Self>, aux: &mut HashMap<String, AuxOutput>) {
        let ranked = self
            .hall_of_fame
            .into_vec()
            .into_iter()
            .map(|(tree, loss)| ScoredTree { tree, loss })
            .collect();
        aux.insert(TopKTracking::AUX_KEY.to_string(), AuxOutput::Ranked(ranked));
    }
}
